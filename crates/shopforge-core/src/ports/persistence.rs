//! 영속화 포트.
//!
//! 구현: 네이티브 셸의 스냅샷/설정 저장소 (SQLite).
//! 문서의 외부 저장 형식은 코어가 관여하지 않는 불투명 블롭이다.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::models::document::ConfigDocument;
use crate::models::settings::AppSettings;
use crate::models::snapshot::{SavedSnapshot, SnapshotId, SnapshotSummary};

/// 이름 붙은 스냅샷 저장소
#[async_trait]
pub trait ConfigPersistence: Send + Sync {
    /// 문서 저장.
    ///
    /// `id`가 None이면 새 스냅샷을 만들고, Some이면 해당 스냅샷을 갱신한다.
    /// 생성/갱신된 스냅샷의 id를 반환한다.
    async fn persist_document(
        &self,
        document: &ConfigDocument,
        id: Option<SnapshotId>,
        name: &str,
    ) -> CoreResult<SnapshotId>;

    /// 저장된 스냅샷 본문 조회
    async fn load_snapshot(&self, id: SnapshotId) -> CoreResult<SavedSnapshot>;

    /// 저장된 스냅샷 목록 조회
    async fn list_snapshots(&self) -> CoreResult<Vec<SnapshotSummary>>;

    /// 스냅샷 삭제
    async fn delete_snapshot(&self, id: SnapshotId) -> CoreResult<()>;
}

/// 앱 설정 저장소
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// 설정 로드
    async fn load_settings(&self) -> CoreResult<AppSettings>;

    /// 설정 저장
    async fn save_settings(&self, settings: &AppSettings) -> CoreResult<()>;
}
