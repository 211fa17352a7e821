//! 저장 스냅샷 모델.
//!
//! 영속화 백엔드에 이름으로 저장된 문서 사본과,
//! 세션에 현재 "열려 있는" 스냅샷 핸들을 정의한다.

use serde::{Deserialize, Serialize};

/// 영속화된 스냅샷의 불투명 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub i64);

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 현재 로드된 스냅샷 핸들.
///
/// 세션당 0개 또는 1개. `load`로 설정되고 `unload`/`import`로 해제된다.
/// 제자리 변경은 없다 — 항상 통째로 교체된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHandle {
    /// 스냅샷 식별자
    pub id: SnapshotId,
    /// 표시 이름
    pub name: String,
    /// 전역 출력 경로를 덮어쓰는 내보내기 경로 목록 (선택)
    #[serde(default)]
    pub custom_export_paths: Option<Vec<String>>,
}

impl SnapshotHandle {
    /// 경로 재정의 없는 핸들 생성
    pub fn new(id: SnapshotId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            custom_export_paths: None,
        }
    }
}

/// 스냅샷 목록 항목 (`list_snapshots` 반환형)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// 스냅샷 식별자
    pub id: SnapshotId,
    /// 표시 이름
    pub name: String,
}

/// 영속화 백엔드가 보관하는 스냅샷 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSnapshot {
    /// 스냅샷 식별자
    pub id: SnapshotId,
    /// 표시 이름
    pub name: String,
    /// 직렬화된 문서 본문 (코어는 불투명 블롭으로 취급)
    pub body: String,
    /// 내보내기 경로 재정의 (선택)
    #[serde(default)]
    pub custom_export_paths: Option<Vec<String>>,
}

impl SavedSnapshot {
    /// 이 레코드를 여는 데 쓸 핸들 생성
    pub fn handle(&self) -> SnapshotHandle {
        SnapshotHandle {
            id: self.id,
            name: self.name.clone(),
            custom_export_paths: self.custom_export_paths.clone(),
        }
    }
}
