//! 문서 내보내기 포트.
//!
//! 구현: 네이티브 셸의 파일 기록기.
//! 이미 존재하는 경로는 덮어쓰지 않고 결과로 알리며,
//! 덮어쓰기는 확인 후 `force_export`로만 수행한다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::models::document::ConfigDocument;

/// 경로별 내보내기 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// 기록(시도)된 대상 경로
    pub path: String,
    /// 대상 파일이 이미 존재했는지 (존재 시 기록 보류)
    pub already_existed: bool,
}

/// 문서 파일 내보내기
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// 대상 경로들에 문서 내보내기.
    ///
    /// 경로마다 결과를 돌려준다. `already_existed`가 true인 경로는
    /// 기록되지 않았으며 호출자의 확인을 기다린다.
    async fn export(
        &self,
        document: &ConfigDocument,
        paths: &[String],
    ) -> CoreResult<Vec<ExportOutcome>>;

    /// 덮어쓰기 확정 내보내기
    async fn force_export(&self, document: &ConfigDocument, path: &str) -> CoreResult<()>;
}
