//! 문서 내보내기 서비스.
//!
//! 대상 경로 결정 규칙: 로드된 스냅샷에 비어 있지 않은 재정의 경로가
//! 있으면 그것을, 없으면 전역 출력 경로 하나를 쓴다.
//! 이미 존재하는 파일은 쓰지 않고 결과로 알리며, 덮어쓰기는
//! 호출자의 확인을 받아 `force_export`로만 수행한다.

use std::sync::Arc;

use shopforge_core::error::{CoreError, CoreResult};
use shopforge_core::models::settings::AppSettings;
use shopforge_core::ports::exporter::{DocumentExporter, ExportOutcome};
use shopforge_core::store::ConfigStore;
use tracing::info;

/// 내보내기 서비스
pub struct Exporter {
    store: Arc<ConfigStore>,
    exporter: Arc<dyn DocumentExporter>,
}

impl Exporter {
    /// 새 내보내기 서비스 생성
    pub fn new(store: Arc<ConfigStore>, exporter: Arc<dyn DocumentExporter>) -> Self {
        Self { store, exporter }
    }

    /// 대상 경로 결정.
    ///
    /// 재정의 경로도 전역 출력 경로도 없으면 검증 에러.
    pub fn resolve_destinations(&self, settings: &AppSettings) -> CoreResult<Vec<String>> {
        if let Some(handle) = self.store.loaded() {
            if let Some(paths) = handle.custom_export_paths {
                if !paths.is_empty() {
                    return Ok(paths);
                }
            }
        }

        if settings.output_path.is_empty() {
            return Err(CoreError::validation(
                "output_path",
                "출력 경로가 설정되지 않음",
            ));
        }
        Ok(vec![settings.output_path.clone()])
    }

    /// 현재 문서를 결정된 경로들로 내보내기.
    ///
    /// `already_existed`가 true인 항목은 기록되지 않았으며
    /// [`Exporter::force_export`] 확정을 기다린다.
    pub async fn export(&self, settings: &AppSettings) -> CoreResult<Vec<ExportOutcome>> {
        let paths = self.resolve_destinations(settings)?;
        let document = self.store.document();
        let outcomes = self.exporter.export(&document, &paths).await?;
        info!(
            "내보내기: {}개 경로, 충돌 {}개",
            outcomes.len(),
            outcomes.iter().filter(|o| o.already_existed).count()
        );
        Ok(outcomes)
    }

    /// 덮어쓰기 확정 내보내기
    pub async fn force_export(&self, path: &str) -> CoreResult<()> {
        let document = self.store.document();
        self.exporter.force_export(&document, path).await?;
        info!("덮어쓰기 내보내기: {path}");
        Ok(())
    }
}
