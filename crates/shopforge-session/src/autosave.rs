//! 자동 저장 플래너.
//!
//! 무장 조건: 자동 저장 설정이 켜져 있고 스냅샷이 로드되어 있을 것.
//! 설정이나 로드 핸들이 바뀌면 호출자가 `rearm`으로 즉시 해제-재무장한다
//! (기존 타이머 취소 후 새 타이머 생성 — 세대 간 중첩 없음).
//!
//! 의도적으로 in-flight 가드는 두지 않는다: 저장 호출이 간격보다 오래
//! 걸리면 두 틱이 동시에 진행될 수 있고, 영속화 협력자의
//! last-write-wins 의미론을 그대로 받아들인다.

use std::sync::{Arc, Mutex};

use shopforge_core::models::settings::AutoSaveSettings;
use shopforge_core::ports::notifier::{NoticeKind, NoticeOptions, ToastNotifier};
use shopforge_core::ports::persistence::ConfigPersistence;
use shopforge_core::store::ConfigStore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 자동 저장 성공 토스트
const SAVED_MESSAGE: &str = "Configuration auto-saved successfully";

/// 자동 저장 실패 토스트
const SAVE_FAILED_MESSAGE: &str = "Failed to auto-save configuration";

/// 자동 저장 플래너 — 주기적으로 영속화 협력자에 저장을 요청한다.
pub struct AutoSavePlanner {
    store: Arc<ConfigStore>,
    persistence: Arc<dyn ConfigPersistence>,
    notifier: Arc<dyn ToastNotifier>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutoSavePlanner {
    /// 새 플래너 생성 (무장은 `rearm`에서)
    pub fn new(
        store: Arc<ConfigStore>,
        persistence: Arc<dyn ConfigPersistence>,
        notifier: Arc<dyn ToastNotifier>,
    ) -> Self {
        Self {
            store,
            persistence,
            notifier,
            task: Mutex::new(None),
        }
    }

    /// 해제 후 재무장.
    ///
    /// 기존 타이머를 먼저 취소하므로 플래너당 살아 있는 타이머는 항상
    /// 최대 1개이고, 바뀐 간격은 변경 시점부터 다시 센다.
    /// 첫 틱은 한 간격 뒤에 온다.
    pub fn rearm(&self, settings: AutoSaveSettings) {
        let mut task = self.task.lock().unwrap();
        if let Some(handle) = task.take() {
            handle.abort();
            debug!("기존 자동 저장 타이머 취소");
        }

        if !settings.enabled {
            info!("자동 저장 비활성 — 무장하지 않음");
            return;
        }
        if self.store.loaded_id().is_none() {
            info!("로드된 스냅샷 없음 — 자동 저장 무장하지 않음");
            return;
        }

        let period = settings.interval();
        let store = self.store.clone();
        let persistence = self.persistence.clone();
        let notifier = self.notifier.clone();

        *task = Some(tokio::spawn(async move {
            // interval()의 즉시 첫 틱을 피해 한 간격 뒤부터 시작
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;

                // 틱 시점의 최신 문서/핸들을 읽는다 — 타이머 생성 시
                // 캡처한 값이 아니다
                let Some(handle) = store.loaded() else {
                    debug!("틱 시점에 로드 핸들 없음 — 건너뜀");
                    continue;
                };
                let document = store.document();

                match persistence
                    .persist_document(&document, Some(handle.id), &handle.name)
                    .await
                {
                    Ok(id) => {
                        debug!("자동 저장 완료: id={id}");
                        if let Err(e) = notifier
                            .notify(NoticeKind::Success, SAVED_MESSAGE, &NoticeOptions::toast())
                            .await
                        {
                            debug!("자동 저장 토스트 실패: {e}");
                        }
                    }
                    Err(e) => {
                        // 실패해도 타이머는 해제되지 않는다 — 다음 틱은 정시에
                        warn!("자동 저장 실패: {e}");
                        if let Err(e) = notifier
                            .notify(NoticeKind::Error, SAVE_FAILED_MESSAGE, &NoticeOptions::toast())
                            .await
                        {
                            debug!("자동 저장 실패 토스트 실패: {e}");
                        }
                    }
                }
            }
        }));
        info!("자동 저장 무장: {}분 간격", settings.interval_minutes);
    }

    /// 현재 무장 상태인지
    pub fn armed(&self) -> bool {
        self.task.lock().unwrap().is_some()
    }

    /// 타이머 해제 — 세션 테어다운 시 필수
    pub fn shutdown(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
            info!("자동 저장 타이머 해제");
        }
    }
}

impl Drop for AutoSavePlanner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
