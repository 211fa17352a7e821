//! 라이선스 만료 감시.
//!
//! [`LicenseWarningManager`]가 판단 결과를 알림으로 변환하고 상태를
//! 커밋하며, [`LicenseWatcher`]가 60초 고정 폴 루프를 소유한다.
//! 폴 주기는 게이트 검사 비용일 뿐이고, 실제 발송 간격은
//! [`crate::warning`]의 주기 선택이 결정한다.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use shopforge_core::models::license::LicenseState;
use shopforge_core::ports::notifier::{NoticeKind, NoticeOptions, ToastNotifier};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::warning::{evaluate, WarningDecision, WarningState};

/// 고정 폴 간격 (60초)
const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// 만료 공지 본문 (세션당 1회, 고정 배너)
const EXPIRED_MESSAGE: &str =
    "Your license has expired. Please renew it to continue using the application.";

/// 만료 공지의 안정 식별자 (싱크 측 중복 제거)
const EXPIRED_NOTICE_ID: &str = "license-expired";

/// 라이선스 경고 관리자.
///
/// 판단([`evaluate`])을 적용하고, 발송에 성공한 경우에만 상태를 커밋한다.
pub struct LicenseWarningManager {
    notifier: Arc<dyn ToastNotifier>,
    state: RwLock<WarningState>,
}

impl LicenseWarningManager {
    /// 새 경고 관리자 생성
    pub fn new(notifier: Arc<dyn ToastNotifier>) -> Self {
        Self {
            notifier,
            state: RwLock::new(WarningState::default()),
        }
    }

    /// 한 번의 폴 — 평가 후 필요 시 알림 발송.
    ///
    /// 발송 실패는 로그만 남기고 상태를 커밋하지 않으므로
    /// 다음 폴에서 재시도된다.
    pub async fn check(&self, expiration: Option<DateTime<Utc>>, now: DateTime<Utc>) {
        let mut state = self.state.write().await;

        match evaluate(&state, expiration, now) {
            WarningDecision::Skip => {}
            WarningDecision::NotifyExpired => {
                if let Err(e) = self
                    .notifier
                    .notify(
                        NoticeKind::Error,
                        EXPIRED_MESSAGE,
                        &NoticeOptions::sticky(EXPIRED_NOTICE_ID),
                    )
                    .await
                {
                    debug!("만료 공지 발송 실패: {e}");
                } else {
                    state.expired_notice_shown = true;
                    info!("라이선스 만료 공지 발송");
                }
            }
            WarningDecision::Remind { message } => {
                if let Err(e) = self
                    .notifier
                    .notify(NoticeKind::Warning, &message, &NoticeOptions::banner())
                    .await
                {
                    debug!("만료 경고 발송 실패: {e}");
                } else {
                    state.last_warning_at = Some(now);
                    state.initial_check_done = true;
                    info!("라이선스 만료 경고 발송: {message}");
                }
            }
        }
    }
}

/// 라이선스 만료 감시자 — 60초 폴 태스크 소유.
///
/// `rearm`은 이전 태스크를 먼저 취소하고 감시 가능 상태
/// (`is_licensed && expiration_date 존재`)일 때만 새 태스크를 만든다.
/// 감시자당 살아 있는 태스크는 항상 최대 1개다.
pub struct LicenseWatcher {
    manager: Arc<LicenseWarningManager>,
    poll_interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LicenseWatcher {
    /// 새 감시자 생성 (60초 폴)
    pub fn new(manager: Arc<LicenseWarningManager>) -> Self {
        Self {
            manager,
            poll_interval: POLL_INTERVAL,
            task: Mutex::new(None),
        }
    }

    /// 라이선스 상태 변경에 따른 재무장.
    ///
    /// 기존 폴 태스크를 취소한 뒤, 감시 가능하면 새 태스크를 시작한다.
    /// `tokio::time::interval`의 첫 틱은 즉시 발화하므로
    /// 감시 시작 직후의 초기 검사가 여기서 나온다.
    pub fn rearm(&self, license: LicenseState) {
        let mut task = self.task.lock().unwrap();
        if let Some(handle) = task.take() {
            handle.abort();
            debug!("이전 라이선스 폴 태스크 취소");
        }

        if !license.watchable() {
            info!("라이선스 감시 비활성 (비라이선스 또는 만료 시각 없음)");
            return;
        }
        // watchable()이 보장하므로 여기서 expiration은 항상 존재
        let Some(expiration) = license.expiration_date else {
            return;
        };

        let manager = self.manager.clone();
        let poll = self.poll_interval;
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll);
            loop {
                interval.tick().await;
                manager.check(Some(expiration), Utc::now()).await;
            }
        }));
        info!("라이선스 감시 시작: 만료={expiration}");
    }

    /// 감시 종료 — 세션 테어다운 시 필수
    pub fn shutdown(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
            info!("라이선스 감시 종료");
        }
    }
}

impl Drop for LicenseWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use shopforge_core::error::CoreError;
    use std::sync::Mutex as StdMutex;

    /// 발송 내역을 기록하는 목 알림기
    struct MockNotifier {
        sent: StdMutex<Vec<(NoticeKind, String)>>,
        should_fail: bool,
    }

    impl MockNotifier {
        fn new() -> Self {
            Self {
                sent: StdMutex::new(Vec::new()),
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: StdMutex::new(Vec::new()),
                should_fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn last_message(&self) -> Option<String> {
            self.sent.lock().unwrap().last().map(|(_, m)| m.clone())
        }
    }

    #[async_trait]
    impl ToastNotifier for MockNotifier {
        async fn notify(
            &self,
            kind: NoticeKind,
            message: &str,
            _options: &NoticeOptions,
        ) -> Result<(), CoreError> {
            if self.should_fail {
                return Err(CoreError::Internal("목 실패".to_string()));
            }
            self.sent.lock().unwrap().push((kind, message.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn expired_notice_exactly_once_across_polls() {
        // 만료 1초 경과, 5회 연속 폴 → 공지 정확히 1회
        let notifier = Arc::new(MockNotifier::new());
        let manager = LicenseWarningManager::new(notifier.clone());
        let expiration = Some(Utc::now() - ChronoDuration::seconds(1));

        for _ in 0..5 {
            manager.check(expiration, Utc::now()).await;
        }

        assert_eq!(notifier.calls(), 1);
        assert_eq!(notifier.last_message().unwrap(), EXPIRED_MESSAGE);
    }

    #[tokio::test]
    async fn reminder_initial_then_gated() {
        let notifier = Arc::new(MockNotifier::new());
        let manager = LicenseWarningManager::new(notifier.clone());
        let now = Utc::now();
        let expiration = Some(now + ChronoDuration::minutes(10));

        // 최초 평가 → 발송
        manager.check(expiration, now).await;
        assert_eq!(notifier.calls(), 1);
        assert_eq!(
            notifier.last_message().unwrap(),
            "Your license will expire in 10 minutes"
        );

        // 주기(15분) 내 재평가 → 미발송
        manager.check(expiration, now + ChronoDuration::minutes(1)).await;
        assert_eq!(notifier.calls(), 1);

        // 주기 경과 후 → 재발송
        manager.check(expiration, now + ChronoDuration::minutes(16)).await;
        assert_eq!(notifier.calls(), 2);
    }

    #[tokio::test]
    async fn failed_send_retries_next_poll() {
        // 발송 실패 시 상태를 커밋하지 않아 다음 폴에서 재시도된다
        let notifier = Arc::new(MockNotifier::failing());
        let manager = LicenseWarningManager::new(notifier.clone());
        let expiration = Some(Utc::now() - ChronoDuration::seconds(1));

        manager.check(expiration, Utc::now()).await;
        assert_eq!(notifier.calls(), 0);
        assert!(!manager.state.read().await.expired_notice_shown);
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_polls_and_notifies_once_when_expired() {
        let notifier = Arc::new(MockNotifier::new());
        let manager = Arc::new(LicenseWarningManager::new(notifier.clone()));
        let watcher = LicenseWatcher::new(manager);

        watcher.rearm(LicenseState::licensed_until(
            Utc::now() - ChronoDuration::seconds(1),
        ));

        // 폴 5회 분량 경과 (첫 틱은 즉시)
        tokio::time::sleep(Duration::from_secs(301)).await;

        assert_eq!(notifier.calls(), 1);
        watcher.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_immediate_initial_check() {
        let notifier = Arc::new(MockNotifier::new());
        let manager = Arc::new(LicenseWarningManager::new(notifier.clone()));
        let watcher = LicenseWatcher::new(manager);

        watcher.rearm(LicenseState::licensed_until(
            Utc::now() + ChronoDuration::hours(25),
        ));

        // 폴 간격을 기다리지 않고 첫 틱에서 바로 검사
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(notifier.calls(), 1);
        assert_eq!(
            notifier.last_message().unwrap(),
            "Your license will expire in 1 day"
        );
        watcher.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_cancels_previous_generation() {
        let notifier = Arc::new(MockNotifier::new());
        let manager = Arc::new(LicenseWarningManager::new(notifier.clone()));
        let watcher = LicenseWatcher::new(manager);

        // 만료 상태로 무장했다가 폴이 돌기 전에 비라이선스로 재무장
        watcher.rearm(LicenseState::licensed_until(
            Utc::now() - ChronoDuration::seconds(1),
        ));
        watcher.rearm(LicenseState::unlicensed());

        tokio::time::sleep(Duration::from_secs(301)).await;

        // 이전 세대 태스크가 취소되어 아무 것도 발송되지 않는다
        assert_eq!(notifier.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unwatchable_state_spawns_nothing() {
        let notifier = Arc::new(MockNotifier::new());
        let manager = Arc::new(LicenseWarningManager::new(notifier.clone()));
        let watcher = LicenseWatcher::new(manager);

        watcher.rearm(LicenseState {
            expiration_date: None,
            is_licensed: true,
        });

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(notifier.calls(), 0);
        assert!(watcher.task.lock().unwrap().is_none());
    }
}
