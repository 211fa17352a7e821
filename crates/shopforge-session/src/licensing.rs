//! 라이선스 서비스.
//!
//! 검증 포트를 감싸 세션의 라이선스 상태를 유지하고,
//! 상태가 바뀔 때마다 만료 감시자를 재무장한다.
//! 키 복호화와 HWID 대조는 포트 뒤의 셸 책임이다.

use std::sync::Arc;

use shopforge_core::error::{CoreError, CoreResult};
use shopforge_core::models::license::LicenseState;
use shopforge_core::ports::licensing::LicenseAuthority;
use tokio::sync::RwLock;
use tracing::info;

use crate::watcher::LicenseWatcher;

/// 라이선스 서비스
pub struct LicenseService {
    authority: Arc<dyn LicenseAuthority>,
    watcher: Arc<LicenseWatcher>,
    state: RwLock<LicenseState>,
}

impl LicenseService {
    /// 새 라이선스 서비스 생성 (초기 상태는 비라이선스)
    pub fn new(authority: Arc<dyn LicenseAuthority>, watcher: Arc<LicenseWatcher>) -> Self {
        Self {
            authority,
            watcher,
            state: RwLock::new(LicenseState::unlicensed()),
        }
    }

    /// 현재 라이선스 상태
    pub async fn state(&self) -> LicenseState {
        *self.state.read().await
    }

    /// 저장된 라이선스 정보로 상태 갱신 (세션 시작 시).
    ///
    /// 정보가 없으면 비라이선스 상태가 된다. 만료가 지난 정보라도
    /// 상태는 설정된다 — 만료 공지는 감시자가 낸다.
    pub async fn refresh(&self) -> CoreResult<LicenseState> {
        let info = self.authority.license_info().await?;
        let state = match info {
            Some(info) => LicenseState::licensed_until(info.expiration_date),
            None => LicenseState::unlicensed(),
        };
        self.apply(state).await;
        Ok(state)
    }

    /// 라이선스 키 활성화.
    ///
    /// 검증 실패는 에러, 성공 시 저장된 정보로 상태를 갱신하고
    /// 감시를 시작한다.
    pub async fn activate(&self, key: &str) -> CoreResult<LicenseState> {
        let valid = self.authority.validate_license(key).await?;
        if !valid {
            return Err(CoreError::License("유효하지 않은 라이선스 키".to_string()));
        }

        let info = self
            .authority
            .license_info()
            .await?
            .ok_or_else(|| CoreError::License("검증 후 라이선스 정보 없음".to_string()))?;

        let state = LicenseState::licensed_until(info.expiration_date);
        self.apply(state).await;
        Ok(state)
    }

    /// 현재 머신의 하드웨어 식별자
    pub async fn hardware_id(&self) -> CoreResult<String> {
        self.authority.hardware_id().await
    }

    async fn apply(&self, state: LicenseState) {
        *self.state.write().await = state;
        self.watcher.rearm(state);
        info!(
            "라이선스 상태 갱신: licensed={}, 만료={:?}",
            state.is_licensed, state.expiration_date
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::LicenseWarningManager;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use shopforge_core::models::license::LicenseInfo;
    use shopforge_core::ports::notifier::{NoticeKind, NoticeOptions, ToastNotifier};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NullNotifier {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ToastNotifier for NullNotifier {
        async fn notify(
            &self,
            _kind: NoticeKind,
            _message: &str,
            _options: &NoticeOptions,
        ) -> CoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockAuthority {
        valid: bool,
        info: Option<LicenseInfo>,
    }

    #[async_trait]
    impl LicenseAuthority for MockAuthority {
        async fn validate_license(&self, _key: &str) -> CoreResult<bool> {
            Ok(self.valid)
        }

        async fn hardware_id(&self) -> CoreResult<String> {
            Ok("hwid-0001".to_string())
        }

        async fn license_info(&self) -> CoreResult<Option<LicenseInfo>> {
            Ok(self.info.clone())
        }
    }

    fn service(valid: bool, info: Option<LicenseInfo>) -> LicenseService {
        let notifier = Arc::new(NullNotifier {
            calls: AtomicU32::new(0),
        });
        let manager = Arc::new(LicenseWarningManager::new(notifier));
        let watcher = Arc::new(LicenseWatcher::new(manager));
        LicenseService::new(Arc::new(MockAuthority { valid, info }), watcher)
    }

    fn stored_info(expiration_offset: ChronoDuration) -> LicenseInfo {
        LicenseInfo {
            license_key: "a2V5".to_string(),
            expiration_date: Utc::now() + expiration_offset,
            hwid: "hwid-0001".to_string(),
        }
    }

    #[tokio::test]
    async fn activate_with_valid_key() {
        let service = service(true, Some(stored_info(ChronoDuration::days(30))));

        let state = service.activate("a2V5").await.unwrap();

        assert!(state.is_licensed);
        assert!(state.expiration_date.is_some());
        assert_eq!(service.state().await, state);
    }

    #[tokio::test]
    async fn activate_with_invalid_key_errors() {
        let service = service(false, None);

        assert!(matches!(
            service.activate("bad").await,
            Err(CoreError::License(_))
        ));
        assert!(!service.state().await.is_licensed);
    }

    #[tokio::test]
    async fn refresh_without_stored_info_is_unlicensed() {
        let service = service(true, None);
        let state = service.refresh().await.unwrap();
        assert_eq!(state, LicenseState::unlicensed());
    }

    #[tokio::test]
    async fn refresh_with_expired_info_still_licensed() {
        // 만료가 지나도 상태는 설정된다 — 만료 공지는 감시자 몫
        let service = service(true, Some(stored_info(-ChronoDuration::days(1))));
        let state = service.refresh().await.unwrap();
        assert!(state.is_licensed);
    }
}
