//! 라이선스 상태 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 세션의 라이선스 상태.
///
/// `is_licensed`가 false이거나 만료 시각이 없으면
/// 주기적 만료 검사는 수행되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseState {
    /// 만료 시각 (없으면 검사 대상 아님)
    pub expiration_date: Option<DateTime<Utc>>,
    /// 주기적 만료 검사 활성화 여부
    pub is_licensed: bool,
}

impl LicenseState {
    /// 비라이선스 상태
    pub fn unlicensed() -> Self {
        Self {
            expiration_date: None,
            is_licensed: false,
        }
    }

    /// 만료 시각이 있는 라이선스 상태
    pub fn licensed_until(expiration: DateTime<Utc>) -> Self {
        Self {
            expiration_date: Some(expiration),
            is_licensed: true,
        }
    }

    /// 만료 감시가 가능한 상태인지 (라이선스 + 만료 시각 보유)
    pub fn watchable(&self) -> bool {
        self.is_licensed && self.expiration_date.is_some()
    }
}

impl Default for LicenseState {
    fn default() -> Self {
        Self::unlicensed()
    }
}

/// 저장된 라이선스 정보 (`license_info` 포트 반환형)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// 라이선스 키
    pub license_key: String,
    /// 만료 시각
    pub expiration_date: DateTime<Utc>,
    /// 키가 묶인 하드웨어 식별자
    pub hwid: String,
}

/// 만료까지 남은 시간의 정수 분해.
///
/// `hours`는 24로, `minutes`는 60으로 나눈 나머지다.
/// 만료가 지났으면 생성되지 않는다 ([`RemainingTime::until`]이 None).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingTime {
    /// 남은 일수
    pub days: i64,
    /// 남은 시간 (일 단위 제외, 0..24)
    pub hours: i64,
    /// 남은 분 (시 단위 제외, 0..60)
    pub minutes: i64,
}

impl RemainingTime {
    /// `expiration - now` 분해. 남은 시간이 0 이하이면 None (만료).
    pub fn until(expiration: DateTime<Utc>, now: DateTime<Utc>) -> Option<Self> {
        let diff = expiration - now;
        if diff <= chrono::Duration::zero() {
            return None;
        }
        Some(Self {
            days: diff.num_days(),
            hours: diff.num_hours() % 24,
            minutes: diff.num_minutes() % 60,
        })
    }

    /// 일/시/분이 모두 0인지 (1분 미만 남음)
    pub fn under_a_minute(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }
}
