//! 라이선스 만료 경고 — 판단 레이어.
//!
//! "지금 무엇을 알릴지"는 전부 순수 함수로 결정하고,
//! 알림 발송(효과)은 [`crate::watcher`]가 담당한다.
//! 덕분에 타이머나 UI 없이 판단 로직만 단위 테스트할 수 있다.

use chrono::{DateTime, Duration, Utc};
use shopforge_core::models::license::RemainingTime;

/// 남은 시간에 따른 경고 주기 선택.
///
/// - `days > 1` → None (아직 경고하지 않음)
/// - `days == 1` → 24시간
/// - `hours >= 1` (days == 0) → 1시간
/// - 그 외 → 15분
///
/// `days >= 1`이면 경계는 `days` 기준이다 — `days == 1, hours == 0`이어도
/// 시간 단위 주기가 아니라 24시간 주기를 쓴다.
pub fn warning_cadence(remaining: &RemainingTime) -> Option<Duration> {
    if remaining.days > 1 {
        None
    } else if remaining.days == 1 {
        Some(Duration::hours(24))
    } else if remaining.hours >= 1 {
        Some(Duration::hours(1))
    } else {
        Some(Duration::minutes(15))
    }
}

/// 가장 큰 0 아닌 단위로 경고 메시지 구성
pub fn warning_message(remaining: &RemainingTime) -> String {
    let mut message = String::from("Your license will expire in ");
    if remaining.days > 0 {
        message.push_str(&plural(remaining.days, "day"));
    } else if remaining.hours > 0 {
        message.push_str(&plural(remaining.hours, "hour"));
    } else if remaining.minutes > 0 {
        message.push_str(&plural(remaining.minutes, "minute"));
    } else {
        message.push_str("less than a minute");
    }
    message
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// 세션별 경고 상태.
///
/// `last_warning_at`의 None은 "발송 이력 없음"이며 시점 0으로 취급된다
/// (경과 시간이 항상 주기를 넘는다).
#[derive(Debug, Clone, Default)]
pub struct WarningState {
    /// 마지막 경고 발송 시각
    pub last_warning_at: Option<DateTime<Utc>>,
    /// 세션 최초 평가를 이미 수행했는지
    pub initial_check_done: bool,
    /// 만료 공지를 이미 발송했는지 (세션당 최대 1회 보장)
    pub expired_notice_shown: bool,
}

/// 한 번의 평가 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningDecision {
    /// 발송할 것 없음
    Skip,
    /// 만료 — 일회성 만료 공지 발송
    NotifyExpired,
    /// 만료 임박 리마인더 발송
    Remind {
        /// 사용자에게 보여줄 메시지
        message: String,
    },
}

/// 상태를 바꾸지 않는 순수 판단.
///
/// 만료가 지났으면 공지 미발송 시에만 [`WarningDecision::NotifyExpired`].
/// 만료 전이면 주기를 고르고, 발송 게이트(세션 최초 평가이거나
/// 마지막 발송 이후 주기 이상 경과)를 통과할 때만
/// [`WarningDecision::Remind`]를 낸다.
pub fn evaluate(
    state: &WarningState,
    expiration: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> WarningDecision {
    let Some(expiration) = expiration else {
        return WarningDecision::Skip;
    };

    let Some(remaining) = RemainingTime::until(expiration, now) else {
        // 만료 상태 — 공지는 세션당 1회
        if state.expired_notice_shown {
            return WarningDecision::Skip;
        }
        return WarningDecision::NotifyExpired;
    };

    let Some(cadence) = warning_cadence(&remaining) else {
        // 이틀 넘게 남음 — 이번 폴에서는 아무 것도 하지 않는다
        return WarningDecision::Skip;
    };

    let elapsed_enough = state
        .last_warning_at
        .map_or(true, |last| now - last >= cadence);
    if !state.initial_check_done || elapsed_enough {
        WarningDecision::Remind {
            message: warning_message(&remaining),
        }
    } else {
        WarningDecision::Skip
    }
}
