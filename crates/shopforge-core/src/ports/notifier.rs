//! 토스트 알림 포트.
//!
//! 구현: UI 셸의 토스트 싱크. fire-and-forget —
//! 코어는 반환값을 소비하지 않고 실패는 로그로만 남긴다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreResult;

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// 알림 표시 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticePosition {
    /// 우하단 (저장 토스트)
    BottomRight,
    /// 상단 중앙 (라이선스 경고)
    TopCenter,
}

/// 알림 표시 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeOptions {
    /// 표시 위치
    pub position: NoticePosition,
    /// 자동 닫힘까지의 시간 (None이면 수동으로만 닫힘)
    pub auto_close: Option<Duration>,
    /// 싱크 측 중복 제거용 안정 식별자 (선택)
    pub notice_id: Option<String>,
}

impl NoticeOptions {
    /// 우하단 토스트 (3초 자동 닫힘)
    pub fn toast() -> Self {
        Self {
            position: NoticePosition::BottomRight,
            auto_close: Some(Duration::from_secs(3)),
            notice_id: None,
        }
    }

    /// 상단 중앙 배너 (5초 자동 닫힘)
    pub fn banner() -> Self {
        Self {
            position: NoticePosition::TopCenter,
            auto_close: Some(Duration::from_secs(5)),
            notice_id: None,
        }
    }

    /// 상단 중앙 고정 배너 (자동 닫힘 없음, 안정 id로 중복 제거)
    pub fn sticky(notice_id: impl Into<String>) -> Self {
        Self {
            position: NoticePosition::TopCenter,
            auto_close: None,
            notice_id: Some(notice_id.into()),
        }
    }
}

/// 토스트 알림 싱크
#[async_trait]
pub trait ToastNotifier: Send + Sync {
    /// 알림 표시
    async fn notify(
        &self,
        kind: NoticeKind,
        message: &str,
        options: &NoticeOptions,
    ) -> CoreResult<()>;
}
