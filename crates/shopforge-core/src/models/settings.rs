//! 에디터 앱 설정 모델.
//!
//! 설정은 영속화 협력자(`SettingsStore` 포트)를 통해 저장/로드되며,
//! 스케줄러 상태는 항상 이 레코드의 현재 값에서 재유도된다.

use serde::{Deserialize, Serialize};

/// 에디터 앱 설정 (영속화 대상)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// 내보내기 기본 출력 경로
    #[serde(default)]
    pub output_path: String,
    /// 자동 저장 활성화 여부
    #[serde(default)]
    pub auto_save_enabled: bool,
    /// 자동 저장 간격 (분, 1 이상)
    #[serde(default = "default_auto_save_interval")]
    pub auto_save_interval: u32,
    /// 폼 툴팁 표시 여부
    #[serde(default = "default_true")]
    pub show_tooltips: bool,
}

fn default_auto_save_interval() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_path: String::new(),
            auto_save_enabled: false,
            auto_save_interval: default_auto_save_interval(),
            show_tooltips: true,
        }
    }
}

impl AppSettings {
    /// 자동 저장 플래너가 보는 설정 조각
    pub fn auto_save(&self) -> AutoSaveSettings {
        AutoSaveSettings {
            enabled: self.auto_save_enabled,
            interval_minutes: self.auto_save_interval.max(1),
        }
    }
}

/// 자동 저장 설정 (플래너 입력)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveSettings {
    /// 활성화 여부
    pub enabled: bool,
    /// 저장 시도 간격 (분, 항상 1 이상)
    pub interval_minutes: u32,
}

impl AutoSaveSettings {
    /// 간격을 `Duration`으로 변환
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }
}
