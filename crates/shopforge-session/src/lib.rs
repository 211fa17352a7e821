//! # shopforge-session
//!
//! SHOPFORGE 세션 오케스트레이션.
//! 설정 문서 스토어 위에서 자동 저장 플래너, 라이선스 만료 감시,
//! 스냅샷/내보내기 관리자를 조립한다.
//!
//! ## 구조
//!
//! - [`session`] — 세션 와이어링과 수명주기
//! - [`autosave`] — 자동 저장 플래너 (해제-재무장 타이머)
//! - [`warning`] — 라이선스 만료 경고 판단 (순수 함수)
//! - [`watcher`] — 경고 발송 + 60초 폴 루프
//! - [`snapshots`] — 스냅샷 저장/로드/삭제
//! - [`export`] — 문서 파일 내보내기
//! - [`licensing`] — 라이선스 상태 관리

pub mod autosave;
pub mod export;
pub mod licensing;
pub mod session;
pub mod snapshots;
pub mod warning;
pub mod watcher;

pub use autosave::AutoSavePlanner;
pub use export::Exporter;
pub use licensing::LicenseService;
pub use session::{EditorSession, SessionPorts};
pub use snapshots::SnapshotManager;
pub use watcher::{LicenseWarningManager, LicenseWatcher};

/// tracing 구독자 초기화.
///
/// `RUST_LOG` 환경 변수로 필터를 지정하고, 없으면 `info`를 쓴다.
/// 이미 초기화돼 있으면 조용히 넘어간다.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
