//! 편집 세션 와이어링.
//!
//! 스토어, 자동 저장 플래너, 라이선스 감시자, 스냅샷/내보내기 관리자를
//! 협력자 포트 묶음으로 조립하고 수명주기를 관리한다.
//! 세션이 끝나면 모든 타이머와 루프를 반드시 해제한다.

use std::sync::{Arc, Mutex};

use shopforge_core::error::CoreResult;
use shopforge_core::models::settings::AppSettings;
use shopforge_core::ports::exporter::DocumentExporter;
use shopforge_core::ports::licensing::LicenseAuthority;
use shopforge_core::ports::notifier::{NoticeKind, NoticeOptions, ToastNotifier};
use shopforge_core::ports::persistence::{ConfigPersistence, SettingsStore};
use shopforge_core::store::{ConfigStore, StoreEvent};
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::autosave::AutoSavePlanner;
use crate::export::Exporter;
use crate::licensing::LicenseService;
use crate::snapshots::SnapshotManager;
use crate::watcher::{LicenseWarningManager, LicenseWatcher};

/// 세션에 주입되는 협력자 포트 묶음
pub struct SessionPorts {
    /// 스냅샷 저장소
    pub persistence: Arc<dyn ConfigPersistence>,
    /// 앱 설정 저장소
    pub settings: Arc<dyn SettingsStore>,
    /// 문서 파일 내보내기
    pub exporter: Arc<dyn DocumentExporter>,
    /// 라이선스 검증기
    pub license: Arc<dyn LicenseAuthority>,
    /// 토스트 싱크
    pub notifier: Arc<dyn ToastNotifier>,
}

/// 편집 세션.
///
/// 프로세스당 하나 생성되어 UI 레이어에 참조로 전달된다.
/// 스토어 이벤트를 구독해 로드 핸들이 바뀔 때마다 자동 저장
/// 플래너를 재무장한다.
pub struct EditorSession {
    session_id: Uuid,
    store: Arc<ConfigStore>,
    snapshots: SnapshotManager,
    exporter: Exporter,
    licensing: LicenseService,
    planner: Arc<AutoSavePlanner>,
    watcher: Arc<LicenseWatcher>,
    settings: Arc<RwLock<AppSettings>>,
    settings_store: Arc<dyn SettingsStore>,
    shutdown_tx: watch::Sender<bool>,
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl EditorSession {
    /// 세션 구성 + 시작.
    ///
    /// 설정 로드 실패는 치명적이지 않다 — 기본값으로 계속하고
    /// 에러 토스트만 낸다. 저장된 라이선스 정보가 있으면
    /// 만료 감시를 바로 시작한다.
    pub async fn start(ports: SessionPorts) -> Self {
        let session_id = Uuid::new_v4();
        let store = Arc::new(ConfigStore::new());

        let warning_manager = Arc::new(LicenseWarningManager::new(ports.notifier.clone()));
        let watcher = Arc::new(LicenseWatcher::new(warning_manager));
        let planner = Arc::new(AutoSavePlanner::new(
            store.clone(),
            ports.persistence.clone(),
            ports.notifier.clone(),
        ));
        let snapshots = SnapshotManager::new(store.clone(), ports.persistence.clone());
        let exporter = Exporter::new(store.clone(), ports.exporter.clone());
        let licensing = LicenseService::new(ports.license.clone(), watcher.clone());

        // 설정 부트스트랩
        let settings = match ports.settings.load_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("설정 로드 실패, 기본값 사용: {e}");
                let _ = ports
                    .notifier
                    .notify(
                        NoticeKind::Error,
                        "Failed to load settings",
                        &NoticeOptions::toast(),
                    )
                    .await;
                AppSettings::default()
            }
        };
        planner.rearm(settings.auto_save());
        let settings = Arc::new(RwLock::new(settings));

        // 저장된 라이선스 정보가 있으면 감시 시작
        if let Err(e) = licensing.refresh().await {
            warn!("라이선스 상태 조회 실패: {e}");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let event_task = Self::spawn_event_loop(
            store.subscribe(),
            planner.clone(),
            settings.clone(),
            shutdown_rx,
        );

        info!("에디터 세션 시작: session_id={session_id}");
        Self {
            session_id,
            store,
            snapshots,
            exporter,
            licensing,
            planner,
            watcher,
            settings,
            settings_store: ports.settings,
            shutdown_tx,
            event_task: Mutex::new(Some(event_task)),
        }
    }

    /// 스토어 이벤트 루프 — 핸들 변경 시 플래너 재무장
    fn spawn_event_loop(
        mut rx: broadcast::Receiver<StoreEvent>,
        planner: Arc<AutoSavePlanner>,
        settings: Arc<RwLock<AppSettings>>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = rx.recv() => match event {
                        Ok(StoreEvent::HandleChanged(_)) => {
                            let auto = settings.read().await.auto_save();
                            planner.rearm(auto);
                            debug!("로드 핸들 변경 — 자동 저장 재무장");
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("스토어 이벤트 {n}개 유실");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = shutdown_rx.changed() => {
                        debug!("스토어 이벤트 루프 종료");
                        break;
                    }
                }
            }
        })
    }

    /// 세션 식별자 (로그 상관관계용)
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// 설정 문서 스토어
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// 스냅샷 관리자
    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    /// 내보내기 서비스
    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// 라이선스 서비스
    pub fn licensing(&self) -> &LicenseService {
        &self.licensing
    }

    /// 현재 앱 설정 (복제본)
    pub async fn settings(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    /// 설정 변경 — 저장 후 플래너 재무장.
    ///
    /// 저장 실패 시 메모리 설정과 타이머는 바뀌지 않는다.
    pub async fn update_settings(&self, new_settings: AppSettings) -> CoreResult<()> {
        self.settings_store.save_settings(&new_settings).await?;
        *self.settings.write().await = new_settings.clone();
        self.planner.rearm(new_settings.auto_save());
        info!(
            "설정 갱신: 자동 저장={} 간격={}분",
            new_settings.auto_save_enabled, new_settings.auto_save_interval
        );
        Ok(())
    }

    /// 세션 종료 — 모든 타이머/루프 해제 (필수 자원 해제)
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        self.watcher.shutdown();
        self.planner.shutdown();
        if let Some(handle) = self.event_task.lock().unwrap().take() {
            handle.abort();
        }
        info!("에디터 세션 종료: session_id={}", self.session_id);
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
