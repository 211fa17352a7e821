//! 설정 문서 스토어.
//!
//! 편집 세션의 단일 진실 공급원. 문서에 대한 모든 변경은 이 스토어를
//! 통과하며, 변경은 broadcast 채널로 구독자에게 전파된다.
//! 문서 갱신은 동기·전체 교체 연산이므로 문서 자체에 별도 잠금은 없다.

use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::CoreResult;
use crate::models::document::{ConfigDocument, DocumentPatch};
use crate::models::snapshot::{SnapshotHandle, SnapshotId};

/// 이벤트 채널 용량
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// 스토어 변경 이벤트
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// `update`로 일부 섹션이 갱신됨 (새 문서 포함)
    DocumentUpdated(ConfigDocument),
    /// `load`/`unload`/`import`로 문서가 통째로 교체됨
    DocumentReplaced(ConfigDocument),
    /// 로드된 스냅샷 핸들 변경
    HandleChanged(Option<SnapshotId>),
}

struct StoreInner {
    document: ConfigDocument,
    loaded: Option<SnapshotHandle>,
}

/// 설정 문서 스토어.
///
/// 로드 핸들 수명주기: `load`는 핸들을 설정하고, `unload`/`import`는
/// 해제한다. `update`는 핸들을 절대 바꾸지 않는다.
pub struct ConfigStore {
    inner: RwLock<StoreInner>,
    events: broadcast::Sender<StoreEvent>,
}

impl ConfigStore {
    /// 기본 문서로 초기화된 스토어 생성
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(StoreInner {
                document: ConfigDocument::default(),
                loaded: None,
            }),
            events,
        }
    }

    /// 현재 문서 반환 (복제본)
    pub fn document(&self) -> ConfigDocument {
        self.inner.read().unwrap().document.clone()
    }

    /// 현재 로드된 스냅샷 핸들 반환 (복제본)
    pub fn loaded(&self) -> Option<SnapshotHandle> {
        self.inner.read().unwrap().loaded.clone()
    }

    /// 현재 로드된 스냅샷 id
    pub fn loaded_id(&self) -> Option<SnapshotId> {
        self.inner.read().unwrap().loaded.as_ref().map(|h| h.id)
    }

    /// 변경 이벤트 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// 패치 적용 — 최상위 섹션 단위 얕은 병합.
    ///
    /// 패치에 포함된 섹션은 통째로 교체되고 나머지는 유지된다.
    /// 항상 성공하며 로드 핸들은 바뀌지 않는다. 갱신된 문서를 반환한다.
    pub fn update(&self, patch: DocumentPatch) -> ConfigDocument {
        let document = {
            let mut inner = self.inner.write().unwrap();
            inner.document.apply(patch);
            inner.document.clone()
        };
        debug!("문서 갱신");
        let _ = self.events.send(StoreEvent::DocumentUpdated(document.clone()));
        document
    }

    /// 이전 문서 기반으로 패치를 계산해 적용.
    ///
    /// 패치 계산과 적용이 한 쓰기 잠금 안에서 이뤄진다.
    pub fn update_with<F>(&self, updater: F) -> ConfigDocument
    where
        F: FnOnce(&ConfigDocument) -> DocumentPatch,
    {
        let document = {
            let mut inner = self.inner.write().unwrap();
            let patch = updater(&inner.document);
            inner.document.apply(patch);
            inner.document.clone()
        };
        debug!("문서 갱신 (updater)");
        let _ = self.events.send(StoreEvent::DocumentUpdated(document.clone()));
        document
    }

    /// 직렬화된 스냅샷 본문을 파싱해 문서를 교체하고 핸들을 설정.
    ///
    /// 파싱 실패 시 스토어는 변경되지 않는다.
    pub fn load(&self, handle: SnapshotHandle, serialized: &str) -> CoreResult<()> {
        // 먼저 파싱 — 실패하면 스토어를 건드리지 않는다
        let document = ConfigDocument::parse(serialized)?;

        let id = handle.id;
        {
            let mut inner = self.inner.write().unwrap();
            inner.document = document.clone();
            inner.loaded = Some(handle);
        }
        info!("스냅샷 로드: id={id}");
        let _ = self.events.send(StoreEvent::DocumentReplaced(document));
        let _ = self.events.send(StoreEvent::HandleChanged(Some(id)));
        Ok(())
    }

    /// 핸들 해제 + 기본 문서로 복귀. 항상 성공.
    pub fn unload(&self) {
        let document = ConfigDocument::default();
        {
            let mut inner = self.inner.write().unwrap();
            inner.document = document.clone();
            inner.loaded = None;
        }
        info!("스냅샷 언로드");
        let _ = self.events.send(StoreEvent::DocumentReplaced(document));
        let _ = self.events.send(StoreEvent::HandleChanged(None));
    }

    /// 외부 문서 임포트 — 문서 교체 + 핸들 해제.
    ///
    /// 임포트된 문서는 명시적으로 "저장 안 됨" 상태다
    /// (이름 붙은 스냅샷에서 로드된 상태와 구분된다). 항상 성공.
    pub fn import(&self, document: ConfigDocument) {
        {
            let mut inner = self.inner.write().unwrap();
            inner.document = document.clone();
            inner.loaded = None;
        }
        info!("문서 임포트, 현재 스냅샷 언로드");
        let _ = self.events.send(StoreEvent::DocumentReplaced(document));
        let _ = self.events.send(StoreEvent::HandleChanged(None));
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
