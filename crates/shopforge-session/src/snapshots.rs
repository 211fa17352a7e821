//! 스냅샷 관리자.
//!
//! 이름 붙은 스냅샷의 저장/로드/삭제/목록을 스토어와 영속화 포트
//! 사이에서 중개한다. 이름 중복 같은 검증 실패는
//! [`CoreError::Validation`]으로 표면화되어 해당 필드 옆에 표시된다.

use std::sync::Arc;

use shopforge_core::error::{CoreError, CoreResult};
use shopforge_core::models::snapshot::{SnapshotHandle, SnapshotId, SnapshotSummary};
use shopforge_core::ports::persistence::ConfigPersistence;
use shopforge_core::store::ConfigStore;
use tracing::info;

/// 스냅샷 관리자
pub struct SnapshotManager {
    store: Arc<ConfigStore>,
    persistence: Arc<dyn ConfigPersistence>,
}

impl SnapshotManager {
    /// 새 스냅샷 관리자 생성
    pub fn new(store: Arc<ConfigStore>, persistence: Arc<dyn ConfigPersistence>) -> Self {
        Self { store, persistence }
    }

    /// 현재 문서를 새 이름으로 저장.
    ///
    /// 표시 이름이 비어 있거나 이미 존재하면 검증 에러.
    /// 성공하면 방금 저장한 스냅샷이 로드 상태가 된다.
    pub async fn save_new(&self, name: &str) -> CoreResult<SnapshotId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name", "이름이 비어 있음"));
        }

        let existing = self.persistence.list_snapshots().await?;
        if existing.iter().any(|s| s.name == name) {
            return Err(CoreError::validation(
                "name",
                format!("'{name}' 이름의 스냅샷이 이미 존재함"),
            ));
        }

        let document = self.store.document();
        let id = self
            .persistence
            .persist_document(&document, None, name)
            .await?;
        info!("새 스냅샷 저장: id={id}, name={name}");

        // 저장 직후 해당 스냅샷을 로드 상태로 전환한다
        let body = serde_json::to_string(&document)?;
        self.store.load(SnapshotHandle::new(id, name), &body)?;
        Ok(id)
    }

    /// 현재 로드된 스냅샷에 덮어쓰기 저장
    pub async fn save_current(&self) -> CoreResult<SnapshotId> {
        let handle = self
            .store
            .loaded()
            .ok_or_else(|| CoreError::validation("snapshot", "로드된 스냅샷 없음"))?;

        let document = self.store.document();
        let id = self
            .persistence
            .persist_document(&document, Some(handle.id), &handle.name)
            .await?;
        info!("스냅샷 갱신 저장: id={id}");
        Ok(id)
    }

    /// 저장된 스냅샷을 스토어에 로드
    pub async fn load(&self, id: SnapshotId) -> CoreResult<()> {
        let saved = self.persistence.load_snapshot(id).await?;
        let handle = saved.handle();
        self.store.load(handle, &saved.body)
    }

    /// 스냅샷 삭제 — 현재 로드된 것이면 언로드까지
    pub async fn delete(&self, id: SnapshotId) -> CoreResult<()> {
        self.persistence.delete_snapshot(id).await?;
        info!("스냅샷 삭제: id={id}");
        if self.store.loaded_id() == Some(id) {
            self.store.unload();
        }
        Ok(())
    }

    /// 저장된 스냅샷 목록
    pub async fn list(&self) -> CoreResult<Vec<SnapshotSummary>> {
        self.persistence.list_snapshots().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shopforge_core::models::document::ConfigDocument;
    use shopforge_core::models::snapshot::SavedSnapshot;
    use std::sync::Mutex as StdMutex;

    /// 인메모리 스냅샷 저장소
    struct MemoryPersistence {
        rows: StdMutex<Vec<SavedSnapshot>>,
        next_id: StdMutex<i64>,
    }

    impl MemoryPersistence {
        fn new() -> Self {
            Self {
                rows: StdMutex::new(Vec::new()),
                next_id: StdMutex::new(1),
            }
        }
    }

    #[async_trait]
    impl ConfigPersistence for MemoryPersistence {
        async fn persist_document(
            &self,
            document: &ConfigDocument,
            id: Option<SnapshotId>,
            name: &str,
        ) -> CoreResult<SnapshotId> {
            let body = serde_json::to_string(document)?;
            let mut rows = self.rows.lock().unwrap();
            match id {
                Some(id) => {
                    let row = rows
                        .iter_mut()
                        .find(|r| r.id == id)
                        .ok_or_else(|| CoreError::Persistence(format!("{id} 미발견")))?;
                    row.body = body;
                    row.name = name.to_string();
                    Ok(id)
                }
                None => {
                    let mut next = self.next_id.lock().unwrap();
                    let id = SnapshotId(*next);
                    *next += 1;
                    rows.push(SavedSnapshot {
                        id,
                        name: name.to_string(),
                        body,
                        custom_export_paths: None,
                    });
                    Ok(id)
                }
            }
        }

        async fn load_snapshot(&self, id: SnapshotId) -> CoreResult<SavedSnapshot> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| CoreError::Persistence(format!("{id} 미발견")))
        }

        async fn list_snapshots(&self) -> CoreResult<Vec<SnapshotSummary>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .map(|r| SnapshotSummary {
                    id: r.id,
                    name: r.name.clone(),
                })
                .collect())
        }

        async fn delete_snapshot(&self, id: SnapshotId) -> CoreResult<()> {
            self.rows.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }

    fn manager() -> (SnapshotManager, Arc<ConfigStore>) {
        let store = Arc::new(ConfigStore::new());
        let persistence = Arc::new(MemoryPersistence::new());
        (SnapshotManager::new(store.clone(), persistence), store)
    }

    #[tokio::test]
    async fn save_new_sets_loaded_handle() {
        let (manager, store) = manager();

        let id = manager.save_new("pve-cluster").await.unwrap();

        let loaded = store.loaded().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.name, "pve-cluster");
    }

    #[tokio::test]
    async fn save_new_rejects_duplicate_name() {
        let (manager, _store) = manager();
        manager.save_new("main").await.unwrap();

        let err = manager.save_new("main").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "name"));
    }

    #[tokio::test]
    async fn save_new_rejects_empty_name() {
        let (manager, _store) = manager();
        assert!(manager.save_new("   ").await.is_err());
    }

    #[tokio::test]
    async fn save_current_requires_loaded() {
        let (manager, _store) = manager();
        assert!(matches!(
            manager.save_current().await,
            Err(CoreError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn load_round_trips_saved_document() {
        let (manager, store) = manager();
        use serde_json::json;
        use shopforge_core::models::document::DocumentPatch;

        store.update(DocumentPatch::new().with_section("Kits", json!({"starter": {"Price": 10}})));
        let id = manager.save_new("with-kit").await.unwrap();
        let saved_doc = store.document();

        // 다른 상태로 바꾼 뒤 다시 로드
        store.unload();
        manager.load(id).await.unwrap();

        assert_eq!(store.document(), saved_doc);
        assert_eq!(store.loaded_id(), Some(id));
    }

    #[tokio::test]
    async fn delete_loaded_snapshot_unloads() {
        let (manager, store) = manager();
        let id = manager.save_new("doomed").await.unwrap();
        assert_eq!(store.loaded_id(), Some(id));

        manager.delete(id).await.unwrap();

        assert_eq!(store.loaded_id(), None);
        assert!(manager.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_other_snapshot_keeps_handle() {
        let (manager, store) = manager();
        let first = manager.save_new("first").await.unwrap();
        store.unload();
        let second = manager.save_new("second").await.unwrap();

        manager.delete(first).await.unwrap();

        assert_eq!(store.loaded_id(), Some(second));
        let names: Vec<_> = manager
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["second"]);
    }
}
