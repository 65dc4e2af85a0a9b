//! Reconciler Integration Tests
//!
//! End-to-end sessions over the [`PageStore`] seam:
//! - Load → drag → save, verifying the persisted paths
//! - Save failure keeping the edit batch intact for retry
//! - Clone flow adopting the stored page locally
//! - Bulk labelling persisted through a follow-up reload
//!
//! All tests run against [`MemoryPageStore`]; one uses a flaky wrapper to
//! exercise the failure path of the save contract.

#[cfg(test)]
mod reconciler_scenario_tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use pagetree_core::models::{Page, PageType, UpdatePagesPathRequest};
    use pagetree_core::services::{BulkTagAction, DropTarget, PageTreeService, ReconcilerError};
    use pagetree_core::store::{MemoryPageStore, PageStore, StoreError};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn page(id: &str, path: &str, page_type: PageType, parent: Option<&str>) -> Page {
        Page::new_with_id(
            id.to_string(),
            id.to_string(),
            path.to_string(),
            page_type,
            parent.map(str::to_string),
        )
    }

    /// Seed a store with a small blog hierarchy
    async fn seeded_store() -> MemoryPageStore {
        let store = MemoryPageStore::new();
        store
            .insert_website(
                "site-1",
                vec![
                    page("idx", "/blog/index.html", PageType::BlogIndex, None),
                    page("post-a", "/blog/index/post-a.html", PageType::Post, Some("idx")),
                    page("post-b", "/post-b.html", PageType::Post, None),
                    page("legal", "/legal.html", PageType::Legal, None),
                ],
            )
            .await;
        store
    }

    /// Store wrapper whose first save attempt fails with `Unavailable`
    struct FlakyStore {
        inner: MemoryPageStore,
        fail_next_save: AtomicBool,
    }

    #[async_trait]
    impl PageStore for FlakyStore {
        async fn load_pages(&self, website_id: &str) -> Result<Vec<Page>, StoreError> {
            self.inner.load_pages(website_id).await
        }

        async fn update_pages_path(
            &self,
            batch: &UpdatePagesPathRequest,
        ) -> Result<(), StoreError> {
            if self.fail_next_save.swap(false, Ordering::SeqCst) {
                return Err(StoreError::unavailable("simulated outage"));
            }
            self.inner.update_pages_path(batch).await
        }

        async fn clone_page(
            &self,
            website_id: &str,
            page_id: &str,
            new_path: &str,
        ) -> Result<Page, StoreError> {
            self.inner.clone_page(website_id, page_id, new_path).await
        }
    }

    #[tokio::test]
    async fn test_load_move_save_roundtrip() -> Result<()> {
        init_tracing();
        let store = seeded_store().await;
        let mut service = PageTreeService::load("site-1", &store).await?;
        assert_eq!(service.pages().len(), 4);

        // Move the loose post under the blog index, then detach the nested one
        service.begin_drag("post-b")?;
        service.complete_drag(DropTarget::Row("idx".to_string()))?;
        service.begin_drag("post-a")?;
        service.complete_drag(DropTarget::Background)?;

        assert_eq!(service.edit_count(), 2);
        let saved = service.save(&store).await?;
        assert_eq!(saved, 2);
        assert_eq!(service.edit_count(), 0);
        assert!(!service.is_modified());

        // The store reflects both moves
        let stored_b = store.get_page("site-1", "post-b").await.unwrap();
        assert_eq!(stored_b.path, "/blog/index/post-b.html");
        assert_eq!(stored_b.parent_id.as_deref(), Some("idx"));
        let stored_a = store.get_page("site-1", "post-a").await.unwrap();
        assert_eq!(stored_a.path, "/post-a.html");
        assert!(stored_a.parent_id.is_none());

        // A fresh load agrees with the reconciler's local state
        let reloaded = PageTreeService::load("site-1", &store).await?;
        assert_eq!(
            reloaded.page("post-b").unwrap().path,
            service.page("post-b").unwrap().path
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_for_retry() -> Result<()> {
        init_tracing();
        let store = FlakyStore {
            inner: seeded_store().await,
            fail_next_save: AtomicBool::new(true),
        };
        let mut service = PageTreeService::load("site-1", &store).await?;

        service.begin_drag("post-b")?;
        service.complete_drag(DropTarget::Row("idx".to_string()))?;

        let failed = service.save(&store).await;
        assert!(matches!(failed, Err(ReconcilerError::StoreFailed(_))));
        assert_eq!(service.edit_count(), 1);
        assert!(service.is_modified());
        assert!(!service.is_saving());
        // Nothing was applied remotely
        let stored = store.inner.get_page("site-1", "post-b").await.unwrap();
        assert_eq!(stored.path, "/post-b.html");

        // The retry flushes the same batch
        assert_eq!(service.save(&store).await?, 1);
        let stored = store.inner.get_page("site-1", "post-b").await.unwrap();
        assert_eq!(stored.path, "/blog/index/post-b.html");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_with_no_pending_edits_is_a_no_op() -> Result<()> {
        let store = seeded_store().await;
        let mut service = PageTreeService::load("site-1", &store).await?;
        assert_eq!(service.save(&store).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_clone_page_adopts_store_result() -> Result<()> {
        init_tracing();
        let store = seeded_store().await;
        let mut service = PageTreeService::load("site-1", &store).await?;

        let clone = service.clone_page("post-b", &store).await?;
        assert_ne!(clone.id, "post-b");
        assert_ne!(clone.path, "/post-b.html");
        assert!(clone.parent_id.is_none());

        // Adopted locally and persisted remotely under the same id
        assert_eq!(service.pages().len(), 5);
        assert!(service.page(&clone.id).is_some());
        let stored = store.get_page("site-1", &clone.id).await.unwrap();
        assert_eq!(stored.path, clone.path);

        // A second clone of the same source picks a fresh path
        let clone2 = service.clone_page("post-b", &store).await?;
        assert_ne!(clone2.path, clone.path);
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_tagging_survives_a_session() -> Result<()> {
        let store = seeded_store().await;
        let mut service = PageTreeService::load("site-1", &store).await?;

        let ids = vec!["post-a".to_string(), "post-b".to_string()];
        let labels = vec!["seasonal".to_string()];
        assert_eq!(service.bulk_tag(&ids, &labels, BulkTagAction::Add)?, 2);
        assert!(service
            .page("post-a")
            .unwrap()
            .semantic_tags
            .contains(&"seasonal".to_string()));

        // Labels are session state, not part of the path-save batch
        assert!(service.begin_save()?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_loading_unknown_website_is_an_error() {
        let store = MemoryPageStore::new();
        let result = PageTreeService::load("missing", &store).await;
        assert!(matches!(result, Err(ReconcilerError::StoreFailed(_))));
    }

    #[tokio::test]
    async fn test_tree_snapshot_tracks_saved_moves() -> Result<()> {
        let store = seeded_store().await;
        let mut service = PageTreeService::load("site-1", &store).await?;

        service.begin_drag("post-b")?;
        service.complete_drag(DropTarget::Row("idx".to_string()))?;
        service.save(&store).await?;

        let tree = service.tree();
        let idx_node = tree
            .iter()
            .find(|node| node.page.id == "idx")
            .expect("index stays a root");
        let child_ids: Vec<&str> = idx_node
            .children
            .iter()
            .map(|node| node.page.id.as_str())
            .collect();
        assert_eq!(child_ids, vec!["post-a", "post-b"]);
        Ok(())
    }
}
