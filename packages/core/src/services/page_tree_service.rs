//! Page Tree Service - The Reconciler
//!
//! This module provides the owned-state controller behind the page-hierarchy
//! admin surface:
//!
//! - Filter / search composition over the flat page list
//! - Drag lifecycle (`begin_drag` / `complete_drag` / `cancel_drag`) with
//!   move validation (type constraints, cycle guard)
//! - Path propagation across a moved subtree, accumulating edit records
//! - Batched save through the [`PageStore`] seam
//!
//! # State model
//!
//! The flat `pages` list is authoritative. The working set is the filtered,
//! row-capped view of it; the nested tree handed to renderers is built from
//! the working set on demand ([`PageTreeService::tree`]) and is always a
//! complete snapshot, never a partial mutation of a previous one.
//!
//! All mutation is synchronous. The only async boundary is the batched save;
//! while one is in flight, structural edits are rejected with
//! [`ReconcilerError::SaveInFlight`] so the serialized batch stays immutable.

use crate::models::{
    EditRecord, EditSet, Page, PageTreeNode, StatusFilter, UpdatePagesPathRequest,
};
use crate::services::error::ReconcilerError;
use crate::services::notifier::{Notifier, TracingNotifier};
use crate::services::{cycle, path, tree_builder};
use crate::store::{PageStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;

/// Default cap on visible rows
pub const DEFAULT_MAX_ROWS: usize = 999;

/// Rows added per "show more" request
pub const SHOW_MORE_STEP: usize = 30;

/// Where a drag ended, decided synchronously by the input layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped onto a specific row
    Row(String),
    /// Dropped on empty space: detach to root
    Background,
    /// Drag abandoned
    Cancelled,
}

/// Result of a completed drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The page was reparented; `edits_recorded` pages were touched by path
    /// propagation in this operation
    Moved { edits_recorded: usize },
    /// The drop was a no-op (same parent, dropped on itself, already root)
    Unchanged,
    /// The drag was abandoned without mutation
    Cancelled,
}

/// Bulk label operation over a selection of pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkTagAction {
    Add,
    Remove,
}

#[derive(Debug)]
struct DragState {
    page_idx: usize,
}

/// The tree reconciler.
///
/// Owns the flat page list of one website and every piece of edit-session
/// state (filter, search, drag, pending edits), exposing explicit operations
/// instead of ambient mutable fields.
///
/// # Examples
///
/// ```
/// use pagetree_core::models::{Page, PageType};
/// use pagetree_core::services::{DropTarget, PageTreeService};
///
/// let index = Page::new_with_id(
///     "idx".into(), "Blog".into(), "/blog/index.html".into(),
///     PageType::BlogIndex, None,
/// );
/// let post = Page::new_with_id(
///     "post".into(), "Post".into(), "/post.html".into(),
///     PageType::Post, None,
/// );
///
/// let mut service = PageTreeService::new("site-1", vec![index, post]);
/// service.begin_drag("post").unwrap();
/// service.complete_drag(DropTarget::Row("idx".to_string())).unwrap();
///
/// assert_eq!(service.page("post").unwrap().path, "/blog/index/post.html");
/// assert_eq!(service.edit_count(), 1);
/// ```
pub struct PageTreeService {
    website_id: String,
    /// Authoritative flat page list
    pages: Vec<Page>,
    filter: StatusFilter,
    search_term: String,
    /// Indices into `pages` forming the current working set
    working: Vec<usize>,
    max_rows: usize,
    showing_all_rows: bool,
    edits: EditSet,
    modified: bool,
    drag: Option<DragState>,
    saving: bool,
    notifier: Arc<dyn Notifier>,
}

impl PageTreeService {
    /// Create a reconciler over a website's flat page list
    ///
    /// Pages failing structural validation are kept (the operator must still
    /// see them) but logged.
    pub fn new(website_id: impl Into<String>, pages: Vec<Page>) -> Self {
        for page in &pages {
            if let Err(err) = page.validate() {
                tracing::warn!(page_id = %page.id, %err, "loaded page fails validation");
            }
        }

        let mut service = Self {
            website_id: website_id.into(),
            pages,
            filter: StatusFilter::default(),
            search_term: String::new(),
            working: Vec::new(),
            max_rows: DEFAULT_MAX_ROWS,
            showing_all_rows: true,
            edits: EditSet::new(),
            modified: false,
            drag: None,
            saving: false,
            notifier: Arc::new(TracingNotifier),
        };
        service.recompute_working();
        service
    }

    /// Replace the notifier collaborator
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Load a website's pages from a store and build a reconciler over them
    pub async fn load(
        website_id: &str,
        store: &dyn PageStore,
    ) -> Result<Self, ReconcilerError> {
        let pages = store.load_pages(website_id).await?;
        tracing::info!(website_id, count = pages.len(), "loaded page list");
        Ok(Self::new(website_id, pages))
    }

    // --- Accessors ---

    pub fn website_id(&self) -> &str {
        &self.website_id
    }

    /// The authoritative flat page list
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Look up a page by id in the full list
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.index_of(page_id).map(|idx| &self.pages[idx])
    }

    /// The current working set (filtered, row-capped), in display order
    pub fn working_pages(&self) -> Vec<&Page> {
        self.working.iter().map(|&idx| &self.pages[idx]).collect()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Whether the row cap currently hides part of the working set
    pub fn showing_all_rows(&self) -> bool {
        self.showing_all_rows
    }

    /// Whether unsaved structural edits exist
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Number of pending edit records
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Pending edit records in batch order
    pub fn pending_edits(&self) -> &[EditRecord] {
        self.edits.records()
    }

    /// The page currently being dragged, if any
    pub fn dragged_page(&self) -> Option<&Page> {
        self.drag.as_ref().map(|state| &self.pages[state.page_idx])
    }

    // --- Filter / search / paging ---

    /// Apply a status filter; clears any active search
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.search_term.clear();
        self.recompute_working();
        tracing::debug!(?filter, visible = self.working.len(), "status filter applied");
    }

    /// Apply a free-text search over the full flat list.
    ///
    /// A non-empty search overrides the status filter; an empty term falls
    /// back to it.
    pub fn search(&mut self, term: &str) {
        self.search_term = term.trim().to_lowercase();
        self.recompute_working();
    }

    /// Raise the row cap by one step
    pub fn show_more(&mut self) {
        self.max_rows += SHOW_MORE_STEP;
        self.recompute_working();
    }

    /// Reset the row cap to its default
    pub fn reset_row_cap(&mut self) {
        self.max_rows = DEFAULT_MAX_ROWS;
        self.recompute_working();
    }

    /// Build a nested tree snapshot of the current working set.
    ///
    /// Always a complete, freshly built snapshot; the rendering layer
    /// replaces its previous tree wholesale.
    pub fn tree(&self) -> Vec<PageTreeNode> {
        tree_builder::build_tree(&self.working_snapshot())
    }

    // --- Drag lifecycle ---

    /// Start dragging a page of the working set
    ///
    /// # Errors
    ///
    /// Returns error if a save is in flight, the page is not in the working
    /// set, or its type is not draggable.
    pub fn begin_drag(&mut self, page_id: &str) -> Result<(), ReconcilerError> {
        if self.saving {
            return Err(ReconcilerError::SaveInFlight);
        }
        let idx = self
            .working
            .iter()
            .copied()
            .find(|&idx| self.pages[idx].id == page_id)
            .ok_or_else(|| ReconcilerError::page_not_found(page_id))?;

        let page = &self.pages[idx];
        if !page.page_type.is_draggable() {
            let msg = format!(
                "Pages of type {} cannot be moved",
                page.page_type.as_str()
            );
            self.notifier.alert(&msg);
            return Err(ReconcilerError::hierarchy_violation(msg));
        }

        self.drag = Some(DragState { page_idx: idx });
        tracing::debug!(page_id, "drag started");
        Ok(())
    }

    /// Abandon the drag in progress, if any
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Complete the drag in progress against an explicit drop target.
    ///
    /// Any rejection (unknown target, non-droppable type, cycle) leaves the
    /// tree unchanged and clears the drag; the operator is alerted through
    /// the notifier.
    ///
    /// # Errors
    ///
    /// Returns error if a save is in flight, no drag is in progress, the
    /// target row is unknown or does not accept children, the move would
    /// create a cycle, or the dragged page's own path is malformed.
    pub fn complete_drag(&mut self, target: DropTarget) -> Result<DragOutcome, ReconcilerError> {
        if self.saving {
            self.drag = None;
            return Err(ReconcilerError::SaveInFlight);
        }
        let state = match self.drag.take() {
            Some(state) => state,
            None if target == DropTarget::Cancelled => return Ok(DragOutcome::Cancelled),
            None => return Err(ReconcilerError::NoActiveDrag),
        };
        let dragged_idx = state.page_idx;
        let dragged_id = self.pages[dragged_idx].id.clone();

        match target {
            DropTarget::Cancelled => Ok(DragOutcome::Cancelled),

            DropTarget::Background => {
                self.check_dragged_path(dragged_idx)?;
                let parent_changed = self.pages[dragged_idx].parent_id.take().is_some();
                let recorded = self.propagate_paths(dragged_idx, None, parent_changed);
                if recorded == 0 {
                    return Ok(DragOutcome::Unchanged);
                }
                tracing::debug!(page_id = %dragged_id, recorded, "page detached to root");
                Ok(DragOutcome::Moved {
                    edits_recorded: recorded,
                })
            }

            DropTarget::Row(target_id) => {
                if target_id == dragged_id {
                    return Ok(DragOutcome::Unchanged);
                }
                let target_idx = self
                    .working
                    .iter()
                    .copied()
                    .find(|&idx| self.pages[idx].id == target_id)
                    .ok_or_else(|| ReconcilerError::invalid_parent(&target_id))?;

                let target_page = &self.pages[target_idx];
                if !target_page.page_type.accepts_children() {
                    let msg = format!(
                        "Can only drop into a page of type BLOG_INDEX, not {}",
                        target_page.page_type.as_str()
                    );
                    self.notifier.alert(&msg);
                    return Err(ReconcilerError::hierarchy_violation(msg));
                }
                if self.pages[dragged_idx].parent_id.as_deref() == Some(target_id.as_str()) {
                    return Ok(DragOutcome::Unchanged);
                }
                if cycle::would_create_cycle(&self.working_snapshot(), &dragged_id, &target_id) {
                    self.notifier.alert("Cannot insert a page into its own subtree");
                    return Err(ReconcilerError::circular_reference(format!(
                        "cannot move page {dragged_id} under its descendant {target_id}"
                    )));
                }
                self.check_dragged_path(dragged_idx)?;

                let parent_path = self.pages[target_idx].path.clone();
                self.pages[dragged_idx].parent_id = Some(target_id.clone());
                let recorded = self.propagate_paths(dragged_idx, Some(parent_path), true);
                tracing::debug!(
                    page_id = %dragged_id,
                    new_parent = %target_id,
                    recorded,
                    "page reparented"
                );
                Ok(DragOutcome::Moved {
                    edits_recorded: recorded,
                })
            }
        }
    }

    // --- Save ---

    /// Snapshot the pending edits as a save batch and mark a save in flight.
    ///
    /// Returns `Ok(None)` when there is nothing to save. Until
    /// [`complete_save`](Self::complete_save) is called, structural edits are
    /// rejected so the batch cannot drift while serialized on the wire.
    pub fn begin_save(&mut self) -> Result<Option<UpdatePagesPathRequest>, ReconcilerError> {
        if self.saving {
            return Err(ReconcilerError::SaveInFlight);
        }
        if self.edits.is_empty() {
            return Ok(None);
        }
        self.saving = true;
        Ok(Some(UpdatePagesPathRequest {
            website_id: self.website_id.clone(),
            pages: self.edits.records().to_vec(),
        }))
    }

    /// Report the outcome of a save started with [`begin_save`](Self::begin_save).
    ///
    /// Success clears the edit set and the modified flag; failure preserves
    /// both so the operator can simply save again.
    pub fn complete_save(&mut self, result: Result<(), StoreError>) -> Result<usize, ReconcilerError> {
        if !self.saving {
            return Err(ReconcilerError::NoActiveSave);
        }
        self.saving = false;
        match result {
            Ok(()) => {
                let saved = self.edits.len();
                self.edits.clear();
                self.modified = false;
                self.notifier.success("Saved changes");
                tracing::info!(pages = saved, "page tree changes saved");
                Ok(saved)
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to save page tree: {err}"));
                Err(err.into())
            }
        }
    }

    /// Flush the pending edit batch through a store.
    ///
    /// Convenience composition of [`begin_save`](Self::begin_save) and
    /// [`complete_save`](Self::complete_save); returns the number of records
    /// saved (0 when there was nothing to save).
    pub async fn save(&mut self, store: &dyn PageStore) -> Result<usize, ReconcilerError> {
        let batch = match self.begin_save()? {
            Some(batch) => batch,
            None => return Ok(0),
        };
        let result = store.update_pages_path(&batch).await;
        self.complete_save(result)
    }

    // --- Bulk tagging & cloning ---

    /// Add or remove labels across a selection of pages, idempotently.
    ///
    /// Returns the number of pages actually changed. Validates the whole
    /// selection first; an unknown id leaves every page untouched.
    pub fn bulk_tag(
        &mut self,
        page_ids: &[String],
        labels: &[String],
        action: BulkTagAction,
    ) -> Result<usize, ReconcilerError> {
        let mut indices = Vec::with_capacity(page_ids.len());
        for page_id in page_ids {
            indices.push(
                self.index_of(page_id)
                    .ok_or_else(|| ReconcilerError::page_not_found(page_id))?,
            );
        }

        let mut touched = 0;
        for idx in indices {
            let page = &mut self.pages[idx];
            let mut changed = false;
            for label in labels {
                match action {
                    BulkTagAction::Add => {
                        if !page.semantic_tags.contains(label) {
                            page.semantic_tags.push(label.clone());
                            changed = true;
                        }
                    }
                    BulkTagAction::Remove => {
                        if let Some(pos) = page.semantic_tags.iter().position(|tag| tag == label) {
                            page.semantic_tags.remove(pos);
                            changed = true;
                        }
                    }
                }
            }
            if changed {
                touched += 1;
            }
        }
        tracing::debug!(?action, touched, "bulk label edit applied");
        Ok(touched)
    }

    /// Pick a collision-free root path for a clone of a page
    pub fn clone_path_for(&self, page_id: &str) -> Result<String, ReconcilerError> {
        let page = self
            .page(page_id)
            .ok_or_else(|| ReconcilerError::page_not_found(page_id))?;
        Ok(path::unique_clone_path(&self.pages, &page.page_name))
    }

    /// Clone a page through the store and adopt the result locally
    pub async fn clone_page(
        &mut self,
        page_id: &str,
        store: &dyn PageStore,
    ) -> Result<Page, ReconcilerError> {
        let new_path = self.clone_path_for(page_id)?;
        let clone = store
            .clone_page(&self.website_id, page_id, &new_path)
            .await?;
        self.pages.push(clone.clone());
        self.recompute_working();
        tracing::info!(source = page_id, clone_id = %clone.id, path = %clone.path, "page cloned");
        Ok(clone)
    }

    // --- Helpers ---

    fn index_of(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == page_id)
    }

    fn recompute_working(&mut self) {
        let mut matches: Vec<usize> = if self.search_term.is_empty() {
            self.pages
                .iter()
                .enumerate()
                .filter(|(_, page)| self.filter.matches(page))
                .map(|(idx, _)| idx)
                .collect()
        } else {
            self.pages
                .iter()
                .enumerate()
                .filter(|(_, page)| page.matches_search(&self.search_term))
                .map(|(idx, _)| idx)
                .collect()
        };
        self.showing_all_rows = matches.len() <= self.max_rows;
        matches.truncate(self.max_rows);
        self.working = matches;
    }

    fn working_snapshot(&self) -> Vec<Page> {
        self.working
            .iter()
            .map(|&idx| self.pages[idx].clone())
            .collect()
    }

    /// Children of each working-set page, keyed by parent id, in display order
    fn working_children_map(&self) -> HashMap<String, Vec<usize>> {
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for &idx in &self.working {
            if let Some(parent_id) = self.pages[idx].parent_id.as_deref() {
                children.entry(parent_id.to_string()).or_default().push(idx);
            }
        }
        children
    }

    /// Reject a move upfront when the dragged page's own path cannot be
    /// recomputed. Custom-path pages are exempt (their path is never
    /// rewritten anyway).
    fn check_dragged_path(&self, dragged_idx: usize) -> Result<(), ReconcilerError> {
        let page = &self.pages[dragged_idx];
        if !page.is_custom_path && path::leaf_segment(&page.path, page.page_type).is_none() {
            let msg = format!(
                "Path '{}' of page '{}' has an unexpected shape; the page cannot be moved",
                page.path, page.page_name
            );
            self.notifier.alert(&msg);
            return Err(ReconcilerError::path_pattern_mismatch(&page.id, &page.path));
        }
        Ok(())
    }

    /// Recompute the path of a moved page and cascade depth-first into its
    /// working-set descendants, recording an edit for every page whose path
    /// or parent actually changed.
    ///
    /// Custom-path pages keep their own path but are not roots of exemption:
    /// their non-custom children are still rewritten relative to the
    /// unchanged custom path. A descendant whose path fails the leaf-segment
    /// pattern is skipped (warn + alert) without aborting the cascade.
    ///
    /// Returns the number of edit records recorded.
    fn propagate_paths(
        &mut self,
        root_idx: usize,
        parent_path: Option<String>,
        parent_changed: bool,
    ) -> usize {
        let children = self.working_children_map();
        let mut recorded = 0;
        // Depth-first, parent before children: each child's path is computed
        // relative to its parent's already-updated path.
        let mut stack = vec![(root_idx, parent_path, parent_changed)];

        while let Some((idx, parent_path, parent_changed)) = stack.pop() {
            let old_path = self.pages[idx].path.clone();

            if !self.pages[idx].is_custom_path {
                match path::leaf_segment(&old_path, self.pages[idx].page_type) {
                    Some(leaf) => {
                        self.pages[idx].path = match parent_path.as_deref() {
                            Some(parent_path) => path::join_under_parent(parent_path, leaf),
                            None => leaf.to_string(),
                        };
                    }
                    None => {
                        let page = &self.pages[idx];
                        tracing::warn!(
                            page_id = %page.id,
                            path = %old_path,
                            "path does not match the expected shape; leaving it unchanged"
                        );
                        self.notifier.alert(&format!(
                            "Path '{}' of page '{}' has an unexpected shape and was left unchanged",
                            old_path, page.page_name
                        ));
                    }
                }
            }

            if parent_changed || self.pages[idx].path != old_path {
                self.edits.upsert(EditRecord::snapshot(&self.pages[idx]));
                self.modified = true;
                recorded += 1;
            }

            let next_parent = self.pages[idx].path.clone();
            if let Some(child_indices) = children.get(&self.pages[idx].id) {
                // Reversed so the stack pops children in display order
                for &child_idx in child_indices.iter().rev() {
                    stack.push((child_idx, Some(next_parent.clone()), false));
                }
            }
        }
        recorded
    }
}
