//! The table state machine.
//!
//! [`TableState`] owns every piece of local state and never talks to a
//! provider itself. Handlers that need the provider return a [`Request`];
//! whoever performs it feeds the outcome back through the matching
//! `on_*` method. [`TableController`](super::TableController) does this on
//! tokio tasks.

use log::debug;
use log::info;
use log::warn;

use super::column::ColumnSet;
use super::config::TableConfig;
use super::edit::EditSession;
use super::edit::EditingRow;
use super::query::QueryState;
use super::selection::CheckState;
use super::selection::Selection;
use crate::api::query::Direction;
use crate::api::query::ListParams;
use crate::api::query::Page;
use crate::error::Error;
use crate::error::ProviderError;
use crate::model::Post;
use crate::model::PostId;
use crate::model::PostUpdate;

/// Work the table needs a provider to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch a page. Only the response to the latest `seq` is applied.
    List { seq: u64, params: ListParams },
    /// Save an edited row.
    Update { id: PostId, fields: PostUpdate },
    /// Delete rows, all or nothing.
    DeleteMany { ids: Vec<PostId> },
}

/// A delete waiting for the user to confirm or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub ids: Vec<PostId>,
    /// Prompt to show the user.
    pub message: String,
}

/// Which provider call a [`Notice`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    List,
    Update,
    Delete,
}

/// A non-fatal provider failure to show the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub error: ProviderError,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self.kind {
            NoticeKind::List => "Could not load records",
            NoticeKind::Update => "Could not save changes",
            NoticeKind::Delete => "Could not delete",
        };
        write!(f, "{}: {}", action, self.error)
    }
}

/// How a row renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode<'a> {
    Display,
    /// Editable inputs seeded with the draft.
    Editing(&'a EditingRow),
}

/// One rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowView<'a> {
    pub post: &'a Post,
    pub selected: bool,
    pub mode: RowMode<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mutation {
    Update(PostId),
    Delete(Vec<PostId>),
}

/// Local state of the posts table.
#[derive(Debug)]
pub struct TableState {
    config: TableConfig,
    columns: ColumnSet,
    query: QueryState,
    selection: Selection,
    edit: EditSession,
    page: Page,
    /// A page has been applied at least once.
    loaded: bool,
    /// Sequence number of the latest list request.
    seq: u64,
    /// Sequence number of the list request whose response is still wanted.
    fetching: Option<u64>,
    mutation: Option<Mutation>,
    /// An invalidation arrived while a mutation was in flight.
    refresh_deferred: bool,
    pending_delete: Option<PendingDelete>,
    notice: Option<Notice>,
}

impl TableState {
    /// Creates table state for the posts columns.
    pub fn new(config: TableConfig) -> Self {
        Self::with_columns(config, ColumnSet::posts())
    }

    /// Creates table state with custom columns.
    pub fn with_columns(config: TableConfig, columns: ColumnSet) -> Self {
        let query = QueryState::new(config.initial_page_size(), config.page_sizes());
        Self {
            config,
            columns,
            query,
            selection: Selection::new(),
            edit: EditSession::Idle,
            page: Page::default(),
            loaded: false,
            seq: 0,
            fetching: None,
            mutation: None,
            refresh_deferred: false,
            pending_delete: None,
            notice: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Returns the current page's records in provider order.
    pub fn rows(&self) -> &[Post] {
        self.page.records()
    }

    /// Returns the ids of the rendered rows.
    pub fn rendered_ids(&self) -> Vec<PostId> {
        self.page.ids()
    }

    /// Returns each rendered row with its checkbox and edit state.
    pub fn row_views(&self) -> Vec<RowView<'_>> {
        self.rows()
            .iter()
            .map(|post| RowView {
                post,
                selected: self.selection.is_selected(&post.id),
                mode: match self.edit.row() {
                    Some(row) if row.id == post.id => RowMode::Editing(row),
                    _ => RowMode::Display,
                },
            })
            .collect()
    }

    /// Returns the state of the select-all checkbox.
    pub fn header_state(&self) -> CheckState {
        self.selection.header_state(&self.rendered_ids())
    }

    /// Returns `true` if "delete selected" has something to act on.
    pub fn can_delete_selected(&self) -> bool {
        self.selection.is_any_selected(&self.rendered_ids())
    }

    /// Returns `true` once a page has loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns `true` while a wanted page fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.fetching.is_some()
    }

    /// Returns `true` if a response to list request `seq` would be applied.
    pub fn is_awaiting(&self, seq: u64) -> bool {
        self.fetching == Some(seq)
    }

    /// Returns `true` while an update or delete is outstanding.
    pub fn is_mutating(&self) -> bool {
        self.mutation.is_some()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Removes and returns the current notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Returns the number of pages, or 0 before the first page loads.
    pub fn page_count(&self) -> usize {
        self.query.page_count().unwrap_or(0)
    }

    /// Returns the pagination label, e.g. `"Page 1 of 3"`.
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.query.page_index() + 1, self.page_count())
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    fn fetch(&mut self) -> Request {
        self.seq += 1;
        self.fetching = Some(self.seq);
        let params = self.query.params();
        debug!("List #{} {:?}", self.seq, params);
        Request::List { seq: self.seq, params }
    }

    fn fetch_if(&mut self, changed: bool) -> Option<Request> {
        changed.then(|| self.fetch())
    }

    /// Fetches the page for the current query.
    pub fn refresh(&mut self) -> Request {
        self.fetch()
    }

    /// Applies the response to list request `seq`.
    ///
    /// Responses to superseded requests are dropped. On failure the previous
    /// page stays. Returns a follow-up fetch when the page index had to be
    /// clamped to the new total.
    pub fn on_list_loaded(&mut self, seq: u64, result: Result<Page, ProviderError>) -> Option<Request> {
        if self.fetching != Some(seq) {
            debug!("Dropping stale list response #{}", seq);
            return None;
        }
        self.fetching = None;

        let page = match result {
            Ok(page) => page,
            Err(error) => {
                warn!("List #{} failed: {}", seq, error);
                self.notice = Some(Notice {
                    kind: NoticeKind::List,
                    error,
                });
                return None;
            }
        };

        let clamped = self.query.set_total_count(page.total_count());
        if let Some(id) = self.edit.close_if_missing(&page) {
            info!("Closed edit of {}, no longer on the page", id);
        }
        debug!("List #{} loaded {} of {} records", seq, page.len(), page.total_count());
        self.page = page;
        self.loaded = true;

        self.fetch_if(clamped)
    }

    /// Handles a provider invalidation notice for `resource`.
    ///
    /// While a mutation is in flight the refetch waits for its completion, so
    /// the mutation's outcome is always applied first.
    pub fn on_invalidated(&mut self, resource: &str) -> Option<Request> {
        if resource != self.config.resource {
            return None;
        }
        if self.mutation.is_some() {
            debug!("Deferring refresh until the pending change completes");
            self.refresh_deferred = true;
            return None;
        }
        Some(self.fetch())
    }

    fn finish_mutation(&mut self, succeeded: bool) -> Option<Request> {
        self.mutation = None;
        if succeeded {
            // Anything fetched before the change may show pre-change rows.
            self.fetching = None;
        }
        if std::mem::take(&mut self.refresh_deferred) {
            Some(self.fetch())
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn set_page_index(&mut self, index: usize) -> Option<Request> {
        let changed = self.query.set_page_index(index);
        self.fetch_if(changed)
    }

    /// Moves to a page given as one-based user input; empty means the first.
    pub fn go_to_page(&mut self, page: Option<usize>) -> Option<Request> {
        let changed = self.query.go_to_page(page);
        self.fetch_if(changed)
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<Option<Request>, Error> {
        let changed = self.query.set_page_size(size)?;
        Ok(self.fetch_if(changed))
    }

    pub fn next_page(&mut self) -> Option<Request> {
        let changed = self.query.next_page();
        self.fetch_if(changed)
    }

    pub fn previous_page(&mut self) -> Option<Request> {
        let changed = self.query.previous_page();
        self.fetch_if(changed)
    }

    pub fn first_page(&mut self) -> Option<Request> {
        let changed = self.query.first_page();
        self.fetch_if(changed)
    }

    pub fn last_page(&mut self) -> Option<Request> {
        let changed = self.query.last_page();
        self.fetch_if(changed)
    }

    // -------------------------------------------------------------------------
    // Sorting and filtering
    // -------------------------------------------------------------------------

    /// Advances a column header's sort toggle.
    pub fn toggle_sort(&mut self, column: &str) -> Result<Option<Request>, Error> {
        self.columns.sortable(column)?;
        let changed = self.query.toggle_sort(column);
        Ok(self.fetch_if(changed))
    }

    /// Sets or clears a column's sort.
    pub fn set_sort(&mut self, column: &str, direction: Option<Direction>) -> Result<Option<Request>, Error> {
        self.columns.sortable(column)?;
        let changed = self.query.set_sort(column, direction);
        Ok(self.fetch_if(changed))
    }

    /// Sets a column's filter text; empty text removes the filter.
    pub fn set_filter(&mut self, column: &str, value: &str) -> Result<Option<Request>, Error> {
        let operator = self.columns.filter_operator(column)?;
        let changed = self.query.set_filter(column, operator, value);
        Ok(self.fetch_if(changed))
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Flips a rendered row's checkbox. Returns the new checked state.
    pub fn toggle_row(&mut self, id: PostId) -> Result<bool, Error> {
        if !self.page.contains(id) {
            return Err(Error::NotOnPage(id));
        }
        Ok(self.selection.toggle_row(id))
    }

    /// Handles the select-all checkbox.
    pub fn toggle_all(&mut self) {
        let rendered = self.rendered_ids();
        self.selection.toggle_all(&rendered);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Opens a rendered row for editing, replacing any other edit.
    pub fn begin_edit(&mut self, id: PostId) -> Result<(), Error> {
        let post = self.page.get(id).ok_or(Error::NotOnPage(id))?;
        if let Some(previous) = self.edit.begin(post) {
            debug!("Discarded draft of {} to edit {}", previous, id);
        }
        Ok(())
    }

    /// Closes the edit session, discarding the draft.
    pub fn cancel_edit(&mut self) -> Option<PostId> {
        self.edit.cancel()
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) -> Result<(), Error> {
        self.edit.set_title(title)
    }

    pub fn set_draft_status(&mut self, status: impl Into<String>) -> Result<(), Error> {
        self.edit.set_status(status)
    }

    /// Validates the draft and returns the update to send.
    ///
    /// Validation failures send nothing; the errors stay on the row.
    pub fn submit_edit(&mut self) -> Result<Request, Error> {
        if self.edit.editing_id().is_none() {
            return Err(Error::NotEditing);
        }
        if self.mutation.is_some() {
            return Err(Error::MutationInFlight);
        }
        let (id, fields) = self.edit.prepare_submit()?;
        info!("Saving {}", id);
        self.mutation = Some(Mutation::Update(id));
        Ok(Request::Update { id, fields })
    }

    /// Applies the outcome of saving `id`.
    pub fn on_update_done(&mut self, id: PostId, result: Result<Post, ProviderError>) -> Option<Request> {
        if self.mutation != Some(Mutation::Update(id)) {
            warn!("Update completion for {} was not expected", id);
        }
        match result {
            Ok(_) => {
                info!("Saved {}", id);
                self.edit.submit_succeeded(id);
                self.finish_mutation(true)
            }
            Err(error) => {
                warn!("Saving {} failed: {}", id, error);
                self.edit.submit_failed(id, &error);
                self.notice = Some(Notice {
                    kind: NoticeKind::Update,
                    error,
                });
                self.finish_mutation(false)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Deleting
    // -------------------------------------------------------------------------

    /// Asks for confirmation before deleting `ids`.
    ///
    /// Replaces any earlier pending delete. An empty id list does nothing.
    pub fn request_delete(&mut self, ids: Vec<PostId>) -> Option<&PendingDelete> {
        if ids.is_empty() {
            return None;
        }
        self.pending_delete = Some(PendingDelete {
            ids,
            message: self.config.confirm_message.clone(),
        });
        self.pending_delete.as_ref()
    }

    /// Asks for confirmation before deleting one row.
    pub fn request_delete_one(&mut self, id: PostId) -> Option<&PendingDelete> {
        self.request_delete(vec![id])
    }

    /// Asks for confirmation before deleting the selected rendered rows.
    pub fn request_delete_selected(&mut self) -> Option<&PendingDelete> {
        let ids = self.selection.selected_in(&self.rendered_ids());
        self.request_delete(ids)
    }

    /// Confirms the pending delete and returns the request to send.
    ///
    /// While another change is in flight the delete stays pending.
    pub fn confirm_delete(&mut self) -> Result<Request, Error> {
        if self.pending_delete.is_none() {
            return Err(Error::NoPendingDelete);
        }
        if self.mutation.is_some() {
            return Err(Error::MutationInFlight);
        }
        let ids = self
            .pending_delete
            .take()
            .map(|pending| pending.ids)
            .unwrap_or_default();
        info!("Deleting {} records", ids.len());
        self.mutation = Some(Mutation::Delete(ids.clone()));
        Ok(Request::DeleteMany { ids })
    }

    /// Declines the pending delete. Nothing else changes.
    pub fn cancel_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    /// Applies the outcome of deleting `ids`.
    pub fn on_delete_done(&mut self, ids: &[PostId], result: Result<(), ProviderError>) -> Option<Request> {
        if self.mutation.as_ref() != Some(&Mutation::Delete(ids.to_vec())) {
            warn!("Delete completion for {:?} was not expected", ids);
        }
        match result {
            Ok(()) => {
                info!("Deleted {} records", ids.len());
                self.selection.clear();
                if let Some(pending) = self.pending_delete.as_mut() {
                    pending.ids.retain(|id| !ids.contains(id));
                    if pending.ids.is_empty() {
                        self.pending_delete = None;
                    }
                }
                if let Some(id) = self.edit.editing_id().filter(|id| ids.contains(id)) {
                    debug!("Closed edit of deleted {}", id);
                    self.edit.cancel();
                }
                self.finish_mutation(true)
            }
            Err(error) => {
                warn!("Delete failed: {}", error);
                self.notice = Some(Notice {
                    kind: NoticeKind::Delete,
                    error,
                });
                self.finish_mutation(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldValidationError;
    use crate::model::PostStatus;

    fn post(id: u64) -> Post {
        Post::new(id, format!("Post {}", id), PostStatus::Draft, "2024-01-01T00:00:00Z")
    }

    fn page(ids: impl IntoIterator<Item = u64>, total: usize) -> Page {
        Page::new(ids.into_iter().map(post).collect(), total)
    }

    fn list_seq(request: Option<Request>) -> u64 {
        match request {
            Some(Request::List { seq, .. }) => seq,
            other => panic!("expected a list request, got {:?}", other),
        }
    }

    /// State with page 1 of 25 records (ids 1..=10) loaded.
    fn loaded() -> TableState {
        let mut state = TableState::new(TableConfig::default());
        let seq = list_seq(Some(state.refresh()));
        assert!(state.on_list_loaded(seq, Ok(page(1..=10, 25))).is_none());
        state
    }

    #[test]
    fn test_page_count_and_clamp() {
        let mut state = loaded();
        assert_eq!(state.page_count(), 3);
        assert_eq!(state.page_label(), "Page 1 of 3");

        let Some(Request::List { params, .. }) = state.set_page_index(5) else {
            panic!("expected a fetch");
        };
        assert_eq!(params.page_index, 2);
        assert_eq!(state.query().page_index(), 2);
    }

    #[test]
    fn test_unchanged_query_does_not_fetch() {
        let mut state = loaded();
        assert!(state.previous_page().is_none());
        assert!(state.set_page_index(0).is_none());
        assert!(state.set_filter("title", "").unwrap().is_none());
    }

    #[test]
    fn test_set_page_size_resets_index() {
        let mut state = loaded();
        let seq = list_seq(state.next_page());
        state.on_list_loaded(seq, Ok(page(11..=20, 25)));
        assert_eq!(state.query().page_index(), 1);

        let Some(Request::List { params, .. }) = state.set_page_size(20).unwrap() else {
            panic!("expected a fetch");
        };
        assert_eq!((params.page_index, params.page_size), (0, 20));
        assert!(state.set_page_size(11).is_err());
    }

    #[test]
    fn test_sort_and_filter_validation() {
        let mut state = loaded();
        assert_eq!(state.toggle_sort("actions"), Err(Error::NotSortable("actions".into())));
        assert_eq!(state.set_filter("createdAt", "x"), Err(Error::NotFilterable("createdAt".into())));
        assert_eq!(state.toggle_sort("nope"), Err(Error::UnknownColumn("nope".into())));
        assert!(state.toggle_sort("title").unwrap().is_some());
    }

    #[test]
    fn test_filter_cleared_drops_key() {
        let mut state = loaded();
        let Some(Request::List { params, .. }) = state.set_filter("title", "foo").unwrap() else {
            panic!("expected a fetch");
        };
        assert!(params.filter("title").is_some());

        let Some(Request::List { params, .. }) = state.set_filter("title", "").unwrap() else {
            panic!("expected a fetch");
        };
        assert!(params.filter("title").is_none());
    }

    #[test]
    fn test_latest_response_wins() {
        let mut state = loaded();
        let first = list_seq(state.next_page());
        let second = list_seq(state.next_page());

        assert!(state.on_list_loaded(second, Ok(page(21..=25, 25))).is_none());
        assert!(state.on_list_loaded(first, Ok(page(11..=20, 25))).is_none());
        assert_eq!(state.rows()[0].id, PostId(21));
    }

    #[test]
    fn test_failed_list_keeps_page() {
        let mut state = loaded();
        let seq = list_seq(state.next_page());
        state.on_list_loaded(seq, Err(ProviderError::transport("offline")));

        assert_eq!(state.rows().len(), 10);
        assert_eq!(state.notice().unwrap().kind, NoticeKind::List);
        assert!(state.take_notice().is_some());
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_shrunken_total_clamps_and_refetches() {
        let mut state = loaded();
        state.last_page();
        let seq = list_seq(state.set_filter("title", "1").unwrap());

        let follow_up = state.on_list_loaded(seq, Ok(Page::new(Vec::new(), 4)));
        let Some(Request::List { params, .. }) = follow_up else {
            panic!("expected a follow-up fetch");
        };
        assert_eq!(params.page_index, 0);
    }

    #[test]
    fn test_selection_requires_rendered_row() {
        let mut state = loaded();
        assert_eq!(state.toggle_row(PostId(3)), Ok(true));
        assert_eq!(state.toggle_row(PostId(99)), Err(Error::NotOnPage(PostId(99))));
        assert_eq!(state.header_state(), CheckState::Indeterminate);

        state.toggle_all();
        assert_eq!(state.header_state(), CheckState::Checked);
        assert!(state.can_delete_selected());
    }

    #[test]
    fn test_empty_title_sends_nothing() {
        let mut state = loaded();
        state.begin_edit(PostId(4)).unwrap();
        state.set_draft_title("").unwrap();
        state.set_draft_status("draft").unwrap();

        assert!(matches!(state.submit_edit(), Err(Error::Validation(_))));
        assert!(!state.is_mutating());
        let row = state.edit().row().unwrap();
        assert_eq!(row.id, PostId(4));
        assert!(row.errors.for_field("title").is_some());
    }

    #[test]
    fn test_update_success_waits_for_invalidation() {
        let mut state = loaded();
        state.begin_edit(PostId(2)).unwrap();
        state.set_draft_title("Renamed").unwrap();

        let request = state.submit_edit().unwrap();
        assert_eq!(
            request,
            Request::Update {
                id: PostId(2),
                fields: PostUpdate {
                    title: "Renamed".into(),
                    status: PostStatus::Draft
                }
            }
        );
        assert_eq!(state.submit_edit(), Err(Error::MutationInFlight));

        // The notice arrives before the completion and is held back.
        assert!(state.on_invalidated("posts").is_none());
        let refetch = state.on_update_done(PostId(2), Ok(post(2)));
        assert!(matches!(refetch, Some(Request::List { .. })));
        assert_eq!(state.edit(), &EditSession::Idle);
    }

    #[test]
    fn test_update_failure_keeps_draft() {
        let mut state = loaded();
        state.begin_edit(PostId(2)).unwrap();
        state.set_draft_title("Renamed").unwrap();
        state.submit_edit().unwrap();

        let rejection = ProviderError::Validation(FieldValidationError::new("title", "taken").into());
        assert!(state.on_update_done(PostId(2), Err(rejection)).is_none());

        let row = state.edit().row().unwrap();
        assert_eq!(row.draft.title, "Renamed");
        assert!(row.errors.for_field("title").is_some());
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Update);
        assert!(state.submit_edit().is_ok());
    }

    #[test]
    fn test_delete_confirmation() {
        let mut state = loaded();
        assert!(state.request_delete(Vec::new()).is_none());
        assert_eq!(state.confirm_delete(), Err(Error::NoPendingDelete));

        let pending = state.request_delete_one(PostId(5)).unwrap();
        assert_eq!(pending.message, "Confirm deletion!");
        assert!(state.cancel_delete());
        assert!(state.pending_delete().is_none());
        assert_eq!(state.confirm_delete(), Err(Error::NoPendingDelete));
    }

    #[test]
    fn test_delete_editing_row() {
        let mut state = loaded();
        state.begin_edit(PostId(2)).unwrap();
        state.toggle_row(PostId(2)).unwrap();
        state.toggle_row(PostId(3)).unwrap();

        state.request_delete_one(PostId(2));
        let request = state.confirm_delete().unwrap();
        assert_eq!(request, Request::DeleteMany { ids: vec![PostId(2)] });

        assert!(state.on_delete_done(&[PostId(2)], Ok(())).is_none());
        assert_eq!(state.edit(), &EditSession::Idle);
        assert!(state.selection().is_empty());
        assert!(!state.can_delete_selected());

        let seq = list_seq(state.on_invalidated("posts"));
        state.on_list_loaded(seq, Ok(page((1..=11).filter(|&id| id != 2), 24)));
        assert!(state.rows().iter().all(|p| p.id != PostId(2)));
    }

    #[test]
    fn test_pending_delete_drops_deleted_ids() {
        let mut state = loaded();
        state.request_delete(vec![PostId(1), PostId(2)]);
        state.confirm_delete().unwrap();

        state.request_delete(vec![PostId(2), PostId(3)]);
        state.on_delete_done(&[PostId(1), PostId(2)], Ok(()));
        assert_eq!(state.pending_delete().unwrap().ids, vec![PostId(3)]);

        state.confirm_delete().unwrap();
        state.request_delete_one(PostId(3));
        state.on_delete_done(&[PostId(3)], Ok(()));
        assert!(state.pending_delete().is_none());
    }

    #[test]
    fn test_delete_selected_failure_keeps_selection() {
        let mut state = loaded();
        state.toggle_all();
        let pending = state.request_delete_selected().unwrap();
        assert_eq!(pending.ids.len(), 10);

        let Request::DeleteMany { ids } = state.confirm_delete().unwrap() else {
            panic!("expected a delete");
        };
        state.on_delete_done(&ids, Err(ProviderError::transport("offline")));

        assert_eq!(state.header_state(), CheckState::Checked);
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Delete);
    }

    #[test]
    fn test_mutation_success_drops_older_fetch() {
        let mut state = loaded();
        state.request_delete_one(PostId(1));
        state.confirm_delete().unwrap();

        let before = list_seq(state.next_page());
        state.on_delete_done(&[PostId(1)], Ok(()));
        assert!(!state.is_loading());

        assert!(state.on_list_loaded(before, Ok(page(11..=20, 25))).is_none());
        assert_eq!(state.rows()[0].id, PostId(1));
    }

    #[test]
    fn test_page_replacement_closes_vanished_edit() {
        let mut state = loaded();
        state.begin_edit(PostId(7)).unwrap();
        let seq = list_seq(state.next_page());
        state.on_list_loaded(seq, Ok(page(11..=20, 25)));
        assert_eq!(state.edit().editing_id(), None);
    }

    #[test]
    fn test_row_views() {
        let mut state = loaded();
        state.begin_edit(PostId(1)).unwrap();
        state.toggle_row(PostId(2)).unwrap();

        let views = state.row_views();
        assert!(matches!(views[0].mode, RowMode::Editing(row) if row.id == PostId(1)));
        assert!(views[1].selected);
        assert_eq!(views[1].mode, RowMode::Display);
    }

    #[test]
    fn test_invalidation_for_other_resource_ignored() {
        let mut state = loaded();
        assert!(state.on_invalidated("users").is_none());
        assert!(state.on_invalidated("posts").is_some());
    }
}
