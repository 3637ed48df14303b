//! Async driver that runs table requests against a data provider.

use std::sync::Arc;

use log::debug;
use log::trace;
use log::warn;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::mpsc;

use super::config::TableConfig;
use super::state::Notice;
use super::state::PendingDelete;
use super::state::Request;
use super::state::TableState;
use crate::api::DataProvider;
use crate::api::Invalidation;
use crate::api::query::Direction;
use crate::api::query::Page;
use crate::error::Error;
use crate::error::ProviderError;
use crate::model::Post;
use crate::model::PostId;

/// Result of a provider call, sent back from its task.
#[derive(Debug)]
pub enum Completion {
    Listed {
        seq: u64,
        result: Result<Page, ProviderError>,
    },
    Updated {
        id: PostId,
        result: Result<Post, ProviderError>,
    },
    Deleted {
        ids: Vec<PostId>,
        result: Result<(), ProviderError>,
    },
}

/// What changed after the controller handled a completion or notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A page response arrived. `applied` is `false` for superseded
    /// responses and failures.
    Listed { seq: u64, applied: bool },
    /// A save finished.
    Updated { id: PostId, ok: bool },
    /// A delete finished.
    Deleted { ids: Vec<PostId>, ok: bool },
    /// The provider announced a change to the table's resource.
    Invalidated,
}

enum Message {
    Completion(Completion),
    Notice(Result<Invalidation, RecvError>),
}

/// Drives a [`TableState`] against a [`DataProvider`].
///
/// Handlers update the state synchronously and spawn any provider call on
/// the tokio runtime. Results and invalidation notices are applied when the
/// owner awaits [`next_event`](Self::next_event) or [`settle`](Self::settle),
/// so all state changes happen on the owner's task.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use postlist_lib::api::InMemoryProvider;
/// use postlist_lib::{TableConfig, TableController};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = Arc::new(InMemoryProvider::new("posts"));
/// let mut table = TableController::new(provider, TableConfig::default());
/// table.load();
/// table.settle().await;
/// assert!(table.state().is_loaded());
/// # }
/// ```
pub struct TableController<P> {
    provider: Arc<P>,
    state: TableState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    invalidations: Option<broadcast::Receiver<Invalidation>>,
    /// Spawned provider calls whose completion has not been applied.
    outstanding: usize,
}

impl<P: DataProvider + 'static> TableController<P> {
    /// Creates a controller and subscribes to the provider's invalidations.
    ///
    /// Nothing is fetched until [`load`](Self::load) is called.
    pub fn new(provider: Arc<P>, config: TableConfig) -> Self {
        Self::with_state(provider, TableState::new(config))
    }

    /// Creates a controller around existing table state.
    pub fn with_state(provider: Arc<P>, state: TableState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let invalidations = Some(provider.subscribe());
        Self {
            provider,
            state,
            tx,
            rx,
            invalidations,
            outstanding: 0,
        }
    }

    /// Returns the table state.
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Returns the provider.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Returns the number of provider calls still running.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    fn dispatch(&mut self, request: Request) {
        trace!("Dispatching {:?}", request);
        self.outstanding += 1;
        let provider = Arc::clone(&self.provider);
        let resource = self.state.config().resource.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = match request {
                Request::List { seq, params } => Completion::Listed {
                    seq,
                    result: provider.list(&resource, &params).await,
                },
                Request::Update { id, fields } => Completion::Updated {
                    id,
                    result: provider.update(&resource, id, &fields).await,
                },
                Request::DeleteMany { ids } => {
                    let result = provider.delete_many(&resource, &ids).await;
                    Completion::Deleted { ids, result }
                }
            };
            if tx.send(completion).is_err() {
                debug!("Table dropped before its request completed");
            }
        });
    }

    fn dispatch_if(&mut self, request: Option<Request>) -> bool {
        match request {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Applies a completion to the state and sends any follow-up fetch.
    fn apply(&mut self, completion: Completion) -> TableEvent {
        self.outstanding = self.outstanding.saturating_sub(1);
        let (event, follow_up) = match completion {
            Completion::Listed { seq, result } => {
                let applied = result.is_ok() && self.state.is_awaiting(seq);
                let follow_up = self.state.on_list_loaded(seq, result);
                (TableEvent::Listed { seq, applied }, follow_up)
            }
            Completion::Updated { id, result } => {
                let ok = result.is_ok();
                let follow_up = self.state.on_update_done(id, result);
                (TableEvent::Updated { id, ok }, follow_up)
            }
            Completion::Deleted { ids, result } => {
                let ok = result.is_ok();
                let follow_up = self.state.on_delete_done(&ids, result);
                (TableEvent::Deleted { ids, ok }, follow_up)
            }
        };
        self.dispatch_if(follow_up);
        event
    }

    fn notice(&mut self, notice: Result<Invalidation, RecvError>) -> Option<TableEvent> {
        let resource = match notice {
            Ok(invalidation) => invalidation.resource,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Missed {} invalidation notices, refreshing", skipped);
                self.state.config().resource.clone()
            }
            Err(RecvError::Closed) => {
                debug!("Invalidation channel closed");
                self.invalidations = None;
                return None;
            }
        };
        if resource != self.state.config().resource {
            return None;
        }
        let request = self.state.on_invalidated(&resource);
        self.dispatch_if(request);
        Some(TableEvent::Invalidated)
    }

    // -------------------------------------------------------------------------
    // Event loop
    // -------------------------------------------------------------------------

    /// Waits for the next completion or invalidation and applies it.
    ///
    /// Returns `None` once there is nothing left that could produce an event.
    pub async fn next_event(&mut self) -> Option<TableEvent> {
        loop {
            if self.outstanding == 0 && self.invalidations.is_none() {
                return None;
            }
            let message = tokio::select! {
                Some(completion) = self.rx.recv() => Message::Completion(completion),
                notice = recv_optional(self.invalidations.as_mut()) => Message::Notice(notice),
            };
            match message {
                Message::Completion(completion) => return Some(self.apply(completion)),
                Message::Notice(notice) => {
                    if let Some(event) = self.notice(notice) {
                        return Some(event);
                    }
                }
            }
        }
    }

    fn drain_notices(&mut self, events: &mut Vec<TableEvent>) {
        loop {
            let Some(invalidations) = self.invalidations.as_mut() else {
                return;
            };
            let notice = match invalidations.try_recv() {
                Ok(invalidation) => Ok(invalidation),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Lagged(skipped)) => Err(RecvError::Lagged(skipped)),
                Err(TryRecvError::Closed) => Err(RecvError::Closed),
            };
            events.extend(self.notice(notice));
        }
    }

    /// Applies completions and queued notices until no provider call is
    /// running and no notice is waiting.
    pub async fn settle(&mut self) -> Vec<TableEvent> {
        let mut events = Vec::new();
        loop {
            self.drain_notices(&mut events);
            if self.outstanding == 0 {
                return events;
            }
            match self.rx.recv().await {
                Some(completion) => events.push(self.apply(completion)),
                None => return events,
            }
        }
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    /// Fetches the first page. Call once when the table is shown.
    pub fn load(&mut self) {
        self.refresh();
    }

    /// Refetches the current page.
    pub fn refresh(&mut self) {
        let request = self.state.refresh();
        self.dispatch(request);
    }

    pub fn set_page_index(&mut self, index: usize) -> bool {
        let request = self.state.set_page_index(index);
        self.dispatch_if(request)
    }

    pub fn go_to_page(&mut self, page: Option<usize>) -> bool {
        let request = self.state.go_to_page(page);
        self.dispatch_if(request)
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<bool, Error> {
        let request = self.state.set_page_size(size)?;
        Ok(self.dispatch_if(request))
    }

    pub fn next_page(&mut self) -> bool {
        let request = self.state.next_page();
        self.dispatch_if(request)
    }

    pub fn previous_page(&mut self) -> bool {
        let request = self.state.previous_page();
        self.dispatch_if(request)
    }

    pub fn first_page(&mut self) -> bool {
        let request = self.state.first_page();
        self.dispatch_if(request)
    }

    pub fn last_page(&mut self) -> bool {
        let request = self.state.last_page();
        self.dispatch_if(request)
    }

    pub fn toggle_sort(&mut self, column: &str) -> Result<bool, Error> {
        let request = self.state.toggle_sort(column)?;
        Ok(self.dispatch_if(request))
    }

    pub fn set_sort(&mut self, column: &str, direction: Option<Direction>) -> Result<bool, Error> {
        let request = self.state.set_sort(column, direction)?;
        Ok(self.dispatch_if(request))
    }

    pub fn set_filter(&mut self, column: &str, value: &str) -> Result<bool, Error> {
        let request = self.state.set_filter(column, value)?;
        Ok(self.dispatch_if(request))
    }

    pub fn toggle_row(&mut self, id: PostId) -> Result<bool, Error> {
        self.state.toggle_row(id)
    }

    pub fn toggle_all(&mut self) {
        self.state.toggle_all();
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    pub fn begin_edit(&mut self, id: PostId) -> Result<(), Error> {
        self.state.begin_edit(id)
    }

    pub fn cancel_edit(&mut self) -> Option<PostId> {
        self.state.cancel_edit()
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) -> Result<(), Error> {
        self.state.set_draft_title(title)
    }

    pub fn set_draft_status(&mut self, status: impl Into<String>) -> Result<(), Error> {
        self.state.set_draft_status(status)
    }

    /// Validates the draft and sends the update.
    pub fn submit_edit(&mut self) -> Result<(), Error> {
        let request = self.state.submit_edit()?;
        self.dispatch(request);
        Ok(())
    }

    pub fn request_delete(&mut self, ids: Vec<PostId>) -> Option<&PendingDelete> {
        self.state.request_delete(ids)
    }

    pub fn request_delete_one(&mut self, id: PostId) -> Option<&PendingDelete> {
        self.state.request_delete_one(id)
    }

    pub fn request_delete_selected(&mut self) -> Option<&PendingDelete> {
        self.state.request_delete_selected()
    }

    /// Sends the pending delete.
    pub fn confirm_delete(&mut self) -> Result<(), Error> {
        let request = self.state.confirm_delete()?;
        self.dispatch(request);
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.state.cancel_delete()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.take_notice()
    }
}

/// Receives from an optional channel, or waits forever if there is none.
///
/// Used as a `tokio::select!` branch.
async fn recv_optional(rx: Option<&mut broadcast::Receiver<Invalidation>>) -> Result<Invalidation, RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
