//! The CRUD data provider contract

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::query::ListParams;
use super::query::Page;
use crate::error::ProviderError;
use crate::model::Post;
use crate::model::PostId;
use crate::model::PostUpdate;

/// Notice that cached pages of a resource are out of date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub resource: String,
}

/// Broadcast channel providers use to announce invalidations.
///
/// Publishing with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Invalidation>,
}

impl InvalidationBus {
    /// Creates a bus that buffers up to `capacity` undelivered notices per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a new receiver for notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.sender.subscribe()
    }

    /// Announces that `resource` changed.
    pub fn publish(&self, resource: &str) {
        let delivered = self
            .sender
            .send(Invalidation {
                resource: resource.to_string(),
            })
            .unwrap_or(0);
        log::debug!("Invalidated '{}' ({} subscribers)", resource, delivered);
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// A generic CRUD store the table reads pages from and writes changes to.
///
/// Implementations must publish an [`Invalidation`] for the resource after
/// every successful `update` or `delete_many`, before returning. The table
/// refetches its page when it receives one.
///
/// `delete_many` is all-or-nothing: on error, no id was deleted.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches one page of records.
    async fn list(&self, resource: &str, params: &ListParams) -> Result<Page, ProviderError>;

    /// Applies an edit to a single record and returns the stored record.
    async fn update(&self, resource: &str, id: PostId, fields: &PostUpdate) -> Result<Post, ProviderError>;

    /// Deletes every record in `ids`.
    async fn delete_many(&self, resource: &str, ids: &[PostId]) -> Result<(), ProviderError>;

    /// Subscribes to invalidation notices.
    fn subscribe(&self) -> broadcast::Receiver<Invalidation>;
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    async fn list(&self, resource: &str, params: &ListParams) -> Result<Page, ProviderError> {
        (**self).list(resource, params).await
    }

    async fn update(&self, resource: &str, id: PostId, fields: &PostUpdate) -> Result<Post, ProviderError> {
        (**self).update(resource, id, fields).await
    }

    async fn delete_many(&self, resource: &str, ids: &[PostId]) -> Result<(), ProviderError> {
        (**self).delete_many(resource, ids).await
    }

    fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        (**self).subscribe()
    }
}
