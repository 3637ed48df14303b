//! In-memory data provider using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use super::provider::DataProvider;
use super::provider::Invalidation;
use super::provider::InvalidationBus;
use super::query::Direction;
use super::query::ListParams;
use super::query::Page;
use crate::error::FieldValidationError;
use crate::error::ProviderError;
use crate::model::Post;
use crate::model::PostId;
use crate::model::PostUpdate;
use crate::table::ColumnSet;

/// Provider operations, used to inject one-shot failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Update,
    Delete,
}

/// A single-resource store held in memory.
///
/// Filters and sorts through the posts [`ColumnSet`] accessors, pages by
/// offset, and deletes all-or-nothing. Used by the CLI and by tests.
///
/// # Example
///
/// ```
/// use postlist_lib::api::InMemoryProvider;
/// use postlist_lib::model::{Post, PostStatus};
///
/// let provider = InMemoryProvider::new("posts")
///     .with_posts([Post::new(1, "Hello", PostStatus::Draft, "2024-01-01T00:00:00Z")]);
/// assert_eq!(provider.len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryProvider {
    resource: String,
    columns: ColumnSet,
    store: DashMap<PostId, Post>,
    failures: DashMap<Operation, ProviderError>,
    bus: InvalidationBus,
}

impl InMemoryProvider {
    /// Creates an empty store serving `resource`.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            columns: ColumnSet::posts(),
            store: DashMap::new(),
            failures: DashMap::new(),
            bus: InvalidationBus::default(),
        }
    }

    /// Adds posts to the store.
    pub fn with_posts(self, posts: impl IntoIterator<Item = Post>) -> Self {
        for post in posts {
            self.store.insert(post.id, post);
        }
        self
    }

    /// Inserts or replaces a post without publishing an invalidation.
    pub fn insert(&self, post: Post) {
        self.store.insert(post.id, post);
    }

    /// Returns a copy of the stored post.
    pub fn get(&self, id: PostId) -> Option<Post> {
        self.store.get(&id).map(|entry| entry.value().clone())
    }

    /// Returns the number of stored posts.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Makes the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ProviderError) {
        self.failures.insert(operation, error);
    }

    fn check(&self, resource: &str, operation: Operation) -> Result<(), ProviderError> {
        if resource != self.resource {
            return Err(ProviderError::transport(format!("unknown resource '{}'", resource)));
        }
        match self.failures.remove(&operation) {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataProvider for InMemoryProvider {
    async fn list(&self, resource: &str, params: &ListParams) -> Result<Page, ProviderError> {
        self.check(resource, Operation::List)?;

        let mut filters = Vec::with_capacity(params.filters.len());
        for filter in &params.filters {
            let column = self
                .columns
                .get(&filter.column)
                .map_err(|e| ProviderError::transport(e.to_string()))?;
            filters.push((column, filter));
        }

        let mut posts: Vec<Post> = self
            .store
            .iter()
            .filter(|entry| filters.iter().all(|(column, filter)| filter.matches(&column.value(entry.value()))))
            .map(|entry| entry.value().clone())
            .collect();

        posts.sort_by_key(|post| post.id);
        if let Some(sort) = &params.sort {
            let column = self
                .columns
                .get(&sort.column)
                .map_err(|e| ProviderError::transport(e.to_string()))?;
            // Stable sort keeps id order among equal values.
            posts.sort_by(|a, b| {
                let ord = column.value(a).cmp(&column.value(b));
                match sort.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        let total = posts.len();
        let records = posts
            .into_iter()
            .skip(params.offset())
            .take(params.page_size)
            .collect();

        Ok(Page::new(records, total))
    }

    async fn update(&self, resource: &str, id: PostId, fields: &PostUpdate) -> Result<Post, ProviderError> {
        self.check(resource, Operation::Update)?;

        if fields.title.trim().is_empty() {
            return Err(ProviderError::Validation(
                FieldValidationError::required("title", "Title is required").into(),
            ));
        }

        let updated = {
            let mut entry = self
                .store
                .get_mut(&id)
                .ok_or_else(|| ProviderError::not_found([id]))?;
            fields.apply_to(entry.value_mut());
            entry.value().clone()
        };

        self.bus.publish(resource);
        Ok(updated)
    }

    async fn delete_many(&self, resource: &str, ids: &[PostId]) -> Result<(), ProviderError> {
        self.check(resource, Operation::Delete)?;

        let missing: Vec<PostId> = ids
            .iter()
            .copied()
            .filter(|id| !self.store.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(ProviderError::not_found(missing));
        }

        for id in ids {
            self.store.remove(id);
        }

        self.bus.publish(resource);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.bus.subscribe()
    }
}
