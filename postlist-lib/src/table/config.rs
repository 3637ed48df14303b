//! Table configuration

use serde::Deserialize;

use crate::cache::CacheConfig;

/// Configuration of a post table.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single setting.
///
/// # Example
///
/// ```
/// use postlist_lib::TableConfig;
///
/// let config = TableConfig::default().with_default_page_size(20);
/// assert_eq!(config.resource, "posts");
/// assert_eq!(config.initial_page_size(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Resource name passed to every provider call.
    ///
    /// Default: `"posts"`
    pub resource: String,

    /// Page sizes the user may pick.
    ///
    /// Default: 10, 20, 30, 40, 50
    pub page_size_options: Vec<usize>,

    /// Page size used when the table is created.
    ///
    /// Default: 10
    pub default_page_size: usize,

    /// Prompt shown before a delete is sent.
    ///
    /// Default: `"Confirm deletion!"`
    pub confirm_message: String,

    /// Page cache settings for [`CachedProvider`](crate::cache::CachedProvider).
    pub cache: CacheConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            resource: "posts".to_string(),
            page_size_options: vec![10, 20, 30, 40, 50],
            default_page_size: 10,
            confirm_message: "Confirm deletion!".to_string(),
            cache: CacheConfig::default(),
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource name.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// Sets the selectable page sizes.
    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// Sets the initial page size.
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Sets the delete confirmation prompt.
    pub fn with_confirm_message(mut self, message: impl Into<String>) -> Self {
        self.confirm_message = message.into();
        self
    }

    /// Sets the cache settings.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Page sizes the user may pick, never empty and never containing 0.
    pub fn page_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .page_size_options
            .iter()
            .copied()
            .filter(|&size| size > 0)
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        if sizes.is_empty() {
            sizes.push(self.default_page_size.max(1));
        }
        sizes
    }

    /// The page size the table starts with.
    ///
    /// Falls back to the smallest option when the default is not one of them.
    pub fn initial_page_size(&self) -> usize {
        let sizes = self.page_sizes();
        if sizes.contains(&self.default_page_size) {
            self.default_page_size
        } else {
            sizes[0]
        }
    }
}
