//! Cache configuration

use std::time::Duration;

use serde::Deserialize;

/// Configuration for page cache TTL settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use postlist_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_list_ttl(Duration::from_secs(60));
/// assert_eq!(config.list_ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for list pages.
    ///
    /// Default: 30 seconds
    #[serde(with = "seconds")]
    pub list_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(30),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list TTL.
    pub fn with_list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self {
            list_ttl: Duration::ZERO,
        }
    }

    /// Returns `true` if pages are cached at all.
    pub fn is_enabled(&self) -> bool {
        !self.list_ttl.is_zero()
    }
}

mod seconds {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
