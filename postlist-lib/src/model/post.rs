//! The post record

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Unique, immutable identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
    Rejected,
}

impl PostStatus {
    /// All statuses, in the order the status selector lists them.
    pub const ALL: [PostStatus; 3] = [PostStatus::Published, PostStatus::Draft, PostStatus::Rejected];

    /// Returns the wire name (`"published"`, `"draft"`, `"rejected"`).
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Draft => "draft",
            PostStatus::Rejected => "rejected",
        }
    }

    /// Returns the label shown in the status selector.
    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Published => "Published",
            PostStatus::Draft => "Draft",
            PostStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`PostStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PostStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A post as stored by the data provider.
///
/// The table only ever holds read-only snapshots of posts, one page at a
/// time. Changes go through [`PostUpdate`](super::PostUpdate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub status: PostStatus,
    /// Creation timestamp as delivered by the store (RFC 3339).
    pub created_at: String,
}

impl Post {
    /// Creates a new post.
    pub fn new(id: impl Into<PostId>, title: impl Into<String>, status: PostStatus, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            created_at: created_at.into(),
        }
    }
}
