//! Value enum for column cells

use serde::Deserialize;
use serde::Serialize;

use super::PostId;
use super::PostStatus;

/// The value a column accessor extracts from a post.
///
/// Ordering is used by providers that sort in memory: `Null` sorts first,
/// then integers, then text.
///
/// # Example
///
/// ```
/// use postlist_lib::model::CellValue;
///
/// let title = CellValue::from("Hello");
/// assert_eq!(title.to_string(), "Hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value.
    Null,
    /// Unsigned integer.
    Int(u64),
    /// Text value.
    Text(String),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        CellValue::Int(n)
    }
}

impl From<PostId> for CellValue {
    fn from(id: PostId) -> Self {
        CellValue::Int(id.0)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<PostStatus> for CellValue {
    fn from(status: PostStatus) -> Self {
        CellValue::Text(status.as_str().to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(CellValue::Null, Into::into)
    }
}
