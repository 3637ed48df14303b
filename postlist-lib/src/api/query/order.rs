//! Ordering types for list queries.

use serde::Deserialize;
use serde::Serialize;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Advances a column's header toggle: none → asc → desc → none.
    pub fn cycle(current: Option<Direction>) -> Option<Direction> {
        match current {
            None => Some(Direction::Asc),
            Some(Direction::Asc) => Some(Direction::Desc),
            Some(Direction::Desc) => None,
        }
    }

    /// Returns the direction name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// The single active sort column of a table.
///
/// Only one column sorts at a time; the header shows one indicator.
///
/// # Example
///
/// ```
/// use postlist_lib::api::query::Sort;
///
/// let sort = Sort::desc("createdAt");
/// assert_eq!(sort.column, "createdAt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub direction: Direction,
}

impl Sort {
    /// Creates an ascending order on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending order on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Returns the direction if this sort is on `column`.
    pub fn direction_for(&self, column: &str) -> Option<Direction> {
        (self.column == column).then_some(self.direction)
    }
}
