//! Filter types for list queries.

use serde::Deserialize;
use serde::Serialize;

use crate::model::CellValue;

/// How a column's filter text is matched against its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Case-insensitive substring match.
    Contains,
    /// Exact match against the value's text form.
    Eq,
}

impl FilterOperator {
    /// Returns the operator name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::Eq => "eq",
        }
    }

    /// Returns `true` if `value` satisfies this operator for `needle`.
    pub fn matches(self, value: &CellValue, needle: &str) -> bool {
        let text = value.to_string();
        match self {
            FilterOperator::Contains => text.to_lowercase().contains(&needle.to_lowercase()),
            FilterOperator::Eq => text == needle,
        }
    }
}

/// A filter condition on one column.
///
/// # Example
///
/// ```
/// use postlist_lib::api::query::Filter;
/// use postlist_lib::model::CellValue;
///
/// let filter = Filter::contains("title", "rust");
/// assert!(filter.matches(&CellValue::from("Learning Rust")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl Filter {
    /// Creates a filter with the given operator.
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a contains filter.
    pub fn contains(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Contains, value)
    }

    /// Returns `true` if the cell value passes this filter.
    pub fn matches(&self, value: &CellValue) -> bool {
        self.operator.matches(value, &self.value)
    }
}
