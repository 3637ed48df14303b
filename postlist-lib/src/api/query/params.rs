//! Parameters of a `list` request.

use serde::Deserialize;
use serde::Serialize;

use super::Filter;
use super::Sort;

/// Everything a provider needs to produce one page.
///
/// Derived from the table's query state; two equal states always produce
/// equal parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    pub page_index: usize,
    pub page_size: usize,
    pub sort: Option<Sort>,
    /// Active filters, ordered by column id.
    pub filters: Vec<Filter>,
}

impl ListParams {
    /// Creates parameters for the given page with no sort or filters.
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
            sort: None,
            filters: Vec::new(),
        }
    }

    /// Returns the index of the first record on the page.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Returns the filter on `column`, if any.
    pub fn filter(&self, column: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.column == column)
    }
}
