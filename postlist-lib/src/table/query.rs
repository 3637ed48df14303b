//! Pagination, sort and filter state.

use std::collections::BTreeMap;

use crate::api::query::Direction;
use crate::api::query::Filter;
use crate::api::query::FilterOperator;
use crate::api::query::ListParams;
use crate::api::query::Sort;
use crate::error::Error;

/// The part of table state that determines what to fetch.
///
/// Mutators return `true` when they changed the state; [`params`](Self::params)
/// is a pure function of the state, so an unchanged state needs no refetch.
/// Column ids are validated by the caller against its column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page_index: usize,
    page_size: usize,
    page_sizes: Vec<usize>,
    sort: Option<Sort>,
    filters: BTreeMap<String, Filter>,
    /// Total record count reported by the last loaded page.
    total_count: Option<usize>,
}

impl QueryState {
    /// Creates state for the first page at `page_size`.
    ///
    /// `page_sizes` lists the sizes [`set_page_size`](Self::set_page_size)
    /// accepts.
    pub fn new(page_size: usize, page_sizes: Vec<usize>) -> Self {
        Self {
            page_index: 0,
            page_size,
            page_sizes,
            sort: None,
            filters: BTreeMap::new(),
            total_count: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the zero-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the selectable page sizes.
    pub fn page_sizes(&self) -> &[usize] {
        &self.page_sizes
    }

    /// Returns the active sort.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Returns the sort direction of `column`, if it is the sorted column.
    pub fn sort_direction(&self, column: &str) -> Option<Direction> {
        self.sort.as_ref().and_then(|s| s.direction_for(column))
    }

    /// Returns the filter text of `column`.
    pub fn filter_value(&self, column: &str) -> Option<&str> {
        self.filters.get(column).map(|f| f.value.as_str())
    }

    /// Returns the total record count, once a page has loaded.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Returns the number of pages, once a page has loaded.
    pub fn page_count(&self) -> Option<usize> {
        self.total_count.map(|total| total.div_ceil(self.page_size))
    }

    /// Derives the `list` request parameters.
    pub fn params(&self) -> ListParams {
        ListParams {
            page_index: self.page_index,
            page_size: self.page_size,
            sort: self.sort.clone(),
            filters: self.filters.values().cloned().collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    fn clamp_index(&self, index: usize) -> usize {
        match self.page_count() {
            Some(count) => index.min(count.saturating_sub(1)),
            None => index,
        }
    }

    /// Records the total count of a loaded page.
    ///
    /// Returns `true` if the page index was past the last page and had to be
    /// clamped.
    pub fn set_total_count(&mut self, total: usize) -> bool {
        self.total_count = Some(total);
        let clamped = self.clamp_index(self.page_index);
        let changed = clamped != self.page_index;
        self.page_index = clamped;
        changed
    }

    /// Moves to page `index`, clamped to the known pages.
    pub fn set_page_index(&mut self, index: usize) -> bool {
        let index = self.clamp_index(index);
        let changed = index != self.page_index;
        self.page_index = index;
        changed
    }

    /// Moves to a page given as typed by the user (one-based).
    ///
    /// An empty input goes to the first page.
    pub fn go_to_page(&mut self, page: Option<usize>) -> bool {
        self.set_page_index(page.map_or(0, |p| p.saturating_sub(1)))
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, size: usize) -> Result<bool, Error> {
        if !self.page_sizes.contains(&size) {
            return Err(Error::InvalidPageSize {
                size,
                allowed: self.page_sizes.clone(),
            });
        }
        let changed = size != self.page_size || self.page_index != 0;
        self.page_size = size;
        self.page_index = 0;
        Ok(changed)
    }

    /// Returns `true` if there is a page before the current one.
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    /// Returns `true` if there is a page after the current one.
    pub fn can_next_page(&self) -> bool {
        self.page_count()
            .is_some_and(|count| self.page_index + 1 < count)
    }

    /// Moves to the next page if available.
    pub fn next_page(&mut self) -> bool {
        if self.can_next_page() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous page if available.
    pub fn previous_page(&mut self) -> bool {
        if self.can_previous_page() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Moves to the first page.
    pub fn first_page(&mut self) -> bool {
        self.set_page_index(0)
    }

    /// Moves to the last known page.
    pub fn last_page(&mut self) -> bool {
        match self.page_count() {
            Some(count) => self.set_page_index(count.saturating_sub(1)),
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Sets the sort of `column` directly; `None` removes it.
    ///
    /// Setting a direction on another column replaces the current sort.
    pub fn set_sort(&mut self, column: &str, direction: Option<Direction>) -> bool {
        let next = match direction {
            Some(direction) => Some(Sort {
                column: column.to_string(),
                direction,
            }),
            None if self.sort_direction(column).is_some() => None,
            None => return false,
        };
        let changed = next != self.sort;
        self.sort = next;
        changed
    }

    /// Advances `column` through none → asc → desc → none.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        let next = Direction::cycle(self.sort_direction(column));
        self.set_sort(column, next)
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Sets the filter text of `column`; an empty value removes the filter.
    pub fn set_filter(&mut self, column: &str, operator: FilterOperator, value: &str) -> bool {
        if value.is_empty() {
            return self.filters.remove(column).is_some();
        }
        let filter = Filter::new(column, operator, value);
        if self.filters.get(column) == Some(&filter) {
            return false;
        }
        self.filters.insert(column.to_string(), filter);
        true
    }
}
