//! Column definitions.

use crate::api::query::FilterOperator;
use crate::error::Error;
use crate::model::CellValue;
use crate::model::Post;

/// What a column is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Row checkbox, with the select-all checkbox in the header.
    Selection,
    /// A field of the record.
    Data,
    /// Per-row Edit / Delete actions.
    Actions,
}

/// Semantic description of one table column.
///
/// Columns are built once and never change for the table's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Unique column id, also the field name sent in sort and filter params.
    pub id: &'static str,
    /// Header label.
    pub header: &'static str,
    pub kind: ColumnKind,
    /// Extracts the cell value from a record.
    pub accessor: fn(&Post) -> CellValue,
    pub sortable: bool,
    /// How filter text is matched; `None` means the column has no filter.
    pub filter_operator: Option<FilterOperator>,
}

impl Column {
    /// Creates a sortable data column with no filter.
    pub fn data(id: &'static str, header: &'static str, accessor: fn(&Post) -> CellValue) -> Self {
        Self {
            id,
            header,
            kind: ColumnKind::Data,
            accessor,
            sortable: true,
            filter_operator: None,
        }
    }

    /// Creates the row-selection checkbox column.
    pub fn selection() -> Self {
        Self {
            id: "selection",
            header: "",
            kind: ColumnKind::Selection,
            accessor: |post| post.id.into(),
            sortable: false,
            filter_operator: None,
        }
    }

    /// Creates the Edit / Delete actions column.
    pub fn actions() -> Self {
        Self {
            id: "actions",
            header: "Actions",
            kind: ColumnKind::Actions,
            accessor: |post| post.id.into(),
            sortable: false,
            filter_operator: None,
        }
    }

    /// Sets whether the column can be sorted.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets the filter operator.
    pub fn filter(mut self, operator: FilterOperator) -> Self {
        self.filter_operator = Some(operator);
        self
    }

    /// Returns the cell value for `post`.
    pub fn value(&self, post: &Post) -> CellValue {
        (self.accessor)(post)
    }

    /// Returns `true` if the column has a filter operator.
    pub fn is_filterable(&self) -> bool {
        self.filter_operator.is_some()
    }
}

/// The ordered, immutable set of columns of a table.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Creates a column set.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// The columns of the posts list: selection, ID, Title, Status,
    /// CreatedAt and actions. Title and Status filter by substring.
    pub fn posts() -> Self {
        Self::new(vec![
            Column::selection(),
            Column::data("id", "ID", |post| post.id.into()),
            Column::data("title", "Title", |post| post.title.clone().into()).filter(FilterOperator::Contains),
            Column::data("status", "Status", |post| post.status.into()).filter(FilterOperator::Contains),
            Column::data("createdAt", "CreatedAt", |post| post.created_at.clone().into()),
            Column::actions(),
        ])
    }

    /// Returns the column with `id`.
    pub fn get(&self, id: &str) -> Result<&Column, Error> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::UnknownColumn(id.to_string()))
    }

    /// Returns the column with `id` if it can be sorted.
    pub fn sortable(&self, id: &str) -> Result<&Column, Error> {
        let column = self.get(id)?;
        if column.sortable {
            Ok(column)
        } else {
            Err(Error::NotSortable(id.to_string()))
        }
    }

    /// Returns the column's filter operator.
    pub fn filter_operator(&self, id: &str) -> Result<FilterOperator, Error> {
        self.get(id)?
            .filter_operator
            .ok_or_else(|| Error::NotFilterable(id.to_string()))
    }

    /// Iterates the columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::posts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostStatus;

    #[test]
    fn test_post_columns() {
        let columns = ColumnSet::posts();
        let ids: Vec<_> = columns.iter().map(|c| c.id).collect();
        assert_eq!(ids, ["selection", "id", "title", "status", "createdAt", "actions"]);
    }

    #[test]
    fn test_lookup_errors() {
        let columns = ColumnSet::posts();
        assert_eq!(columns.get("nope").unwrap_err(), Error::UnknownColumn("nope".into()));
        assert_eq!(columns.sortable("selection").unwrap_err(), Error::NotSortable("selection".into()));
        assert_eq!(columns.filter_operator("id").unwrap_err(), Error::NotFilterable("id".into()));
        assert_eq!(columns.filter_operator("title"), Ok(FilterOperator::Contains));
    }

    #[test]
    fn test_accessors() {
        let post = Post::new(7, "Seven", PostStatus::Draft, "2024-01-01T00:00:00Z");
        let columns = ColumnSet::posts();
        assert_eq!(columns.get("id").unwrap().value(&post), CellValue::Int(7));
        assert_eq!(columns.get("status").unwrap().value(&post), CellValue::from("draft"));
    }
}
