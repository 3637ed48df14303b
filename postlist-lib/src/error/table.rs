//! Table operation errors

use super::ValidationError;
use crate::model::PostId;

/// Errors returned when a table operation is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The page size is not one of the configured options.
    #[error("Page size {size} is not one of {allowed:?}")]
    InvalidPageSize { size: usize, allowed: Vec<usize> },

    /// No column with this id exists.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// The column exists but cannot be sorted.
    #[error("Column '{0}' is not sortable")]
    NotSortable(String),

    /// The column exists but declares no filter operator.
    #[error("Column '{0}' is not filterable")]
    NotFilterable(String),

    /// An update or delete is still waiting for the provider.
    #[error("Another change is still being saved")]
    MutationInFlight,

    /// Submit or draft edit without an open edit session.
    #[error("No row is being edited")]
    NotEditing,

    /// The record is not on the currently rendered page.
    #[error("Record {0} is not on the current page")]
    NotOnPage(PostId),

    /// Confirm was called with no delete awaiting confirmation.
    #[error("No deletion is awaiting confirmation")]
    NoPendingDelete,

    /// The draft failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
