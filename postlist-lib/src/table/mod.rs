//! Table state and its async driver
//!
//! [`TableState`] holds the query, selection, edit session and loaded page,
//! and turns user actions into provider [`Request`]s. [`TableController`]
//! performs those requests and feeds the results back.

mod column;
mod config;
mod controller;
mod edit;
mod query;
mod selection;
mod state;

pub use column::Column;
pub use column::ColumnKind;
pub use column::ColumnSet;
pub use config::TableConfig;
pub use controller::Completion;
pub use controller::TableController;
pub use controller::TableEvent;
pub use edit::EditSession;
pub use edit::EditingRow;
pub use query::QueryState;
pub use selection::CheckState;
pub use selection::Selection;
pub use state::Notice;
pub use state::NoticeKind;
pub use state::PendingDelete;
pub use state::Request;
pub use state::RowMode;
pub use state::RowView;
pub use state::TableState;
