//! Post list table library
//!
//! A headless state machine for a paginated, sortable, filterable table of
//! posts with inline row editing and confirmed deletion, driven against a
//! generic CRUD [`DataProvider`](api::DataProvider).

pub mod api;
pub mod cache;
pub mod error;
pub mod model;
pub mod table;

pub use error::Error;
pub use table::TableConfig;
pub use table::TableController;
pub use table::TableState;
