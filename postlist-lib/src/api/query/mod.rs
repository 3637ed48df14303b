//! List request types.
//!
//! - [`Filter`] - A per-column filter predicate
//! - [`Sort`] - The single active sort column and its direction
//! - [`ListParams`] - Everything a `list` call needs, derived from table state
//! - [`Page`] - One page of records plus the total count

mod filter;
mod order;
mod page;
mod params;

pub use filter::Filter;
pub use filter::FilterOperator;
pub use order::Direction;
pub use order::Sort;
pub use page::Page;
pub use params::ListParams;
