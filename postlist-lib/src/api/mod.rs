//! Data provider contract and request types.
//!
//! - [`query`] - List request parameters and the page they return
//! - [`DataProvider`] - The CRUD collaborator the table talks to
//! - [`InMemoryProvider`] - A store held in memory, used by the CLI and tests

mod memory;
mod provider;
pub mod query;

pub use memory::InMemoryProvider;
pub use memory::Operation;
pub use provider::DataProvider;
pub use provider::Invalidation;
pub use provider::InvalidationBus;
