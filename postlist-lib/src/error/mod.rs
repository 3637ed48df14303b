//! Error types

mod provider;
mod table;
mod validation;

pub use provider::*;
pub use table::*;
pub use validation::*;
