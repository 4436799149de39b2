//! Table and column descriptors recovered from a MySQL dump.

mod extractor;
mod types;

pub use extractor::*;
pub use types::*;
