//! Chart of accounts rules: code allocation, the tree snapshot and the guarded
//! mutations that keep the hierarchy consistent.

pub mod account_types;
pub mod accounts;
pub mod allocator;
pub mod error;
pub mod store;
pub mod tree;

#[cfg(test)]
mod testing;

pub use error::{ChartError, Result};
pub use tree::AccountTree;
