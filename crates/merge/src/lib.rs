//! Dataset merger: validates the six raw tables and joins them into a
//! deterministic, denormalized sales-row collection.
//!
//! Stateless per invocation; rows are never mutated after creation.

pub mod loader;
pub mod merger;
pub mod report;

pub use loader::{load, LoadExclusions, ValidatedTables};
pub use merger::{
    filter_delivered, filter_window, join_sales, merge, with_products, MergeOutcome, SalesJoin,
};
pub use report::MergeReport;
