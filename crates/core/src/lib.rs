//! Core types, schema contracts, and validation for the commerce analytics engine.

pub mod error;
pub mod raw;
pub mod records;
pub mod sales;
pub mod schema;
pub mod window;

pub use error::{Error, Result};
pub use raw::{RawTable, RawTables};
pub use records::*;
pub use sales::{CategorizedRow, SalesRow, UNCATEGORIZED};
pub use schema::{ParsedTable, RowExclusions};
pub use window::Window;
