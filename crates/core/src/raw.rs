//! Raw-table contract with the data-loading collaborator.
//!
//! The loader hands over string-celled tables (a header plus rows); how they
//! were read from disk is its concern, not ours. Empty and whitespace-only
//! cells are treated as absent values.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An untyped table: a name, a column header, and string-celled rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a required column; `Error::Schema` naming this table and the
    /// column otherwise.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| Error::missing_column(&self.name, name))
    }

    /// Cell value at (row, column). Empty or whitespace-only cells and rows
    /// shorter than the header read as absent.
    pub fn cell<'a>(&self, row: &'a [String], column: usize) -> Option<&'a str> {
        let value = row.get(column)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// The six named tables an analysis session starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTables {
    pub orders: RawTable,
    pub order_items: RawTable,
    pub products: RawTable,
    pub customers: RawTable,
    pub reviews: RawTable,
    pub payments: RawTable,
}

impl RawTables {
    /// The tables in a fixed order, for fingerprinting and iteration.
    pub fn all(&self) -> [&RawTable; 6] {
        [
            &self.orders,
            &self.order_items,
            &self.products,
            &self.customers,
            &self.reviews,
            &self.payments,
        ]
    }
}
