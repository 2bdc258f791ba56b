//! Unified error type for the analytics engine.
//!
//! Only contract violations are errors: a malformed *table* aborts the load,
//! an invalid *window* aborts the query. Malformed individual rows are
//! excluded and counted (`schema::RowExclusions`), never raised.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the analytics engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is missing or a table is structurally unusable.
    #[error("schema error in table '{table}': {detail}")]
    Schema { table: String, detail: String },

    /// Window bounds are inverted, or a comparison window's duration does
    /// not match the primary window.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// A caller-supplied configuration value is unusable (e.g. delivery
    /// bucket bounds that are empty or not strictly increasing).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a schema error for the named table.
    pub fn schema(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            detail: detail.into(),
        }
    }

    /// Create a schema error for a missing required column.
    pub fn missing_column(table: impl Into<String>, column: &str) -> Self {
        Self::Schema {
            table: table.into(),
            detail: format!("missing required column '{column}'"),
        }
    }

    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidWindow(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
