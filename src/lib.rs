//! Commerce analytics: windowed business metrics over relational e-commerce
//! order data.
//!
//! Six source tables (orders, items, products, customers, reviews, payments)
//! are merged into a denormalized sales-row collection once per analysis
//! session; the metrics engine then answers KPI, growth, ranking, and
//! delivery/satisfaction queries for any inclusive date window.
//!
//! The pipeline crates are re-exported here; [`AnalysisSession`] wires them
//! together, and [`MergeCache`] lets an embedding application memoize merges
//! by raw-table content without the core ever caching internally.

pub mod cache;
pub mod session;

pub use cache::{table_fingerprint, Fingerprint, MergeCache};
pub use session::AnalysisSession;

pub use analytics_core;
pub use dataset_merge;
pub use metrics_engine;

pub use analytics_core::{
    CategorizedRow, Error, RawTable, RawTables, Result, SalesRow, Window,
};
pub use dataset_merge::MergeReport;
pub use metrics_engine::MetricsEngine;
