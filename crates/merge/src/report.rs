//! Merge outcome accounting.

use serde::Serialize;

use crate::loader::LoadExclusions;

/// What one merge produced and what it left out.
///
/// Anomalies here are recorded, not fatal: a delivered order with zero items
/// contributes zero rows, and a row whose customer join missed still exists
/// with absent geography.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct MergeReport {
    /// Orders that survived the delivered-status filter
    pub delivered_orders: u64,
    /// Sales rows emitted (one per order item)
    pub sales_rows: u64,
    /// Delivered orders with no matching item rows
    pub orders_without_items: u64,
    /// Sales rows whose customer lookup missed
    pub rows_without_customer: u64,
    /// Per-table load exclusions
    pub exclusions: LoadExclusions,
}
