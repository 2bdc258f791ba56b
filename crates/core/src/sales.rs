//! The denormalized sales row, one per (order, order item).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bucket name for rows whose product has no category after the product join.
pub const UNCATEGORIZED: &str = "uncategorized";

/// One order item joined with its order, customer, and review context.
///
/// Rows exist only for delivered orders. Customer fields are absent when the
/// customer join missed; the review score is absent when the order was never
/// reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub order_id: String,
    pub customer_id: String,
    pub customer_state: Option<String>,
    pub customer_city: Option<String>,
    pub purchased_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    pub product_id: String,
    /// Item price; the row's entire revenue contribution
    pub price: f64,
    /// Shipping cost, never folded into revenue
    pub freight_value: f64,
    /// Score of the order's most recently submitted review
    pub review_score: Option<u8>,
    /// Whole days from purchase to delivery; absent unless both timestamps
    /// exist and delivery did not precede purchase
    pub delivery_days: Option<i64>,
}

impl SalesRow {
    /// Derive the delivery duration for a purchase/delivery timestamp pair.
    ///
    /// Absent (never zero) when the delivery timestamp is missing or earlier
    /// than the purchase timestamp.
    pub fn derive_delivery_days(
        purchased_at: DateTime<Utc>,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Option<i64> {
        let delivered = delivered_at?;
        if delivered < purchased_at {
            return None;
        }
        Some(delivered.signed_duration_since(purchased_at).num_days())
    }

    /// Whether the order arrived on or before its promised date.
    /// Absent when either timestamp is missing.
    pub fn on_time(&self) -> Option<bool> {
        match (self.delivered_at, self.estimated_delivery_at) {
            (Some(delivered), Some(estimated)) => Some(delivered <= estimated),
            _ => None,
        }
    }
}

/// A sales row extended with the opt-in product-category join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedRow {
    pub sales: SalesRow,
    /// Product category; absent when the product join missed or the product
    /// itself is uncategorized
    pub category: Option<String>,
}

impl CategorizedRow {
    /// The category label used in rankings; absent categories fall into the
    /// explicit `uncategorized` bucket rather than being dropped.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}
