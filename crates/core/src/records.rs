//! Typed records for the six source tables.
//!
//! Each record is an explicit struct with compile-time-checked field access;
//! range rules live on the fields via `validator` derives and are enforced
//! during schema coercion (`schema` module).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order lifecycle status.
///
/// Closed enumeration; status strings are matched case-insensitively.
/// Only `Delivered` orders are eligible for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Delivered,
    Shipped,
    Canceled,
    Invoiced,
    Processing,
    Unavailable,
    Approved,
    Created,
}

impl OrderStatus {
    /// Parse a status string, case-insensitively. Unknown statuses are
    /// rejected so the caller can count the row as malformed.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delivered" => Some(Self::Delivered),
            "shipped" => Some(Self::Shipped),
            "canceled" => Some(Self::Canceled),
            "invoiced" => Some(Self::Invoiced),
            "processing" => Some(Self::Processing),
            "unavailable" => Some(Self::Unavailable),
            "approved" => Some(Self::Approved),
            "created" => Some(Self::Created),
            _ => None,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// One customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub order_id: String,
    /// Customer who placed the order
    pub customer_id: String,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Purchase timestamp; orders without one never reach this struct
    pub purchased_at: DateTime<Utc>,
    /// When the order reached the customer, if it has
    pub delivered_at: Option<DateTime<Utc>>,
    /// Promised delivery date, when the source carried one
    pub estimated_delivery_at: Option<DateTime<Utc>>,
}

/// One line item of an order. An order has one or more items.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    pub order_id: String,
    pub product_id: String,
    /// Unit price; the only component of revenue
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Shipping cost, tracked beside (never inside) revenue
    #[validate(range(min = 0.0))]
    pub freight_value: f64,
}

/// Catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub product_id: String,
    /// Category name; absent for uncategorized products
    pub category: Option<String>,
}

/// Customer master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier
    pub customer_id: String,
    /// Two-letter state code, when known
    pub state: Option<String>,
    pub city: Option<String>,
}

/// A review left for an order. Orders may have zero or several.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderReview {
    /// Unique review identifier; tie-breaker for the most-recent policy
    pub review_id: String,
    pub order_id: String,
    /// Review score, 1 (worst) to 5 (best)
    #[validate(range(min = 1, max = 5))]
    pub score: u8,
    /// Submission timestamp; drives the most-recent-review policy
    pub created_at: DateTime<Utc>,
}

/// One payment against an order. Orders may carry several.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderPayment {
    pub order_id: String,
    /// Amount paid; tracked beside (never inside) revenue
    #[validate(range(min = 0.0))]
    pub value: f64,
}
