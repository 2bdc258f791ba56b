//! Schema coercion: raw string tables into typed records.
//!
//! A missing required column aborts the load with `Error::Schema`. A row that
//! fails coercion (unparsable required timestamp, bad number, out-of-range
//! score, duplicate key, unrecognized status) is excluded and counted, never
//! silently patched and never fatal. Unparsable values in *optional*
//! timestamp columns degrade to absent, mirroring the nullable fields of the
//! source data.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::error::Result;
use crate::raw::RawTable;
use crate::records::{Customer, Order, OrderItem, OrderPayment, OrderReview, OrderStatus, Product};

/// Counts of rows excluded while coercing one table.
///
/// Reported beside the merge result so a single bad row never aborts the
/// analysis of the good ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowExclusions {
    /// A required field was empty or the row was too short
    pub missing_field: u64,
    /// A required timestamp failed to parse
    pub bad_timestamp: u64,
    /// A numeric field failed to parse
    pub bad_number: u64,
    /// A monetary amount was negative
    pub negative_amount: u64,
    /// A review score fell outside 1..=5
    pub score_out_of_range: u64,
    /// A primary key appeared more than once; first occurrence wins
    pub duplicate_key: u64,
    /// An order status outside the known enumeration
    pub unknown_status: u64,
}

impl RowExclusions {
    pub fn total(&self) -> u64 {
        self.missing_field
            + self.bad_timestamp
            + self.bad_number
            + self.negative_amount
            + self.score_out_of_range
            + self.duplicate_key
            + self.unknown_status
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn merge(&mut self, other: &RowExclusions) {
        self.missing_field += other.missing_field;
        self.bad_timestamp += other.bad_timestamp;
        self.bad_number += other.bad_number;
        self.negative_amount += other.negative_amount;
        self.score_out_of_range += other.score_out_of_range;
        self.duplicate_key += other.duplicate_key;
        self.unknown_status += other.unknown_status;
    }
}

/// A coerced table: the surviving records plus the exclusion tally.
#[derive(Debug, Clone)]
pub struct ParsedTable<T> {
    pub records: Vec<T>,
    pub exclusions: RowExclusions,
}

/// Timestamp formats the source data is known to use.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a timestamp cell; date-only values read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_amount(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce the orders table.
///
/// An absent or unparsable purchase timestamp disqualifies the order; the
/// delivered and estimated-delivery columns are optional and degrade to
/// absent per cell.
pub fn parse_orders(table: &RawTable) -> Result<ParsedTable<Order>> {
    let order_id = table.require_column("order_id")?;
    let customer_id = table.require_column("customer_id")?;
    let status_col = table.require_column("order_status")?;
    let purchased_col = table.require_column("order_purchase_timestamp")?;
    let delivered_col = table.column("order_delivered_customer_date");
    let estimated_col = table.column("order_estimated_delivery_date");

    let mut records = Vec::with_capacity(table.len());
    let mut exclusions = RowExclusions::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for row in table.rows() {
        let (Some(id), Some(customer)) =
            (table.cell(row, order_id), table.cell(row, customer_id))
        else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(status_raw) = table.cell(row, status_col) else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(status) = OrderStatus::parse(status_raw) else {
            exclusions.unknown_status += 1;
            continue;
        };
        let Some(purchased_raw) = table.cell(row, purchased_col) else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(purchased_at) = parse_timestamp(purchased_raw) else {
            exclusions.bad_timestamp += 1;
            continue;
        };
        if !seen.insert(id.to_string()) {
            exclusions.duplicate_key += 1;
            continue;
        }

        let optional_ts = |col: Option<usize>| {
            col.and_then(|c| table.cell(row, c)).and_then(parse_timestamp)
        };

        records.push(Order {
            order_id: id.to_string(),
            customer_id: customer.to_string(),
            status,
            purchased_at,
            delivered_at: optional_ts(delivered_col),
            estimated_delivery_at: optional_ts(estimated_col),
        });
    }

    Ok(ParsedTable { records, exclusions })
}

/// Coerce the order-items table. Negative prices and freight values are
/// excluded and counted, never clamped.
pub fn parse_order_items(table: &RawTable) -> Result<ParsedTable<OrderItem>> {
    let order_id = table.require_column("order_id")?;
    let product_id = table.require_column("product_id")?;
    let price_col = table.require_column("price")?;
    let freight_col = table.require_column("freight_value")?;

    let mut records = Vec::with_capacity(table.len());
    let mut exclusions = RowExclusions::default();

    for row in table.rows() {
        let (Some(order), Some(product)) =
            (table.cell(row, order_id), table.cell(row, product_id))
        else {
            exclusions.missing_field += 1;
            continue;
        };
        let (Some(price_raw), Some(freight_raw)) =
            (table.cell(row, price_col), table.cell(row, freight_col))
        else {
            exclusions.missing_field += 1;
            continue;
        };
        let (Some(price), Some(freight_value)) =
            (parse_amount(price_raw), parse_amount(freight_raw))
        else {
            exclusions.bad_number += 1;
            continue;
        };

        let item = OrderItem {
            order_id: order.to_string(),
            product_id: product.to_string(),
            price,
            freight_value,
        };
        if item.validate().is_err() {
            exclusions.negative_amount += 1;
            continue;
        }
        records.push(item);
    }

    Ok(ParsedTable { records, exclusions })
}

/// Coerce the products table. Category is nullable.
pub fn parse_products(table: &RawTable) -> Result<ParsedTable<Product>> {
    let product_id = table.require_column("product_id")?;
    let category_col = table.require_column("product_category_name")?;

    let mut records = Vec::with_capacity(table.len());
    let mut exclusions = RowExclusions::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for row in table.rows() {
        let Some(id) = table.cell(row, product_id) else {
            exclusions.missing_field += 1;
            continue;
        };
        if !seen.insert(id.to_string()) {
            exclusions.duplicate_key += 1;
            continue;
        }
        records.push(Product {
            product_id: id.to_string(),
            category: table.cell(row, category_col).map(str::to_string),
        });
    }

    Ok(ParsedTable { records, exclusions })
}

/// Coerce the customers table. State and city are nullable.
pub fn parse_customers(table: &RawTable) -> Result<ParsedTable<Customer>> {
    let customer_id = table.require_column("customer_id")?;
    let state_col = table.require_column("customer_state")?;
    let city_col = table.require_column("customer_city")?;

    let mut records = Vec::with_capacity(table.len());
    let mut exclusions = RowExclusions::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for row in table.rows() {
        let Some(id) = table.cell(row, customer_id) else {
            exclusions.missing_field += 1;
            continue;
        };
        if !seen.insert(id.to_string()) {
            exclusions.duplicate_key += 1;
            continue;
        }
        records.push(Customer {
            customer_id: id.to_string(),
            state: table.cell(row, state_col).map(str::to_string),
            city: table.cell(row, city_col).map(str::to_string),
        });
    }

    Ok(ParsedTable { records, exclusions })
}

/// Coerce the reviews table.
///
/// The submission timestamp is required: without it the most-recent-review
/// policy would be undefined for the row.
pub fn parse_reviews(table: &RawTable) -> Result<ParsedTable<OrderReview>> {
    let review_id = table.require_column("review_id")?;
    let order_id = table.require_column("order_id")?;
    let score_col = table.require_column("review_score")?;
    let created_col = table.require_column("review_creation_date")?;

    let mut records = Vec::with_capacity(table.len());
    let mut exclusions = RowExclusions::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for row in table.rows() {
        let (Some(id), Some(order)) = (table.cell(row, review_id), table.cell(row, order_id))
        else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(score_raw) = table.cell(row, score_col) else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(score) = score_raw.parse::<u8>().ok() else {
            exclusions.bad_number += 1;
            continue;
        };
        let Some(created_raw) = table.cell(row, created_col) else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(created_at) = parse_timestamp(created_raw) else {
            exclusions.bad_timestamp += 1;
            continue;
        };
        if !seen.insert(id.to_string()) {
            exclusions.duplicate_key += 1;
            continue;
        }

        let review = OrderReview {
            review_id: id.to_string(),
            order_id: order.to_string(),
            score,
            created_at,
        };
        if review.validate().is_err() {
            exclusions.score_out_of_range += 1;
            continue;
        }
        records.push(review);
    }

    Ok(ParsedTable { records, exclusions })
}

/// Coerce the payments table. Negative values are excluded and counted.
pub fn parse_payments(table: &RawTable) -> Result<ParsedTable<OrderPayment>> {
    let order_id = table.require_column("order_id")?;
    let value_col = table.require_column("payment_value")?;

    let mut records = Vec::with_capacity(table.len());
    let mut exclusions = RowExclusions::default();

    for row in table.rows() {
        let Some(order) = table.cell(row, order_id) else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(value_raw) = table.cell(row, value_col) else {
            exclusions.missing_field += 1;
            continue;
        };
        let Some(value) = parse_amount(value_raw) else {
            exclusions.bad_number += 1;
            continue;
        };

        let payment = OrderPayment {
            order_id: order.to_string(),
            value,
        };
        if payment.validate().is_err() {
            exclusions.negative_amount += 1;
            continue;
        }
        records.push(payment);
    }

    Ok(ParsedTable { records, exclusions })
}
