//! Table loading: coerces all six raw tables and tallies exclusions.

use serde::Serialize;
use tracing::{debug, warn};

use analytics_core::schema::{
    parse_customers, parse_order_items, parse_orders, parse_payments, parse_products,
    parse_reviews, RowExclusions,
};
use analytics_core::{Customer, Order, OrderItem, OrderPayment, OrderReview, Product};
use analytics_core::{RawTables, Result};

/// Per-table row-exclusion tallies for one load call.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct LoadExclusions {
    pub orders: RowExclusions,
    pub order_items: RowExclusions,
    pub products: RowExclusions,
    pub customers: RowExclusions,
    pub reviews: RowExclusions,
    pub payments: RowExclusions,
}

impl LoadExclusions {
    pub fn total(&self) -> u64 {
        self.orders.total()
            + self.order_items.total()
            + self.products.total()
            + self.customers.total()
            + self.reviews.total()
            + self.payments.total()
    }
}

/// All six tables in typed form, plus what was excluded getting there.
#[derive(Debug, Clone)]
pub struct ValidatedTables {
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub reviews: Vec<OrderReview>,
    pub payments: Vec<OrderPayment>,
    pub exclusions: LoadExclusions,
}

/// Coerce every raw table into typed records.
///
/// A structurally broken table (missing required column) fails the whole
/// call with `Error::Schema`; malformed rows are excluded and counted.
pub fn load(raw: &RawTables) -> Result<ValidatedTables> {
    let orders = parse_orders(&raw.orders)?;
    let order_items = parse_order_items(&raw.order_items)?;
    let products = parse_products(&raw.products)?;
    let customers = parse_customers(&raw.customers)?;
    let reviews = parse_reviews(&raw.reviews)?;
    let payments = parse_payments(&raw.payments)?;

    let exclusions = LoadExclusions {
        orders: orders.exclusions,
        order_items: order_items.exclusions,
        products: products.exclusions,
        customers: customers.exclusions,
        reviews: reviews.exclusions,
        payments: payments.exclusions,
    };

    debug!(
        orders = orders.records.len(),
        order_items = order_items.records.len(),
        products = products.records.len(),
        customers = customers.records.len(),
        reviews = reviews.records.len(),
        payments = payments.records.len(),
        "loaded raw tables"
    );
    if exclusions.total() > 0 {
        warn!(excluded_rows = exclusions.total(), "rows excluded during load");
    }

    Ok(ValidatedTables {
        orders: orders.records,
        order_items: order_items.records,
        products: products.records,
        customers: customers.records,
        reviews: reviews.records,
        payments: payments.records,
        exclusions,
    })
}
