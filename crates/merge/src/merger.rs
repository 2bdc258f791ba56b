//! Join logic: delivered-status filter, the sales join, the opt-in product
//! join, and the shared window filter.
//!
//! All joins iterate in input order and index through ordered maps, so the
//! same inputs always produce the same rows in the same order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use analytics_core::{
    CategorizedRow, Customer, Order, OrderItem, OrderReview, Product, SalesRow, Window,
};

use crate::loader::ValidatedTables;
use crate::report::MergeReport;

/// Retain only orders with the canonical delivered status.
///
/// Fixed business policy: no other status reaches any downstream metric.
pub fn filter_delivered(orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.status.is_delivered())
        .cloned()
        .collect()
}

/// Result of the sales join, with its anomaly counts.
#[derive(Debug, Clone)]
pub struct SalesJoin {
    pub rows: Vec<SalesRow>,
    pub orders_without_items: u64,
    pub rows_without_customer: u64,
}

/// Whether `candidate` wins over `current` under the most-recent-review
/// policy: later submission wins, identical timestamps fall to the greater
/// review id.
fn supersedes(candidate: &OrderReview, current: &OrderReview) -> bool {
    (candidate.created_at, candidate.review_id.as_str())
        > (current.created_at, current.review_id.as_str())
}

/// Pick one review per order under the most-recent policy.
fn review_per_order(reviews: &[OrderReview]) -> BTreeMap<&str, &OrderReview> {
    let mut chosen: BTreeMap<&str, &OrderReview> = BTreeMap::new();
    for review in reviews {
        match chosen.get(review.order_id.as_str()) {
            Some(current) if !supersedes(review, current) => {}
            _ => {
                chosen.insert(review.order_id.as_str(), review);
            }
        }
    }
    chosen
}

/// Join orders with items (inner), customers (left), and reviews (left, one
/// review per order).
///
/// Callers pass the delivered subset from `filter_delivered`; an item whose
/// order is not in that subset produces no row.
pub fn join_sales(
    orders: &[Order],
    items: &[OrderItem],
    customers: &[Customer],
    reviews: &[OrderReview],
) -> SalesJoin {
    let order_index: BTreeMap<&str, &Order> =
        orders.iter().map(|o| (o.order_id.as_str(), o)).collect();
    let customer_index: BTreeMap<&str, &Customer> = customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c))
        .collect();
    let review_index = review_per_order(reviews);

    let mut rows = Vec::with_capacity(items.len());
    let mut orders_with_items: BTreeSet<&str> = BTreeSet::new();
    let mut rows_without_customer = 0u64;

    for item in items {
        let Some(order) = order_index.get(item.order_id.as_str()) else {
            continue;
        };
        orders_with_items.insert(order.order_id.as_str());

        let customer = customer_index.get(order.customer_id.as_str());
        if customer.is_none() {
            rows_without_customer += 1;
        }
        let review = review_index.get(order.order_id.as_str());

        rows.push(SalesRow {
            order_id: order.order_id.clone(),
            customer_id: order.customer_id.clone(),
            customer_state: customer.and_then(|c| c.state.clone()),
            customer_city: customer.and_then(|c| c.city.clone()),
            purchased_at: order.purchased_at,
            delivered_at: order.delivered_at,
            estimated_delivery_at: order.estimated_delivery_at,
            product_id: item.product_id.clone(),
            price: item.price,
            freight_value: item.freight_value,
            review_score: review.map(|r| r.score),
            delivery_days: SalesRow::derive_delivery_days(order.purchased_at, order.delivered_at),
        });
    }

    let orders_without_items = (order_index.len() - orders_with_items.len()) as u64;

    SalesJoin {
        rows,
        orders_without_items,
        rows_without_customer,
    }
}

/// Left join sales rows with product categories. Opt-in: only callers that
/// need category breakdowns pay for it.
pub fn with_products(rows: &[SalesRow], products: &[Product]) -> Vec<CategorizedRow> {
    let product_index: BTreeMap<&str, &Product> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect();

    rows.iter()
        .map(|row| CategorizedRow {
            sales: row.clone(),
            category: product_index
                .get(row.product_id.as_str())
                .and_then(|p| p.category.clone()),
        })
        .collect()
}

/// Inclusive-bounds filter on the purchase timestamp.
///
/// The single filtering point every metric shares; a window outside all
/// purchase dates yields an empty collection, not an error.
pub fn filter_window(rows: &[SalesRow], window: &Window) -> Vec<SalesRow> {
    rows.iter()
        .filter(|r| window.contains(r.purchased_at))
        .cloned()
        .collect()
}

/// Outcome of a full merge: the sales rows and the accounting that goes
/// with them.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub rows: Vec<SalesRow>,
    pub report: MergeReport,
}

/// Run the full merge pipeline over already-validated tables: delivered
/// filter, then the sales join.
pub fn merge(tables: &ValidatedTables) -> MergeOutcome {
    let delivered = filter_delivered(&tables.orders);
    let join = join_sales(
        &delivered,
        &tables.order_items,
        &tables.customers,
        &tables.reviews,
    );

    let report = MergeReport {
        delivered_orders: delivered.len() as u64,
        sales_rows: join.rows.len() as u64,
        orders_without_items: join.orders_without_items,
        rows_without_customer: join.rows_without_customer,
        exclusions: tables.exclusions,
    };

    info!(
        delivered_orders = report.delivered_orders,
        sales_rows = report.sales_rows,
        "merged sales table"
    );
    if report.orders_without_items > 0 || report.rows_without_customer > 0 {
        warn!(
            orders_without_items = report.orders_without_items,
            rows_without_customer = report.rows_without_customer,
            "merge anomalies recorded"
        );
    }

    MergeOutcome {
        rows: join.rows,
        report,
    }
}
