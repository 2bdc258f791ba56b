//! The metrics engine and its scalar KPIs.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use analytics_core::{OrderPayment, SalesRow, Window};

use crate::stats;

/// Windowed metrics over one immutable sales-row collection.
///
/// Construct once per collection and query with as many windows as needed;
/// every method is a pure read, so independent callers can share one engine
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    rows: &'a [SalesRow],
}

/// Whole-window KPI values; produced only when the window has data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_revenue: f64,
    pub order_count: u64,
    pub average_order_value: f64,
    /// Absent when no in-window row has a defined delivery duration
    pub average_delivery_days: Option<f64>,
    /// Absent when no in-window row carries a review score
    pub average_review_score: Option<f64>,
}

/// Per-order aggregation over one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub median_order_value: f64,
    pub min_order_value: f64,
    pub max_order_value: f64,
    pub mean_items_per_order: f64,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(rows: &'a [SalesRow]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &'a [SalesRow] {
        self.rows
    }

    /// Rows whose purchase timestamp falls inside the window.
    pub(crate) fn in_window(&self, window: &Window) -> impl Iterator<Item = &'a SalesRow> {
        let rows = self.rows;
        let window = *window;
        rows.iter().filter(move |r| window.contains(r.purchased_at))
    }

    /// Sum of item prices in-window. Zero (a legitimate value, not a
    /// sentinel) when the window has no rows.
    pub fn total_revenue(&self, window: &Window) -> f64 {
        self.in_window(window).map(|r| r.price).sum()
    }

    /// Count of distinct orders in-window.
    pub fn order_count(&self, window: &Window) -> u64 {
        let orders: BTreeSet<&str> = self.in_window(window).map(|r| r.order_id.as_str()).collect();
        orders.len() as u64
    }

    /// Total revenue divided by distinct order count; absent (never a
    /// division by zero) when the window has no orders.
    pub fn average_order_value(&self, window: &Window) -> Option<f64> {
        let orders = self.order_count(window);
        if orders == 0 {
            return None;
        }
        Some(self.total_revenue(window) / orders as f64)
    }

    /// Mean delivery duration in days over rows that have one; absent when
    /// none do.
    pub fn average_delivery_time(&self, window: &Window) -> Option<f64> {
        let days: Vec<f64> = self
            .in_window(window)
            .filter_map(|r| r.delivery_days)
            .map(|d| d as f64)
            .collect();
        stats::mean(&days)
    }

    /// Mean review score over rows that carry one; absent when none do.
    pub fn average_review_score(&self, window: &Window) -> Option<f64> {
        let scores: Vec<f64> = self
            .in_window(window)
            .filter_map(|r| r.review_score)
            .map(|s| s as f64)
            .collect();
        stats::mean(&scores)
    }

    /// All headline KPIs for one window, or `None` when the window has no
    /// rows at all — the explicit "no data for this period" sentinel, which
    /// callers must render differently from a $0 period.
    pub fn kpi_snapshot(&self, window: &Window) -> Option<KpiSnapshot> {
        let order_count = self.order_count(window);
        if order_count == 0 {
            debug!(start = %window.start(), end = %window.end(), "window has no data");
            return None;
        }
        let total_revenue = self.total_revenue(window);
        Some(KpiSnapshot {
            total_revenue,
            order_count,
            average_order_value: total_revenue / order_count as f64,
            average_delivery_days: self.average_delivery_time(window),
            average_review_score: self.average_review_score(window),
        })
    }

    /// Sum of payment values attached to in-window orders. Reported beside
    /// revenue; the two are never combined.
    pub fn payments_total(&self, window: &Window, payments: &[OrderPayment]) -> f64 {
        let orders: BTreeSet<&str> = self.in_window(window).map(|r| r.order_id.as_str()).collect();
        payments
            .iter()
            .filter(|p| orders.contains(p.order_id.as_str()))
            .map(|p| p.value)
            .sum()
    }

    /// Order-level value distribution; `None` when the window has no orders.
    pub fn order_summary(&self, window: &Window) -> Option<OrderSummary> {
        let mut per_order: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
        for row in self.in_window(window) {
            let entry = per_order.entry(row.order_id.as_str()).or_insert((0.0, 0));
            entry.0 += row.price;
            entry.1 += 1;
        }
        if per_order.is_empty() {
            return None;
        }

        let mut values: Vec<f64> = per_order.values().map(|(v, _)| *v).collect();
        let total_orders = per_order.len() as u64;
        let total_revenue: f64 = values.iter().sum();
        let total_items: u64 = per_order.values().map(|(_, n)| *n).sum();

        let min_order_value = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max_order_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let median_order_value = stats::median(&mut values)?;

        Some(OrderSummary {
            total_orders,
            total_revenue,
            average_order_value: total_revenue / total_orders as f64,
            median_order_value,
            min_order_value,
            max_order_value,
            mean_items_per_order: total_items as f64 / total_orders as f64,
        })
    }
}
