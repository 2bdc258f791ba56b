//! Geographic revenue aggregates by customer state.
//!
//! Rows with no known state are excluded from the table — revenue is never
//! attributed to a guessed location — and the exclusion count travels with
//! the result.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use analytics_core::Window;

use crate::engine::MetricsEngine;

/// Revenue for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRevenue {
    pub state: String,
    pub revenue: f64,
}

/// Extended per-state performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatePerformance {
    pub state: String,
    pub revenue: f64,
    pub order_count: u64,
    pub customer_count: u64,
    pub average_order_value: f64,
    pub revenue_per_customer: f64,
    /// Share of the window's state-attributed revenue, in percent
    pub revenue_share_pct: f64,
}

/// A state table plus the rows it had to leave out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateBreakdown<T> {
    /// Revenue-descending, state-ascending on ties
    pub states: Vec<T>,
    /// In-window rows with no customer state
    pub rows_without_state: u64,
}

fn rank(a_revenue: f64, a_state: &str, b_revenue: f64, b_state: &str) -> Ordering {
    b_revenue
        .partial_cmp(&a_revenue)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_state.cmp(b_state))
}

impl<'a> MetricsEngine<'a> {
    /// Revenue per customer state over one window.
    pub fn revenue_by_state(&self, window: &Window) -> StateBreakdown<StateRevenue> {
        let mut revenue: BTreeMap<&str, f64> = BTreeMap::new();
        let mut rows_without_state = 0u64;

        for row in self.in_window(window) {
            match row.customer_state.as_deref() {
                Some(state) => *revenue.entry(state).or_insert(0.0) += row.price,
                None => rows_without_state += 1,
            }
        }

        let mut states: Vec<StateRevenue> = revenue
            .into_iter()
            .map(|(state, revenue)| StateRevenue {
                state: state.to_string(),
                revenue,
            })
            .collect();
        states.sort_by(|a, b| rank(a.revenue, &a.state, b.revenue, &b.state));

        StateBreakdown {
            states,
            rows_without_state,
        }
    }

    /// Extended per-state performance over one window.
    pub fn state_performance(&self, window: &Window) -> StateBreakdown<StatePerformance> {
        struct Agg<'r> {
            revenue: f64,
            orders: BTreeSet<&'r str>,
            customers: BTreeSet<&'r str>,
        }

        let mut per_state: BTreeMap<&str, Agg<'_>> = BTreeMap::new();
        let mut rows_without_state = 0u64;
        let mut attributed_revenue = 0.0;

        for row in self.in_window(window) {
            let Some(state) = row.customer_state.as_deref() else {
                rows_without_state += 1;
                continue;
            };
            attributed_revenue += row.price;
            let agg = per_state.entry(state).or_insert(Agg {
                revenue: 0.0,
                orders: BTreeSet::new(),
                customers: BTreeSet::new(),
            });
            agg.revenue += row.price;
            agg.orders.insert(row.order_id.as_str());
            agg.customers.insert(row.customer_id.as_str());
        }

        let mut states: Vec<StatePerformance> = per_state
            .into_iter()
            .map(|(state, agg)| StatePerformance {
                state: state.to_string(),
                revenue: agg.revenue,
                order_count: agg.orders.len() as u64,
                customer_count: agg.customers.len() as u64,
                average_order_value: agg.revenue / agg.orders.len() as f64,
                revenue_per_customer: agg.revenue / agg.customers.len() as f64,
                revenue_share_pct: if attributed_revenue > 0.0 {
                    agg.revenue / attributed_revenue * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        states.sort_by(|a, b| rank(a.revenue, &a.state, b.revenue, &b.state));

        StateBreakdown {
            states,
            rows_without_state,
        }
    }
}
