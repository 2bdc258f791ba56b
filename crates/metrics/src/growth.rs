//! Growth comparisons: period-over-period, year-over-year, and
//! month-over-month series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use analytics_core::{Error, Result, SalesRow, Window};

use crate::engine::MetricsEngine;

/// The scalar a growth comparison is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Orders,
    AverageOrderValue,
}

/// A growth figure, or the explicit sentinel for an undefined one.
///
/// A zero or undefined baseline yields `NotApplicable`, never infinity and
/// never a clamped number — thin comparison windows are common and callers
/// must be able to render "n/a" distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    /// Percentage change, `(current - previous) / previous * 100`
    Pct(f64),
    NotApplicable,
}

impl Growth {
    /// Growth between two metric values. `NotApplicable` when either value
    /// is undefined or the baseline is zero.
    pub fn from_values(current: Option<f64>, previous: Option<f64>) -> Self {
        match (current, previous) {
            (Some(current), Some(previous)) if previous != 0.0 => {
                Self::Pct((current - previous) / previous * 100.0)
            }
            _ => Self::NotApplicable,
        }
    }

    pub fn pct(&self) -> Option<f64> {
        match self {
            Self::Pct(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Pct(_))
    }
}

/// Metric value over an already-windowed row set. Revenue and order count
/// are totals (zero is legitimate); average order value is absent with zero
/// orders.
fn metric_value<'r>(rows: impl IntoIterator<Item = &'r SalesRow>, metric: Metric) -> Option<f64> {
    let mut revenue = 0.0;
    let mut orders: BTreeSet<&str> = BTreeSet::new();
    for row in rows {
        revenue += row.price;
        orders.insert(row.order_id.as_str());
    }
    match metric {
        Metric::Revenue => Some(revenue),
        Metric::Orders => Some(orders.len() as f64),
        Metric::AverageOrderValue => {
            if orders.is_empty() {
                None
            } else {
                Some(revenue / orders.len() as f64)
            }
        }
    }
}

/// Year-over-year comparison between two caller-windowed row sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoyReport {
    pub metric: Metric,
    pub current_value: Option<f64>,
    pub previous_value: Option<f64>,
    pub absolute_change: Option<f64>,
    pub growth: Growth,
}

/// Growth between two full-year row sets (windowed by the caller, typically
/// via `Window::calendar_year`).
pub fn yoy_growth(current: &[SalesRow], previous: &[SalesRow], metric: Metric) -> YoyReport {
    let current_value = metric_value(current.iter(), metric);
    let previous_value = metric_value(previous.iter(), metric);
    let absolute_change = match (current_value, previous_value) {
        (Some(c), Some(p)) => Some(c - p),
        _ => None,
    };
    YoyReport {
        metric,
        current_value,
        previous_value,
        absolute_change,
        growth: Growth::from_values(current_value, previous_value),
    }
}

/// One month of a month-over-month series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetrics {
    /// Calendar month, 1–12; only months with data appear
    pub month: u32,
    pub revenue: f64,
    pub order_count: u64,
    pub average_order_value: f64,
    /// Change against the preceding month in the series
    pub revenue_growth: Growth,
    pub orders_growth: Growth,
    /// Trailing 3-month moving average of revenue; present once three
    /// months accumulate and only when smoothing was requested
    pub revenue_ma3: Option<f64>,
}

impl<'a> MetricsEngine<'a> {
    /// Growth of one metric between a primary window and a comparison
    /// window of equal day count. Mismatched durations are an error, never
    /// auto-corrected.
    pub fn period_growth(
        &self,
        current: &Window,
        previous: &Window,
        metric: Metric,
    ) -> Result<Growth> {
        if current.day_count() != previous.day_count() {
            return Err(Error::invalid_window(format!(
                "comparison window covers {} days, primary covers {}",
                previous.day_count(),
                current.day_count()
            )));
        }
        Ok(Growth::from_values(
            metric_value(self.in_window(current), metric),
            metric_value(self.in_window(previous), metric),
        ))
    }

    /// Month-over-month revenue and order metrics for one calendar year,
    /// in month order. With `smoothing`, a trailing 3-month moving average
    /// of revenue is attached once enough months accumulate.
    pub fn month_over_month(&self, year: i32, smoothing: bool) -> Vec<MonthlyMetrics> {
        struct MonthAgg<'r> {
            revenue: f64,
            orders: BTreeSet<&'r str>,
        }

        let mut months: BTreeMap<u32, MonthAgg<'_>> = BTreeMap::new();
        for row in self.rows().iter().filter(|r| r.purchased_at.year() == year) {
            let agg = months.entry(row.purchased_at.month()).or_insert(MonthAgg {
                revenue: 0.0,
                orders: BTreeSet::new(),
            });
            agg.revenue += row.price;
            agg.orders.insert(row.order_id.as_str());
        }

        let mut series = Vec::with_capacity(months.len());
        let mut previous: Option<(f64, u64)> = None;
        let mut revenue_tail: Vec<f64> = Vec::new();

        for (month, agg) in months {
            let order_count = agg.orders.len() as u64;
            revenue_tail.push(agg.revenue);

            let (revenue_growth, orders_growth) = match previous {
                Some((prev_revenue, prev_orders)) => (
                    Growth::from_values(Some(agg.revenue), Some(prev_revenue)),
                    Growth::from_values(Some(order_count as f64), Some(prev_orders as f64)),
                ),
                None => (Growth::NotApplicable, Growth::NotApplicable),
            };

            let revenue_ma3 = if smoothing && revenue_tail.len() >= 3 {
                let tail = &revenue_tail[revenue_tail.len() - 3..];
                Some(tail.iter().sum::<f64>() / 3.0)
            } else {
                None
            };

            series.push(MonthlyMetrics {
                month,
                revenue: agg.revenue,
                order_count,
                average_order_value: agg.revenue / order_count as f64,
                revenue_growth,
                orders_growth,
                revenue_ma3,
            });
            previous = Some((agg.revenue, order_count));
        }
        series
    }
}
