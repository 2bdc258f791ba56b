//! Review-score analysis at order granularity.

use std::collections::BTreeMap;

use serde::Serialize;

use analytics_core::Window;

use crate::engine::MetricsEngine;
use crate::stats;

/// Order-level review statistics for one window.
///
/// Sales rows repeat an order's review once per line item, so everything
/// here is computed over one entry per reviewed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub mean_score: f64,
    pub median_score: f64,
    pub reviewed_orders: u64,
    /// Orders per score value, keyed 1–5
    pub distribution: BTreeMap<u8, u64>,
    pub five_star_pct: f64,
    pub four_plus_pct: f64,
    pub two_minus_pct: f64,
    /// Pearson correlation between delivery days and review score; absent
    /// with fewer than two orders carrying both
    pub delivery_correlation: Option<f64>,
}

impl<'a> MetricsEngine<'a> {
    /// Review statistics over in-window orders that have a review; `None`
    /// when none do.
    pub fn review_summary(&self, window: &Window) -> Option<ReviewSummary> {
        let mut per_order: BTreeMap<&str, (u8, Option<i64>)> = BTreeMap::new();
        for row in self.in_window(window) {
            let Some(score) = row.review_score else { continue };
            per_order
                .entry(row.order_id.as_str())
                .or_insert((score, row.delivery_days));
        }
        if per_order.is_empty() {
            return None;
        }

        let reviewed_orders = per_order.len() as u64;
        let mut scores: Vec<f64> = Vec::with_capacity(per_order.len());
        let mut distribution: BTreeMap<u8, u64> = BTreeMap::new();
        let mut corr_days: Vec<f64> = Vec::new();
        let mut corr_scores: Vec<f64> = Vec::new();

        for (score, delivery_days) in per_order.values() {
            scores.push(*score as f64);
            *distribution.entry(*score).or_insert(0) += 1;
            if let Some(days) = delivery_days {
                corr_days.push(*days as f64);
                corr_scores.push(*score as f64);
            }
        }

        let share = |matching: u64| matching as f64 / reviewed_orders as f64 * 100.0;
        let count_where = |predicate: &dyn Fn(u8) -> bool| {
            distribution
                .iter()
                .filter(|(score, _)| predicate(**score))
                .map(|(_, n)| *n)
                .sum::<u64>()
        };

        let mean_score = stats::mean(&scores)?;
        let median_score = stats::median(&mut scores)?;

        Some(ReviewSummary {
            mean_score,
            median_score,
            reviewed_orders,
            five_star_pct: share(count_where(&|s| s == 5)),
            four_plus_pct: share(count_where(&|s| s >= 4)),
            two_minus_pct: share(count_where(&|s| s <= 2)),
            distribution,
            delivery_correlation: stats::pearson(&corr_days, &corr_scores),
        })
    }
}
