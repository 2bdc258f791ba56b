//! Delivery-time analysis: configurable duration buckets correlated with
//! review scores, and the overall delivery summary.

use serde::{Deserialize, Serialize};

use analytics_core::{Error, Result, Window};

use crate::engine::MetricsEngine;
use crate::stats;

/// Upper day-bounds of the delivery buckets. `[3, 7, 14]` yields the four
/// default buckets 0–3, 4–7, 8–14, and 15+ days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct BucketConfig {
    bounds: Vec<i64>,
}

impl BucketConfig {
    /// Bounds must be non-negative and strictly increasing.
    pub fn new(bounds: Vec<i64>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(Error::invalid_config("bucket bounds must not be empty"));
        }
        if bounds[0] < 0 {
            return Err(Error::invalid_config("bucket bounds must be non-negative"));
        }
        if bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::invalid_config(
                "bucket bounds must be strictly increasing",
            ));
        }
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &[i64] {
        &self.bounds
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            bounds: vec![3, 7, 14],
        }
    }
}

impl TryFrom<Vec<i64>> for BucketConfig {
    type Error = Error;

    fn try_from(bounds: Vec<i64>) -> Result<Self> {
        Self::new(bounds)
    }
}

impl From<BucketConfig> for Vec<i64> {
    fn from(config: BucketConfig) -> Self {
        config.bounds
    }
}

/// One delivery-duration bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryBucket {
    /// Human label, e.g. `"4-7 days"` or `"15+ days"`
    pub label: String,
    pub min_days: i64,
    /// Absent for the open-ended final bucket
    pub max_days: Option<i64>,
    pub rows: u64,
    /// Absent when the bucket is empty
    pub mean_review_score: Option<f64>,
}

/// The bucket table plus the rows it could not place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryBuckets {
    pub buckets: Vec<DeliveryBucket>,
    /// In-window rows with no defined delivery duration
    pub excluded_no_duration: u64,
    /// Rows with a duration but no review score
    pub excluded_no_review: u64,
}

/// Overall delivery statistics for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverySummary {
    pub mean_days: f64,
    pub median_days: f64,
    pub min_days: i64,
    pub max_days: i64,
    /// Distinct orders among rows with a defined duration
    pub delivered_orders: u64,
    /// Percent of rows delivered on or before the promised date; absent
    /// when no row carries an estimate
    pub on_time_rate_pct: Option<f64>,
}

impl<'a> MetricsEngine<'a> {
    /// Partition in-window rows by delivery duration and report the mean
    /// review score per bucket.
    ///
    /// Rows without a defined duration, or without a review score, are
    /// excluded and counted — never folded in as zero.
    pub fn delivery_buckets(&self, window: &Window, config: &BucketConfig) -> DeliveryBuckets {
        let bounds = config.bounds();

        let mut buckets: Vec<(DeliveryBucket, f64)> = Vec::with_capacity(bounds.len() + 1);
        let mut lower = 0i64;
        for &bound in bounds {
            buckets.push((
                DeliveryBucket {
                    label: format!("{lower}-{bound} days"),
                    min_days: lower,
                    max_days: Some(bound),
                    rows: 0,
                    mean_review_score: None,
                },
                0.0,
            ));
            lower = bound + 1;
        }
        buckets.push((
            DeliveryBucket {
                label: format!("{lower}+ days"),
                min_days: lower,
                max_days: None,
                rows: 0,
                mean_review_score: None,
            },
            0.0,
        ));

        let mut excluded_no_duration = 0u64;
        let mut excluded_no_review = 0u64;

        for row in self.in_window(window) {
            let Some(days) = row.delivery_days else {
                excluded_no_duration += 1;
                continue;
            };
            let Some(score) = row.review_score else {
                excluded_no_review += 1;
                continue;
            };
            let index = bounds
                .iter()
                .position(|&bound| days <= bound)
                .unwrap_or(bounds.len());
            let (bucket, score_sum) = &mut buckets[index];
            bucket.rows += 1;
            *score_sum += score as f64;
        }

        let buckets = buckets
            .into_iter()
            .map(|(mut bucket, score_sum)| {
                if bucket.rows > 0 {
                    bucket.mean_review_score = Some(score_sum / bucket.rows as f64);
                }
                bucket
            })
            .collect();

        DeliveryBuckets {
            buckets,
            excluded_no_duration,
            excluded_no_review,
        }
    }

    /// Delivery statistics over rows with a defined duration; `None` when
    /// the window has none.
    pub fn delivery_summary(&self, window: &Window) -> Option<DeliverySummary> {
        let mut days: Vec<f64> = Vec::new();
        let mut min_days = i64::MAX;
        let mut max_days = i64::MIN;
        let mut orders: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
        let mut on_time = 0u64;
        let mut with_estimate = 0u64;

        for row in self.in_window(window) {
            let Some(d) = row.delivery_days else { continue };
            days.push(d as f64);
            min_days = min_days.min(d);
            max_days = max_days.max(d);
            orders.insert(row.order_id.as_str());
            if let Some(on_time_row) = row.on_time() {
                with_estimate += 1;
                if on_time_row {
                    on_time += 1;
                }
            }
        }

        let mean_days = stats::mean(&days)?;
        let median_days = stats::median(&mut days)?;

        Some(DeliverySummary {
            mean_days,
            median_days,
            min_days,
            max_days,
            delivered_orders: orders.len() as u64,
            on_time_rate_pct: if with_estimate > 0 {
                Some(on_time as f64 / with_estimate as f64 * 100.0)
            } else {
                None
            },
        })
    }
}
