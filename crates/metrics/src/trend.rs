//! Trend series: revenue aggregated by calendar period.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use analytics_core::Window;

use crate::engine::MetricsEngine;

/// Calendar granularity for trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// First day of the period containing `date`. Weeks start on Monday.
    fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                let back = date.weekday().num_days_from_monday() as u64;
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Self::Month => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
            }
            Self::Quarter => {
                let quarter_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), quarter_month, 1).unwrap_or(date)
            }
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }
}

/// One point of a revenue trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRevenue {
    pub period_start: NaiveDate,
    pub revenue: f64,
    pub order_count: u64,
    pub average_order_value: f64,
}

impl<'a> MetricsEngine<'a> {
    /// Revenue per calendar period inside one window, in period order.
    /// Periods with no rows are simply absent from the series.
    pub fn revenue_by_period(&self, window: &Window, period: Period) -> Vec<PeriodRevenue> {
        struct Agg<'r> {
            revenue: f64,
            orders: BTreeSet<&'r str>,
        }

        let mut periods: BTreeMap<NaiveDate, Agg<'_>> = BTreeMap::new();
        for row in self.in_window(window) {
            let start = period.bucket_start(row.purchased_at.date_naive());
            let agg = periods.entry(start).or_insert(Agg {
                revenue: 0.0,
                orders: BTreeSet::new(),
            });
            agg.revenue += row.price;
            agg.orders.insert(row.order_id.as_str());
        }

        periods
            .into_iter()
            .map(|(period_start, agg)| PeriodRevenue {
                period_start,
                revenue: agg.revenue,
                order_count: agg.orders.len() as u64,
                average_order_value: agg.revenue / agg.orders.len() as f64,
            })
            .collect()
    }
}
