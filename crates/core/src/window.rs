//! Inclusive date windows.
//!
//! Every metric filters rows through a `Window` on the purchase timestamp,
//! so KPI, chart, and table outputs stay consistent for the same bounds.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds", into = "WindowBounds")]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

/// Serialized form of a window; deserialization re-validates the bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for Window {
    type Error = Error;

    fn try_from(bounds: WindowBounds) -> Result<Self> {
        Self::new(bounds.start, bounds.end)
    }
}

impl From<Window> for WindowBounds {
    fn from(window: Window) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }
}

impl Window {
    /// Build a window. Inverted bounds are an error, never silently swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_window(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The full calendar year `[Jan 1, Dec 31]`.
    pub fn calendar_year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(Error::invalid_window(format!(
                "year {year} is out of range"
            ))),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, inclusive of both bounds.
    pub fn day_count(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// The equal-length window ending the day before this one starts.
    pub fn previous(&self) -> Result<Self> {
        let len = self.day_count() as u64;
        let end = self
            .start
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| Error::invalid_window("window start precedes representable dates"))?;
        let start = self
            .start
            .checked_sub_days(Days::new(len))
            .ok_or_else(|| Error::invalid_window("window start precedes representable dates"))?;
        Ok(Self { start, end })
    }

    /// Whether a timestamp's calendar date falls inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let date = ts.date_naive();
        date >= self.start && date <= self.end
    }

    /// The calendar year of the window start (used for year-scoped series).
    pub fn start_year(&self) -> i32 {
        self.start.year()
    }
}
