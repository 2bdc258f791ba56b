//! Metrics engine: windowed KPIs, growth comparisons, rankings, and
//! delivery/satisfaction analysis over a merged sales-row collection.
//!
//! Every operation is a pure function of (rows, window) with a deterministic
//! result; "no data" is always an explicit sentinel, never a fake zero.

pub mod categories;
pub mod delivery;
pub mod engine;
pub mod geography;
pub mod growth;
pub mod reviews;
mod stats;
pub mod trend;

pub use categories::{category_performance, top_categories, CategoryPerformance, CategoryRevenue};
pub use delivery::{BucketConfig, DeliveryBucket, DeliveryBuckets, DeliverySummary};
pub use engine::{KpiSnapshot, MetricsEngine, OrderSummary};
pub use geography::{StateBreakdown, StatePerformance, StateRevenue};
pub use growth::{yoy_growth, Growth, Metric, MonthlyMetrics, YoyReport};
pub use reviews::ReviewSummary;
pub use trend::{Period, PeriodRevenue};
