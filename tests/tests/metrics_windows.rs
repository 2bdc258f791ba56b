//! Windowed metrics over the merged fixture data.

use analytics_core::Window;
use chrono::NaiveDate;
use commerce_analytics::AnalysisSession;
use dataset_merge::filter_window;
use integration_tests::fixtures;
use metrics_engine::{
    top_categories, yoy_growth, BucketConfig, Growth, Metric, Period,
};

fn window(y1: i32, m1: u32, d1: u32, y2: i32, m2: u32, d2: u32) -> Window {
    Window::new(
        NaiveDate::from_ymd_opt(y1, m1, d1).unwrap(),
        NaiveDate::from_ymd_opt(y2, m2, d2).unwrap(),
    )
    .unwrap()
}

/// The known fixture: $100 + $50 + $150 across Q1 2023.
#[test]
fn test_known_fixture_kpis() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let q1 = window(2023, 1, 1, 2023, 3, 31);

    assert_eq!(engine.total_revenue(&q1), 300.0);
    assert_eq!(engine.order_count(&q1), 3);
    assert_eq!(engine.average_order_value(&q1), Some(100.0));

    let snapshot = engine.kpi_snapshot(&q1).unwrap();
    assert_eq!(snapshot.total_revenue, 300.0);
    assert_eq!(snapshot.order_count, 3);
}

/// A window outside every purchase date yields the "no data" sentinel from
/// every KPI and empty collections from every table, never an error.
#[test]
fn test_empty_window_sentinels() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let empty = window(2025, 6, 1, 2025, 6, 30);

    assert_eq!(engine.kpi_snapshot(&empty), None);
    assert_eq!(engine.total_revenue(&empty), 0.0);
    assert_eq!(engine.order_count(&empty), 0);
    assert_eq!(engine.average_order_value(&empty), None);
    assert_eq!(engine.average_delivery_time(&empty), None);
    assert_eq!(engine.average_review_score(&empty), None);
    assert_eq!(engine.order_summary(&empty), None);
    assert_eq!(engine.delivery_summary(&empty), None);
    assert_eq!(engine.review_summary(&empty), None);

    assert!(engine.revenue_by_state(&empty).states.is_empty());
    assert!(engine
        .revenue_by_period(&empty, Period::Month)
        .is_empty());
    assert!(top_categories(session.categorized(), &empty, 10).is_empty());
}

/// Zero previous-period revenue reports "not applicable", never infinity.
#[test]
fn test_growth_sentinel_on_zero_baseline() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let january = window(2023, 1, 1, 2023, 1, 31);
    let previous = january.previous().unwrap();

    let growth = engine
        .period_growth(&january, &previous, Metric::Revenue)
        .unwrap();
    assert_eq!(growth, Growth::NotApplicable);
}

/// Growth between two populated windows of equal length.
#[test]
fn test_period_growth_between_months() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    // 28-day windows holding o1 ($100) and o2 ($50)
    let current = window(2023, 2, 1, 2023, 2, 28);
    let previous = window(2023, 1, 4, 2023, 1, 31);

    let growth = engine
        .period_growth(&current, &previous, Metric::Revenue)
        .unwrap();
    assert_eq!(growth, Growth::Pct(-50.0));
}

/// Mismatched comparison durations are rejected, not auto-corrected.
#[test]
fn test_mismatched_comparison_window_rejected() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let current = window(2023, 2, 1, 2023, 2, 28);
    let previous = window(2023, 1, 1, 2023, 1, 31);
    assert!(engine
        .period_growth(&current, &previous, Metric::Revenue)
        .is_err());
}

/// Year-over-year growth over caller-windowed row sets.
#[test]
fn test_yoy_growth_over_calendar_years() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let rows_2023 = filter_window(
        session.sales(),
        &Window::calendar_year(2023).unwrap(),
    );
    let rows_2022 = filter_window(
        session.sales(),
        &Window::calendar_year(2022).unwrap(),
    );

    let report = yoy_growth(&rows_2023, &rows_2022, Metric::Revenue);
    assert_eq!(report.current_value, Some(300.0));
    assert_eq!(report.previous_value, Some(0.0));
    assert_eq!(report.growth, Growth::NotApplicable);
}

/// Equal category revenues rank alphabetically: Books before Electronics.
#[test]
fn test_category_ranking_tie_break() {
    let mut raw = fixtures::standard_tables();
    raw.order_items = fixtures::items_table(vec![
        vec!["o1", "p1", "200.0", "10.0"],
        vec!["o2", "p2", "200.0", "5.0"],
    ]);
    raw.products = fixtures::products_table(vec![
        vec!["p1", "Electronics"],
        vec!["p2", "Books"],
    ]);
    let session = AnalysisSession::build(&raw).unwrap();
    let ranking = top_categories(
        session.categorized(),
        &window(2023, 1, 1, 2023, 12, 31),
        10,
    );
    assert_eq!(ranking[0].category, "Books");
    assert_eq!(ranking[1].category, "Electronics");
    assert_eq!(ranking[0].revenue, 200.0);
}

/// State revenue attribution with deterministic ordering.
#[test]
fn test_revenue_by_state() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let breakdown = engine.revenue_by_state(&window(2023, 1, 1, 2023, 12, 31));

    let table: Vec<(&str, f64)> = breakdown
        .states
        .iter()
        .map(|s| (s.state.as_str(), s.revenue))
        .collect();
    assert_eq!(table, vec![("TX", 150.0), ("CA", 100.0), ("NY", 50.0)]);
    assert_eq!(breakdown.rows_without_state, 0);
}

/// Delivery buckets correlate duration with review score end to end.
#[test]
fn test_delivery_buckets_pipeline() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let result = engine.delivery_buckets(
        &window(2023, 1, 1, 2023, 12, 31),
        &BucketConfig::default(),
    );

    // o1: 3 days / score 5 — o2: 10 days / score 3 — o3: 21 days / score 1
    assert_eq!(result.buckets[0].rows, 1);
    assert_eq!(result.buckets[0].mean_review_score, Some(5.0));
    assert_eq!(result.buckets[1].rows, 0);
    assert_eq!(result.buckets[2].rows, 1);
    assert_eq!(result.buckets[2].mean_review_score, Some(3.0));
    assert_eq!(result.buckets[3].rows, 1);
    assert_eq!(result.buckets[3].mean_review_score, Some(1.0));
}

/// Custom bucket bounds reshape the partition.
#[test]
fn test_delivery_buckets_custom_bounds() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let config = BucketConfig::new(vec![15]).unwrap();
    let result = engine.delivery_buckets(&window(2023, 1, 1, 2023, 12, 31), &config);

    assert_eq!(result.buckets.len(), 2);
    assert_eq!(result.buckets[0].label, "0-15 days");
    assert_eq!(result.buckets[0].rows, 2);
    assert_eq!(result.buckets[1].label, "16+ days");
    assert_eq!(result.buckets[1].rows, 1);
}

/// Payments stay beside revenue; freight never leaks into either.
#[test]
fn test_payments_and_revenue_stay_separate() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let q1 = window(2023, 1, 1, 2023, 3, 31);

    assert_eq!(engine.total_revenue(&q1), 300.0);
    assert_eq!(engine.payments_total(&q1, session.payments()), 330.0);
}

/// Monthly trend series over the fixture.
#[test]
fn test_monthly_trend_series() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let series = engine.revenue_by_period(&Window::calendar_year(2023).unwrap(), Period::Month);

    assert_eq!(series.len(), 3);
    assert_eq!(
        series[0].period_start,
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    );
    assert_eq!(series[0].revenue, 100.0);
    assert_eq!(series[2].revenue, 150.0);
}

/// Delivery summary statistics, including the on-time rate.
#[test]
fn test_delivery_summary_on_time_rate() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let summary = engine
        .delivery_summary(&window(2023, 1, 1, 2023, 12, 31))
        .unwrap();

    assert_eq!(summary.delivered_orders, 3);
    assert_eq!(summary.min_days, 3);
    assert_eq!(summary.max_days, 21);
    // o1 beat its estimate; o2 and o3 missed theirs
    let rate = summary.on_time_rate_pct.unwrap();
    assert!((rate - 100.0 / 3.0).abs() < 1e-9);
}

/// Review summary over the fixture; slower deliveries score worse.
#[test]
fn test_review_summary_correlation() {
    let session = AnalysisSession::build(&fixtures::standard_tables()).unwrap();
    let engine = session.engine();
    let summary = engine
        .review_summary(&window(2023, 1, 1, 2023, 12, 31))
        .unwrap();

    assert_eq!(summary.reviewed_orders, 3);
    assert_eq!(summary.mean_score, 3.0);
    assert!((summary.five_star_pct - 100.0 / 3.0).abs() < 1e-9);
    let r = summary.delivery_correlation.unwrap();
    assert!(r < -0.9);
}
