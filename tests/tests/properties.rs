//! Property tests for the engine's algebraic guarantees: revenue
//! additivity, zero-division safety, merge idempotence, and exclusion
//! accounting.

use analytics_core::{SalesRow, Window};
use chrono::{Days, NaiveDate, TimeZone, Utc};
use dataset_merge::{load, merge};
use integration_tests::fixtures;
use metrics_engine::{Growth, Metric, MetricsEngine};
use proptest::prelude::*;

fn sales_row(order: u32, price: f64, month: u32, day: u32) -> SalesRow {
    SalesRow {
        order_id: format!("o{order}"),
        customer_id: format!("c{order}"),
        customer_state: None,
        customer_city: None,
        purchased_at: Utc.with_ymd_and_hms(2023, month, day, 12, 0, 0).unwrap(),
        delivered_at: None,
        estimated_delivery_at: None,
        product_id: "p1".into(),
        price,
        freight_value: 0.0,
        review_score: None,
        delivery_days: None,
    }
}

proptest! {
    /// Revenue over a window equals the sum over any partition of it into
    /// two disjoint sub-windows.
    #[test]
    fn prop_revenue_additive_over_disjoint_windows(
        spec in prop::collection::vec((1u32..200, 0u64..100_000, 1u32..=12, 1u32..=28), 0..100),
        split in 0u64..364,
    ) {
        let rows: Vec<SalesRow> = spec
            .into_iter()
            .map(|(order, cents, month, day)| sales_row(order, cents as f64 / 100.0, month, day))
            .collect();
        let engine = MetricsEngine::new(&rows);

        let year = Window::calendar_year(2023).unwrap();
        let split_date = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(split))
            .unwrap();
        let first = Window::new(year.start(), split_date).unwrap();
        let second = Window::new(
            split_date.checked_add_days(Days::new(1)).unwrap(),
            year.end(),
        )
        .unwrap();

        let combined = engine.total_revenue(&first) + engine.total_revenue(&second);
        prop_assert!((combined - engine.total_revenue(&year)).abs() < 1e-6);
    }

    /// Average order value and growth never divide by zero; an empty or
    /// zero baseline always yields the defined sentinel.
    #[test]
    fn prop_zero_division_safety(
        spec in prop::collection::vec((1u32..50, 0u64..100_000, 1u32..=12, 1u32..=28), 0..40),
        month in 1u32..=12,
    ) {
        let rows: Vec<SalesRow> = spec
            .into_iter()
            .map(|(order, cents, m, day)| sales_row(order, cents as f64 / 100.0, m, day))
            .collect();
        let engine = MetricsEngine::new(&rows);

        let current = Window::new(
            NaiveDate::from_ymd_opt(2023, month, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, month, 28).unwrap(),
        )
        .unwrap();
        let previous = current.previous().unwrap();

        let aov = engine.average_order_value(&current);
        prop_assert_eq!(aov.is_none(), engine.order_count(&current) == 0);

        for metric in [Metric::Revenue, Metric::Orders, Metric::AverageOrderValue] {
            let growth = engine.period_growth(&current, &previous, metric).unwrap();
            if engine.order_count(&previous) == 0 {
                prop_assert_eq!(growth, Growth::NotApplicable);
            }
        }
    }

    /// Merging identical raw tables twice yields identical rows, negative
    /// amounts never survive, and every exclusion is accounted for.
    #[test]
    fn prop_merge_idempotent_with_exclusions(
        items in prop::collection::vec((0u32..5, -10_000i64..50_000), 0..60),
    ) {
        let orders: Vec<Vec<String>> = (0..5)
            .map(|i| {
                vec![
                    format!("o{i}"),
                    format!("c{i}"),
                    "delivered".to_string(),
                    format!("2023-0{}-10 10:00:00", i + 1),
                    String::new(),
                    String::new(),
                ]
            })
            .collect();
        let item_rows: Vec<Vec<String>> = items
            .iter()
            .map(|(order, cents)| {
                vec![
                    format!("o{order}"),
                    "p1".to_string(),
                    format!("{:.2}", *cents as f64 / 100.0),
                    "1.00".to_string(),
                ]
            })
            .collect();

        let mut raw = fixtures::empty_tables();
        raw.orders = analytics_core::RawTable::new(
            "orders",
            vec![
                "order_id".into(),
                "customer_id".into(),
                "order_status".into(),
                "order_purchase_timestamp".into(),
                "order_delivered_customer_date".into(),
                "order_estimated_delivery_date".into(),
            ],
            orders,
        );
        raw.order_items = analytics_core::RawTable::new(
            "order_items",
            vec![
                "order_id".into(),
                "product_id".into(),
                "price".into(),
                "freight_value".into(),
            ],
            item_rows,
        );

        let first = merge(&load(&raw).unwrap());
        let second = merge(&load(&raw).unwrap());
        prop_assert_eq!(&first.rows, &second.rows);

        let negatives = items.iter().filter(|(_, cents)| *cents < 0).count() as u64;
        prop_assert_eq!(first.report.exclusions.order_items.negative_amount, negatives);
        prop_assert!(first.rows.iter().all(|r| r.price >= 0.0));
        prop_assert_eq!(first.rows.len() as u64, items.len() as u64 - negatives);
    }
}
