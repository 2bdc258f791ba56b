//! Raw-table builders for integration tests.

use analytics_core::{RawTable, RawTables};

/// String cells from string literals.
pub fn rows(rows: Vec<Vec<&str>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(str::to_string).collect())
        .collect()
}

/// Orders table with the full column set.
pub fn orders_table(data: Vec<Vec<&str>>) -> RawTable {
    RawTable::new(
        "orders",
        vec![
            "order_id".into(),
            "customer_id".into(),
            "order_status".into(),
            "order_purchase_timestamp".into(),
            "order_delivered_customer_date".into(),
            "order_estimated_delivery_date".into(),
        ],
        rows(data),
    )
}

pub fn items_table(data: Vec<Vec<&str>>) -> RawTable {
    RawTable::new(
        "order_items",
        vec![
            "order_id".into(),
            "product_id".into(),
            "price".into(),
            "freight_value".into(),
        ],
        rows(data),
    )
}

pub fn products_table(data: Vec<Vec<&str>>) -> RawTable {
    RawTable::new(
        "products",
        vec!["product_id".into(), "product_category_name".into()],
        rows(data),
    )
}

pub fn customers_table(data: Vec<Vec<&str>>) -> RawTable {
    RawTable::new(
        "customers",
        vec![
            "customer_id".into(),
            "customer_state".into(),
            "customer_city".into(),
        ],
        rows(data),
    )
}

pub fn reviews_table(data: Vec<Vec<&str>>) -> RawTable {
    RawTable::new(
        "reviews",
        vec![
            "review_id".into(),
            "order_id".into(),
            "review_score".into(),
            "review_creation_date".into(),
        ],
        rows(data),
    )
}

pub fn payments_table(data: Vec<Vec<&str>>) -> RawTable {
    RawTable::new(
        "payments",
        vec!["order_id".into(), "payment_value".into()],
        rows(data),
    )
}

/// All six tables, empty.
pub fn empty_tables() -> RawTables {
    RawTables {
        orders: orders_table(vec![]),
        order_items: items_table(vec![]),
        products: products_table(vec![]),
        customers: customers_table(vec![]),
        reviews: reviews_table(vec![]),
        payments: payments_table(vec![]),
    }
}

/// The standard fixture: three delivered orders with item prices $100, $50,
/// and $150 purchased on 2023-01-05, 2023-02-10, and 2023-03-20, plus one
/// shipped order that must never reach a metric.
pub fn standard_tables() -> RawTables {
    RawTables {
        orders: orders_table(vec![
            vec![
                "o1",
                "c1",
                "delivered",
                "2023-01-05 10:00:00",
                "2023-01-08 14:00:00",
                "2023-01-12 00:00:00",
            ],
            vec![
                "o2",
                "c2",
                "delivered",
                "2023-02-10 10:00:00",
                "2023-02-20 14:00:00",
                "2023-02-15 00:00:00",
            ],
            vec![
                "o3",
                "c3",
                "delivered",
                "2023-03-20 10:00:00",
                "2023-04-10 14:00:00",
                "2023-04-01 00:00:00",
            ],
            vec!["o4", "c4", "shipped", "2023-01-15 10:00:00", "", ""],
        ]),
        order_items: items_table(vec![
            vec!["o1", "p1", "100.0", "10.0"],
            vec!["o2", "p2", "50.0", "5.0"],
            vec!["o3", "p3", "150.0", "15.0"],
            vec!["o4", "p1", "999.0", "99.0"],
        ]),
        products: products_table(vec![
            vec!["p1", "books"],
            vec!["p2", "electronics"],
            vec!["p3", ""],
        ]),
        customers: customers_table(vec![
            vec!["c1", "CA", "Los Angeles"],
            vec!["c2", "NY", "New York"],
            vec!["c3", "TX", "Austin"],
            vec!["c4", "CA", "Fresno"],
        ]),
        reviews: reviews_table(vec![
            vec!["r1", "o1", "5", "2023-01-10 08:00:00"],
            vec!["r2", "o2", "3", "2023-02-22 08:00:00"],
            vec!["r3", "o3", "1", "2023-04-12 08:00:00"],
        ]),
        payments: payments_table(vec![
            vec!["o1", "110.0"],
            vec!["o2", "55.0"],
            vec!["o3", "165.0"],
            vec!["o4", "1098.0"],
        ]),
    }
}
