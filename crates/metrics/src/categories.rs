//! Product-category rankings over the extended (categorized) rows.

use std::collections::{BTreeMap, BTreeSet};
use std::cmp::Ordering;

use serde::Serialize;

use analytics_core::{CategorizedRow, Window};

/// One line of the revenue ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    /// Category name, or the explicit `uncategorized` bucket
    pub category: String,
    pub revenue: f64,
}

/// One line of the extended category performance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub revenue: f64,
    pub items_sold: u64,
    pub average_item_price: f64,
    pub order_count: u64,
    pub product_count: u64,
    /// Share of the window's total category revenue, in percent
    pub revenue_share_pct: f64,
    pub mean_items_per_order: f64,
}

/// Revenue-descending ordering with a category-name tie-break, so equal
/// revenues always rank alphabetically.
fn rank(a_revenue: f64, a_name: &str, b_revenue: f64, b_name: &str) -> Ordering {
    b_revenue
        .partial_cmp(&a_revenue)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_name.cmp(b_name))
}

/// Top `n` categories by in-window revenue. Rows without a category land in
/// the `uncategorized` bucket rather than being dropped.
pub fn top_categories(rows: &[CategorizedRow], window: &Window, n: usize) -> Vec<CategoryRevenue> {
    let mut revenue: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows.iter().filter(|r| window.contains(r.sales.purchased_at)) {
        *revenue.entry(row.category_label()).or_insert(0.0) += row.sales.price;
    }

    let mut ranking: Vec<CategoryRevenue> = revenue
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            revenue,
        })
        .collect();
    ranking.sort_by(|a, b| rank(a.revenue, &a.category, b.revenue, &b.category));
    ranking.truncate(n);
    ranking
}

/// Extended per-category performance, top `n` by revenue with the same
/// deterministic ordering as `top_categories`.
pub fn category_performance(
    rows: &[CategorizedRow],
    window: &Window,
    n: usize,
) -> Vec<CategoryPerformance> {
    struct Agg<'r> {
        revenue: f64,
        items: u64,
        orders: BTreeSet<&'r str>,
        products: BTreeSet<&'r str>,
    }

    let mut per_category: BTreeMap<&str, Agg<'_>> = BTreeMap::new();
    let mut window_revenue = 0.0;

    for row in rows.iter().filter(|r| window.contains(r.sales.purchased_at)) {
        window_revenue += row.sales.price;
        let agg = per_category.entry(row.category_label()).or_insert(Agg {
            revenue: 0.0,
            items: 0,
            orders: BTreeSet::new(),
            products: BTreeSet::new(),
        });
        agg.revenue += row.sales.price;
        agg.items += 1;
        agg.orders.insert(row.sales.order_id.as_str());
        agg.products.insert(row.sales.product_id.as_str());
    }

    let mut ranking: Vec<CategoryPerformance> = per_category
        .into_iter()
        .map(|(category, agg)| CategoryPerformance {
            category: category.to_string(),
            revenue: agg.revenue,
            items_sold: agg.items,
            average_item_price: agg.revenue / agg.items as f64,
            order_count: agg.orders.len() as u64,
            product_count: agg.products.len() as u64,
            revenue_share_pct: if window_revenue > 0.0 {
                agg.revenue / window_revenue * 100.0
            } else {
                0.0
            },
            mean_items_per_order: agg.items as f64 / agg.orders.len() as f64,
        })
        .collect();
    ranking.sort_by(|a, b| rank(a.revenue, &a.category, b.revenue, &b.category));
    ranking.truncate(n);
    ranking
}
