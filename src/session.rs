//! Analysis session: merge once, query many windows.

use analytics_core::{CategorizedRow, OrderPayment, RawTables, Result, SalesRow};
use dataset_merge::{load, merge, with_products, MergeReport};
use metrics_engine::MetricsEngine;

/// One merged dataset and everything needed to query it.
///
/// Built once per set of raw tables; the sales rows are immutable from then
/// on, so engines handed out here can be queried with different windows — or
/// from different threads — without re-merging.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    sales: Vec<SalesRow>,
    categorized: Vec<CategorizedRow>,
    payments: Vec<OrderPayment>,
    report: MergeReport,
}

impl AnalysisSession {
    /// Load, validate, and merge the six raw tables.
    pub fn build(raw: &RawTables) -> Result<Self> {
        let tables = load(raw)?;
        let outcome = merge(&tables);
        let categorized = with_products(&outcome.rows, &tables.products);
        Ok(Self {
            sales: outcome.rows,
            categorized,
            payments: tables.payments,
            report: outcome.report,
        })
    }

    /// A metrics engine over this session's sales rows.
    pub fn engine(&self) -> MetricsEngine<'_> {
        MetricsEngine::new(&self.sales)
    }

    pub fn sales(&self) -> &[SalesRow] {
        &self.sales
    }

    /// Rows with the product-category join applied, for category rankings.
    pub fn categorized(&self) -> &[CategorizedRow] {
        &self.categorized
    }

    pub fn payments(&self) -> &[OrderPayment] {
        &self.payments
    }

    /// What the merge produced and excluded.
    pub fn report(&self) -> &MergeReport {
        &self.report
    }
}
