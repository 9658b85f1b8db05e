//! # Sales Dashboard
//!
//! A library for turning a table of retail transactions into the numbers behind
//! a sales dashboard: monthly revenue, month-over-month growth, a one-step
//! revenue forecast and a short textual narrative.
//!
//! ## Core Concepts
//!
//! - **Segment**: the transactions matching the selected product categories and genders
//! - **Base Series**: monthly revenue of the segment over every month; growth and the
//!   forecast are read from here so a month selection cannot distort them
//! - **Display Series**: monthly revenue after the month selection is applied as well;
//!   used for the chart and the headline totals
//! - **Growth Rate**: fractional change from one chronological month to the next within
//!   a series, undefined for the first month
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_dashboard::*;
//!
//! let dashboard = SalesDashboard::load("retail_sales_dataset.csv")?;
//! let mut filters = dashboard.default_filters();
//! filters.months.retain(|m| m == "November" || m == "December");
//!
//! let report = dashboard.compute(&filters);
//! println!("Next month: {:.0}", report.kpis.next_month_revenue);
//! println!("{}", report.insights.to_markdown());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod growth;
pub mod ingestion;
pub mod insights;
pub mod schema;
pub mod utils;

pub use config::{DashboardConfig, DashboardFilters, FilterOptions, DEFAULT_CURRENCY_SYMBOL};
pub use engine::{aggregate, total_revenue};
pub use error::{DashboardError, Result};
pub use forecast::{compute_kpis, KpiSummary, NOT_AVAILABLE};
pub use growth::{growth_series, mean_growth_rate, percent_change};
pub use ingestion::{
    load_transactions, load_transactions_from_reader, normalize_records, LoadReport,
    RawTransaction,
};
pub use insights::{narrate, Insights, Stability, Trend};
pub use schema::*;

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Everything a presentation layer needs to draw one dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardReport {
    pub filters: DashboardFilters,
    pub kpis: KpiSummary,
    /// Monthly revenue trend, in chronological order
    pub chart: Vec<ChartPoint>,
    pub display_series: Vec<MonthlyRevenue>,
    pub base_series: Vec<GrowthPoint>,
    pub insights: Insights,
}

impl DashboardReport {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardReport)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Runs the whole pipeline for one filter selection, rendering money in the
/// default currency.
pub fn compute_dashboard(
    transactions: &[Transaction],
    filters: &DashboardFilters,
) -> DashboardReport {
    compute_dashboard_with_currency(transactions, filters, DEFAULT_CURRENCY_SYMBOL)
}

pub fn compute_dashboard_with_currency(
    transactions: &[Transaction],
    filters: &DashboardFilters,
    currency: &str,
) -> DashboardReport {
    let base_monthly = aggregate(transactions, |tx| filters.matches_segment(tx));
    let base_series = growth_series(&base_monthly);
    let display_series = aggregate(transactions, |tx| filters.matches(tx));

    debug!(
        "Base series has {} months, display series has {} months",
        base_series.len(),
        display_series.len()
    );

    let kpis = compute_kpis(&display_series, &base_series);
    let insights = narrate(&kpis, &display_series, currency);
    let chart = display_series.iter().map(ChartPoint::from).collect();

    DashboardReport {
        filters: filters.clone(),
        kpis,
        chart,
        display_series,
        base_series,
        insights,
    }
}

/// A loaded, read-only dataset that can be queried with any number of filter
/// selections.
#[derive(Debug, Clone)]
pub struct SalesDashboard {
    transactions: Vec<Transaction>,
    options: FilterOptions,
    load_report: LoadReport,
    currency_symbol: String,
}

impl SalesDashboard {
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let load_report = LoadReport {
            rows_read: transactions.len(),
            rows_kept: transactions.len(),
            ..LoadReport::default()
        };
        Self::with_report(transactions, load_report)
    }

    fn with_report(transactions: Vec<Transaction>, load_report: LoadReport) -> Self {
        let options = FilterOptions::from_transactions(&transactions);
        info!(
            "Dataset ready: {} transactions, {} categories, {} genders, {} month names",
            transactions.len(),
            options.categories.len(),
            options.genders.len(),
            options.months.len()
        );
        Self {
            transactions,
            options,
            load_report,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let (transactions, report) = load_transactions(path)?;
        Ok(Self::with_report(transactions, report))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let (transactions, report) = load_transactions_from_reader(reader)?;
        Ok(Self::with_report(transactions, report))
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Ok(Self::load(&config.data_path)?.with_currency(config.currency_symbol.clone()))
    }

    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn default_filters(&self) -> DashboardFilters {
        DashboardFilters::all(&self.options)
    }

    pub fn compute(&self, filters: &DashboardFilters) -> DashboardReport {
        compute_dashboard_with_currency(&self.transactions, filters, &self.currency_symbol)
    }
}
