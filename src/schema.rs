use crate::utils::{first_day_of_month, next_month, prev_month};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, represented canonically by its first day.
///
/// Ordering is chronological, so a `BTreeMap<MonthPeriod, _>` iterates months in
/// ascending order regardless of how their labels would sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct MonthPeriod {
    start: NaiveDate,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        first_day_of_month(year, month).map(|start| Self { start })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            start: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Abbreviated label used on the chart axis, e.g. "Jan 2023".
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    /// Full month name used by the month filter, e.g. "January".
    pub fn month_name(&self) -> String {
        self.start.format("%B").to_string()
    }

    /// Full month and year, e.g. "January 2023".
    pub fn long_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    pub fn next(&self) -> Option<Self> {
        let (year, month) = next_month(self.year(), self.month());
        Self::new(year, month)
    }

    pub fn prev(&self) -> Option<Self> {
        let (year, month) = prev_month(self.year(), self.month());
        Self::new(year, month)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A normalized sales transaction. Only rows with a valid date and amount
/// make it this far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    pub date: NaiveDate,
    pub product_category: String,
    pub gender: String,
    #[schemars(description = "Non-negative transaction total")]
    pub total_amount: f64,
    pub period: MonthPeriod,
}

impl Transaction {
    pub fn new(date: NaiveDate, product_category: String, gender: String, total_amount: f64) -> Self {
        Self {
            date,
            product_category,
            gender,
            total_amount,
            period: MonthPeriod::from_date(date),
        }
    }
}

/// Summed revenue for one month of a filtered scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyRevenue {
    pub period: MonthPeriod,
    pub revenue: f64,
    #[schemars(description = "Number of transactions contributing to this month")]
    pub transactions: usize,
}

/// One month of a growth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrowthPoint {
    pub period: MonthPeriod,
    pub revenue: f64,
    #[schemars(
        description = "Fractional change from the preceding month of the same series. Null for the first month and when the preceding revenue is zero."
    )]
    pub growth_rate: Option<f64>,
}

/// A labelled point of the monthly revenue trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartPoint {
    pub label: String,
    pub revenue: f64,
}

impl From<&MonthlyRevenue> for ChartPoint {
    fn from(month: &MonthlyRevenue) -> Self {
        Self {
            label: month.period.label(),
            revenue: month.revenue,
        }
    }
}
