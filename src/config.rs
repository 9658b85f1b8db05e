use crate::error::{DashboardError, Result};
use crate::schema::Transaction;
use crate::utils::canonical_month_name;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

/// The three selection sets driving one dashboard computation.
///
/// A transaction belongs to the *segment* when both its category and gender are
/// selected; it belongs to the *display scope* when, in addition, its month name
/// is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardFilters {
    #[serde(default)]
    #[schemars(description = "Selected product categories")]
    pub categories: BTreeSet<String>,

    #[serde(default)]
    #[schemars(description = "Selected customer genders")]
    pub genders: BTreeSet<String>,

    #[serde(default)]
    #[schemars(description = "Selected full month names, e.g. 'January'. Applies to every year.")]
    pub months: BTreeSet<String>,
}

impl DashboardFilters {
    /// Everything selected, the way the dashboard opens.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            categories: options.categories.iter().cloned().collect(),
            genders: options.genders.iter().cloned().collect(),
            months: options.months.iter().cloned().collect(),
        }
    }

    pub fn matches_segment(&self, tx: &Transaction) -> bool {
        self.categories.contains(&tx.product_category) && self.genders.contains(&tx.gender)
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_segment(tx) && self.months.contains(&tx.period.month_name())
    }

    /// Rewrites month names into their canonical full form ("jan" -> "January").
    pub fn normalized(self) -> Result<Self> {
        let months = self
            .months
            .iter()
            .map(|name| {
                canonical_month_name(name)
                    .map(str::to_string)
                    .ok_or_else(|| DashboardError::InvalidMonthName(name.clone()))
            })
            .collect::<Result<BTreeSet<String>>>()?;

        Ok(Self { months, ..self })
    }
}

/// The choices a presentation layer can offer for each filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterOptions {
    /// Sorted unique product categories
    pub categories: Vec<String>,
    /// Sorted unique genders
    pub genders: Vec<String>,
    /// Month names in order of first chronological appearance
    pub months: Vec<String>,
}

impl FilterOptions {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let categories: BTreeSet<&str> = transactions
            .iter()
            .map(|tx| tx.product_category.as_str())
            .collect();
        let genders: BTreeSet<&str> = transactions.iter().map(|tx| tx.gender.as_str()).collect();

        let periods: BTreeMap<_, String> = transactions
            .iter()
            .map(|tx| (tx.period, tx.period.month_name()))
            .collect();

        let mut months: Vec<String> = Vec::new();
        for name in periods.into_values() {
            if !months.contains(&name) {
                months.push(name);
            }
        }

        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
            genders: genders.into_iter().map(str::to_string).collect(),
            months,
        }
    }
}

/// Dashboard settings, loadable from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    #[schemars(description = "Path to the transactions CSV")]
    pub data_path: PathBuf,

    #[serde(default = "default_currency_symbol")]
    #[schemars(description = "Symbol prefixed to rendered money amounts. Defaults to '₹'.")]
    pub currency_symbol: String,

    #[serde(default)]
    #[schemars(description = "Initial filter selection. Omitted sets select everything.")]
    pub filters: Option<DashboardFilters>,
}

impl DashboardConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            currency_symbol: default_currency_symbol(),
            filters: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(self) -> Result<Self> {
        if self.data_path.as_os_str().is_empty() {
            return Err(DashboardError::InvalidConfig(
                "data_path must not be empty".to_string(),
            ));
        }

        let filters = self.filters.map(DashboardFilters::normalized).transpose()?;

        Ok(Self { filters, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, category: &str, gender: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, 10).unwrap(),
            category.to_string(),
            gender.to_string(),
            100.0,
        )
    }

    #[test]
    fn test_filter_options_ordering() {
        let transactions = vec![
            tx(2024, 1, "Electronics", "Male"),
            tx(2023, 12, "Beauty", "Female"),
            tx(2023, 2, "Clothing", "Male"),
            tx(2023, 1, "Beauty", "Female"),
        ];

        let options = FilterOptions::from_transactions(&transactions);
        assert_eq!(options.categories, vec!["Beauty", "Clothing", "Electronics"]);
        assert_eq!(options.genders, vec!["Female", "Male"]);
        assert_eq!(options.months, vec!["January", "February", "December"]);
    }

    #[test]
    fn test_all_filters_match_everything() {
        let transactions = vec![tx(2023, 1, "Beauty", "Female"), tx(2023, 5, "Clothing", "Male")];
        let filters = DashboardFilters::all(&FilterOptions::from_transactions(&transactions));
        assert!(transactions.iter().all(|t| filters.matches(t)));
    }

    #[test]
    fn test_segment_ignores_month_selection() {
        let mut filters = DashboardFilters::default();
        filters.categories.insert("Beauty".to_string());
        filters.genders.insert("Female".to_string());
        filters.months.insert("March".to_string());

        let january = tx(2023, 1, "Beauty", "Female");
        assert!(filters.matches_segment(&january));
        assert!(!filters.matches(&january));
        assert!(filters.matches(&tx(2023, 3, "Beauty", "Female")));
        assert!(!filters.matches_segment(&tx(2023, 3, "Beauty", "Male")));
    }

    #[test]
    fn test_normalized_month_names() {
        let mut filters = DashboardFilters::default();
        filters.months.insert("jan".to_string());
        filters.months.insert("MARCH".to_string());
        let normalized = filters.normalized().unwrap();
        assert!(normalized.months.contains("January"));
        assert!(normalized.months.contains("March"));

        let mut bad = DashboardFilters::default();
        bad.months.insert("Smarch".to_string());
        assert!(matches!(
            bad.normalized(),
            Err(DashboardError::InvalidMonthName(name)) if name == "Smarch"
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = DashboardConfig::from_json_str(
            r#"{
                "data_path": "retail_sales_dataset.csv",
                "filters": { "categories": ["Beauty"], "genders": ["Male"], "months": ["feb"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
        let filters = config.filters.unwrap();
        assert!(filters.months.contains("February"));
    }

    #[test]
    fn test_config_rejects_empty_path() {
        let result = DashboardConfig::from_json_str(r#"{ "data_path": "" }"#);
        assert!(matches!(result, Err(DashboardError::InvalidConfig(_))));
    }
}
