use crate::error::{DashboardError, Result};
use crate::schema::Transaction;
use crate::utils::parse_day_first_date;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DATE_COLUMN: &str = "Date";
pub const CATEGORY_COLUMN: &str = "Product Category";
pub const GENDER_COLUMN: &str = "Gender";
pub const AMOUNT_COLUMN: &str = "Total Amount";

const REQUIRED_COLUMNS: [&str; 4] = [DATE_COLUMN, CATEGORY_COLUMN, GENDER_COLUMN, AMOUNT_COLUMN];

/// A transaction row exactly as it appears in the source table.
///
/// Every field is kept as text so that a malformed value drops its own row
/// instead of failing the whole load. Extra columns are ignored; fields missing
/// from a short row read as empty text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Product Category", default)]
    pub product_category: String,
    #[serde(rename = "Gender", default)]
    pub gender: String,
    #[serde(rename = "Total Amount", default)]
    pub total_amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidDate,
    InvalidAmount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub invalid_dates: usize,
    pub invalid_amounts: usize,
    /// Records the CSV reader could not decode at all
    pub unreadable_rows: usize,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.invalid_dates + self.invalid_amounts + self.unreadable_rows
    }

    /// One-line account of the load, e.g. for a dashboard footer.
    pub fn summary(&self) -> String {
        if self.rows_dropped() == 0 {
            return format!("{} of {} rows loaded", self.rows_kept, self.rows_read);
        }
        format!(
            "{} of {} rows loaded ({} dropped: {} invalid dates, {} invalid amounts, {} unreadable)",
            self.rows_kept,
            self.rows_read,
            self.rows_dropped(),
            self.invalid_dates,
            self.invalid_amounts,
            self.unreadable_rows
        )
    }

    fn record(&mut self, outcome: &std::result::Result<Transaction, RejectReason>) {
        self.rows_read += 1;
        match outcome {
            Ok(_) => self.rows_kept += 1,
            Err(RejectReason::InvalidDate) => self.invalid_dates += 1,
            Err(RejectReason::InvalidAmount) => self.invalid_amounts += 1,
        }
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', "").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Turns one raw row into a [`Transaction`], or reports why it was rejected.
pub fn normalize_record(raw: &RawTransaction) -> std::result::Result<Transaction, RejectReason> {
    let date = parse_day_first_date(&raw.date).ok_or(RejectReason::InvalidDate)?;
    let total_amount = parse_amount(&raw.total_amount).ok_or(RejectReason::InvalidAmount)?;

    Ok(Transaction::new(
        date,
        raw.product_category.trim().to_string(),
        raw.gender.trim().to_string(),
        total_amount,
    ))
}

/// Normalizes raw rows, silently excluding any row whose date or amount does
/// not parse. The returned report counts what was dropped.
pub fn normalize_records(rows: &[RawTransaction]) -> (Vec<Transaction>, LoadReport) {
    let mut report = LoadReport::default();
    let mut transactions = Vec::with_capacity(rows.len());

    for raw in rows {
        let outcome = normalize_record(raw);
        report.record(&outcome);
        if let Ok(tx) = outcome {
            transactions.push(tx);
        }
    }

    if report.rows_dropped() > 0 {
        warn!(
            "Dropped {} of {} rows ({} invalid dates, {} invalid amounts)",
            report.rows_dropped(),
            report.rows_read,
            report.invalid_dates,
            report.invalid_amounts
        );
    }

    (transactions, report)
}

pub fn load_transactions_from_reader<R: Read>(reader: R) -> Result<(Vec<Transaction>, LoadReport)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn(column.to_string()));
        }
    }
    debug!("Transaction headers: {:?}", headers);

    let mut unreadable_rows = 0;
    let rows: Vec<RawTransaction> = csv_reader
        .deserialize::<RawTransaction>()
        .filter_map(|record| match record {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!("Skipping unreadable row: {}", e);
                unreadable_rows += 1;
                None
            }
        })
        .collect();

    let (transactions, mut report) = normalize_records(&rows);
    report.rows_read += unreadable_rows;
    report.unreadable_rows = unreadable_rows;
    info!(
        "Loaded {} transactions ({} rows read)",
        report.rows_kept, report.rows_read
    );

    Ok((transactions, report))
}

pub fn load_transactions(path: impl AsRef<Path>) -> Result<(Vec<Transaction>, LoadReport)> {
    let path = path.as_ref();
    info!("Reading transactions from {}", path.display());
    let file = File::open(path)?;
    load_transactions_from_reader(file)
}
