use crate::schema::{MonthPeriod, MonthlyRevenue, Transaction};
use log::debug;
use std::collections::BTreeMap;

/// Running state for one month while grouping.
#[derive(Default)]
struct MonthBucket {
    revenue: f64,
    transactions: usize,
}

/// Groups the transactions accepted by `predicate` by calendar month and sums
/// their amounts.
///
/// The result is ordered chronologically with exactly one entry per month that
/// has at least one accepted transaction. Months with no accepted transactions
/// are absent, not zero-filled, and an empty selection yields an empty vector.
pub fn aggregate<F>(transactions: &[Transaction], predicate: F) -> Vec<MonthlyRevenue>
where
    F: Fn(&Transaction) -> bool,
{
    let mut buckets: BTreeMap<MonthPeriod, MonthBucket> = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| predicate(tx)) {
        let bucket = buckets.entry(tx.period).or_default();
        bucket.revenue += tx.total_amount;
        bucket.transactions += 1;
    }

    debug!(
        "Aggregated {} transactions into {} months",
        transactions.len(),
        buckets.len()
    );

    buckets
        .into_iter()
        .map(|(period, bucket)| MonthlyRevenue {
            period,
            revenue: bucket.revenue,
            transactions: bucket.transactions,
        })
        .collect()
}

pub fn total_revenue(series: &[MonthlyRevenue]) -> f64 {
    series.iter().map(|m| m.revenue).sum()
}
