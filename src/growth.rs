use crate::schema::{GrowthPoint, MonthPeriod, MonthlyRevenue};

/// Fractional change from `previous` to `current`.
///
/// Undefined when the previous revenue is zero, so the result never carries an
/// infinite or NaN rate.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let rate = (current - previous) / previous;
    rate.is_finite().then_some(rate)
}

/// Annotates each month with its growth relative to the preceding entry of the
/// same series. The first entry has no prior period and gets `None`.
pub fn growth_series(aggregate: &[MonthlyRevenue]) -> Vec<GrowthPoint> {
    let mut previous: Option<f64> = None;

    aggregate
        .iter()
        .map(|month| {
            let growth_rate = previous.and_then(|prev| percent_change(prev, month.revenue));
            previous = Some(month.revenue);
            GrowthPoint {
                period: month.period,
                revenue: month.revenue,
                growth_rate,
            }
        })
        .collect()
}

pub fn find_point(series: &[GrowthPoint], period: MonthPeriod) -> Option<&GrowthPoint> {
    series
        .binary_search_by_key(&period, |point| point.period)
        .ok()
        .map(|idx| &series[idx])
}

/// Mean of the defined growth rates. Undefined rates are excluded rather than
/// counted as zero; `None` when no rate is defined.
pub fn mean_growth_rate(series: &[GrowthPoint]) -> Option<f64> {
    let rates: Vec<f64> = series.iter().filter_map(|p| p.growth_rate).collect();
    if rates.is_empty() {
        return None;
    }
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(values: &[(u32, f64)]) -> Vec<MonthlyRevenue> {
        values
            .iter()
            .map(|&(m, revenue)| MonthlyRevenue {
                period: MonthPeriod::new(2023, m).unwrap(),
                revenue,
                transactions: 1,
            })
            .collect()
    }

    #[test]
    fn test_growth_series_rates() {
        let series = growth_series(&monthly(&[(1, 1000.0), (2, 1200.0), (3, 900.0)]));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].growth_rate, None);
        assert!((series[1].growth_rate.unwrap() - 0.20).abs() < 1e-12);
        assert!((series[2].growth_rate.unwrap() + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_first_period_excluded_from_mean() {
        let series = growth_series(&monthly(&[(1, 1000.0), (2, 1200.0), (3, 900.0)]));
        let mean = mean_growth_rate(&series).unwrap();
        assert!((mean + 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_zero_previous_revenue_is_undefined() {
        let series = growth_series(&monthly(&[(1, 0.0), (2, 500.0), (3, 250.0)]));
        assert_eq!(series[1].growth_rate, None);
        assert!((series[2].growth_rate.unwrap() + 0.5).abs() < 1e-12);
        assert!((mean_growth_rate(&series).unwrap() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_month_has_no_mean() {
        let series = growth_series(&monthly(&[(6, 700.0)]));
        assert_eq!(mean_growth_rate(&series), None);
        assert_eq!(mean_growth_rate(&[]), None);
    }

    #[test]
    fn test_gap_month_compares_with_previous_entry() {
        // March is missing, so April is measured against February.
        let series = growth_series(&monthly(&[(2, 100.0), (4, 150.0)]));
        assert!((series[1].growth_rate.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_find_point() {
        let series = growth_series(&monthly(&[(1, 10.0), (3, 30.0)]));
        let march = MonthPeriod::new(2023, 3).unwrap();
        assert_eq!(find_point(&series, march).map(|p| p.revenue), Some(30.0));
        assert!(find_point(&series, MonthPeriod::new(2023, 2).unwrap()).is_none());
    }
}
