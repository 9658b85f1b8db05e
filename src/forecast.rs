use crate::engine::total_revenue;
use crate::growth::{find_point, mean_growth_rate};
use crate::schema::{GrowthPoint, MonthPeriod, MonthlyRevenue};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NOT_AVAILABLE: &str = "N/A";

/// Headline numbers of the dashboard.
///
/// Revenue totals and statistics are taken from the display series. The
/// previous/next month figures and growth rates are taken from the base series,
/// so narrowing the month selection never changes the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KpiSummary {
    #[schemars(description = "Last month present in the display series")]
    pub selected_month: Option<MonthPeriod>,

    pub total_revenue: f64,

    #[schemars(description = "Mean monthly revenue of the display series, 0 when it is empty")]
    pub avg_monthly_revenue: f64,

    pub previous_month_revenue: f64,

    #[schemars(description = "One-step extrapolation: previous revenue * (1 + growth rate)")]
    pub next_month_revenue: f64,

    #[schemars(description = "Growth rate of the selected month, in percent")]
    pub expected_growth_pct: f64,

    pub previous_month_label: String,

    pub next_month_label: String,

    pub best_month: Option<MonthlyRevenue>,

    pub worst_month: Option<MonthlyRevenue>,

    #[schemars(description = "Sample standard deviation of monthly revenue, null below two months")]
    pub revenue_std_dev: Option<f64>,

    #[schemars(description = "Mean of the defined base-series growth rates, as a fraction")]
    pub avg_growth_rate: Option<f64>,
}

impl Default for KpiSummary {
    fn default() -> Self {
        Self {
            selected_month: None,
            total_revenue: 0.0,
            avg_monthly_revenue: 0.0,
            previous_month_revenue: 0.0,
            next_month_revenue: 0.0,
            expected_growth_pct: 0.0,
            previous_month_label: NOT_AVAILABLE.to_string(),
            next_month_label: NOT_AVAILABLE.to_string(),
            best_month: None,
            worst_month: None,
            revenue_std_dev: None,
            avg_growth_rate: None,
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample (n - 1) standard deviation; `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Highest revenue month; the earliest one wins a tie.
pub fn best_month(series: &[MonthlyRevenue]) -> Option<&MonthlyRevenue> {
    series.iter().fold(None, |best: Option<&MonthlyRevenue>, m| match best {
        Some(b) if m.revenue <= b.revenue => Some(b),
        _ => Some(m),
    })
}

/// Lowest revenue month; the earliest one wins a tie.
pub fn worst_month(series: &[MonthlyRevenue]) -> Option<&MonthlyRevenue> {
    series.iter().fold(None, |worst: Option<&MonthlyRevenue>, m| match worst {
        Some(w) if m.revenue >= w.revenue => Some(w),
        _ => Some(m),
    })
}

/// Forecast figures for the month after `selected`, read from the base series.
struct Projection {
    previous_revenue: f64,
    next_revenue: f64,
    expected_growth_pct: f64,
    previous_label: String,
    next_label: String,
}

fn project(selected: MonthPeriod, base: &[GrowthPoint]) -> Option<Projection> {
    let previous_month = selected.prev()?;
    let previous = find_point(base, previous_month)?;
    let current = find_point(base, selected)?;

    let (next_revenue, expected_growth_pct) = match current.growth_rate {
        Some(rate) => (previous.revenue * (1.0 + rate), rate * 100.0),
        None => (0.0, 0.0),
    };

    Some(Projection {
        previous_revenue: previous.revenue,
        next_revenue,
        expected_growth_pct,
        previous_label: previous_month.long_label(),
        next_label: selected
            .next()
            .map(|m| m.long_label())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    })
}

/// Derives every KPI from the display series `display` and the base growth
/// series `base`. An empty display series yields [`KpiSummary::default`].
pub fn compute_kpis(display: &[MonthlyRevenue], base: &[GrowthPoint]) -> KpiSummary {
    let revenues: Vec<f64> = display.iter().map(|m| m.revenue).collect();

    let mut kpis = KpiSummary {
        total_revenue: total_revenue(display),
        avg_monthly_revenue: mean(&revenues).unwrap_or(0.0),
        best_month: best_month(display).cloned(),
        worst_month: worst_month(display).cloned(),
        revenue_std_dev: sample_std_dev(&revenues),
        ..KpiSummary::default()
    };

    let Some(selected) = display.last().map(|m| m.period) else {
        debug!("Display series is empty, KPIs fall back to defaults");
        return kpis;
    };
    kpis.selected_month = Some(selected);
    kpis.avg_growth_rate = mean_growth_rate(base);

    match project(selected, base) {
        Some(projection) => {
            kpis.previous_month_revenue = projection.previous_revenue;
            kpis.next_month_revenue = projection.next_revenue;
            kpis.expected_growth_pct = projection.expected_growth_pct;
            kpis.previous_month_label = projection.previous_label;
            kpis.next_month_label = projection.next_label;
        }
        None => debug!(
            "No base-series data around {}, forecast left at defaults",
            selected
        ),
    }

    kpis
}
