use crate::forecast::KpiSummary;
use crate::schema::MonthlyRevenue;
use crate::utils::{format_currency, format_percent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough data to generate insights.";

const RECOMMENDATIONS: [&str; 3] = [
    "Focus marketing efforts during **high-performing months**",
    "Investigate causes for dips in **low-performing months**",
    "Plan inventory based on **predicted growth direction**",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    /// Strictly positive average growth is a positive trend; zero or an
    /// undefined average is negative.
    pub fn from_avg_growth(avg_growth_rate: Option<f64>) -> Self {
        match avg_growth_rate {
            Some(rate) if rate > 0.0 => Trend::Positive,
            _ => Trend::Negative,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Positive => write!(f, "positive"),
            Trend::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Fluctuating,
}

impl Stability {
    pub fn classify(revenue_std_dev: f64, avg_monthly_revenue: f64) -> Self {
        if revenue_std_dev < avg_monthly_revenue {
            Stability::Stable
        } else {
            Stability::Fluctuating
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Stable => write!(f, "stable"),
            Stability::Fluctuating => write!(f, "fluctuating"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insights {
    InsufficientData {
        message: String,
    },
    Narrative {
        trend: Trend,
        stability: Stability,
        #[schemars(description = "Markdown bullet lines, in display order")]
        bullets: Vec<String>,
        recommendations: Vec<String>,
    },
}

impl Insights {
    pub fn insufficient() -> Self {
        Insights::InsufficientData {
            message: INSUFFICIENT_DATA_MESSAGE.to_string(),
        }
    }

    pub fn to_markdown(&self) -> String {
        match self {
            Insights::InsufficientData { message } => message.clone(),
            Insights::Narrative {
                bullets,
                recommendations,
                ..
            } => {
                let mut lines: Vec<String> = bullets.iter().map(|b| format!("- {}", b)).collect();
                lines.push("- **Business Recommendation:**".to_string());
                lines.extend(recommendations.iter().map(|r| format!("  - {}", r)));
                lines.join("\n")
            }
        }
    }
}

fn bold(text: impl fmt::Display) -> String {
    format!("**{}**", text)
}

/// Builds the textual insights for a display series. Fewer than two months
/// produce the insufficient-data notice.
pub fn narrate(kpis: &KpiSummary, display: &[MonthlyRevenue], currency: &str) -> Insights {
    if display.len() < 2 {
        return Insights::insufficient();
    }

    let (Some(best), Some(worst), Some(std_dev)) =
        (&kpis.best_month, &kpis.worst_month, kpis.revenue_std_dev)
    else {
        return Insights::insufficient();
    };

    let trend = Trend::from_avg_growth(kpis.avg_growth_rate);
    let stability = Stability::classify(std_dev, kpis.avg_monthly_revenue);
    let avg_growth = kpis
        .avg_growth_rate
        .map(|rate| format_percent(rate * 100.0))
        .unwrap_or_else(|| crate::forecast::NOT_AVAILABLE.to_string());

    let bullets = vec![
        format!(
            "**Overall Trend:** Revenue shows a {} with an average monthly growth of {}.",
            bold(format!("{} growth trend", trend)),
            bold(avg_growth)
        ),
        format!(
            "**Best Performing Month:** {} generated the highest revenue of {}.",
            bold(best.period.label()),
            bold(format_currency(best.revenue, currency))
        ),
        format!(
            "**Lowest Performing Month:** {} recorded the lowest revenue at {}.",
            bold(worst.period.label()),
            bold(format_currency(worst.revenue, currency))
        ),
        format!(
            "**Revenue Stability:** Monthly revenue variation (volatility) is {}, indicating {}.",
            bold(format_currency(std_dev, currency)),
            bold(format!("{} sales behavior", stability))
        ),
        format!(
            "**Growth Outlook:** Based on recent growth ({}), the {}, assuming current trends continue.",
            format_percent(kpis.expected_growth_pct),
            bold(format!(
                "next month is expected to reach {}",
                format_currency(kpis.next_month_revenue, currency)
            ))
        ),
    ];

    Insights::Narrative {
        trend,
        stability,
        bullets,
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::compute_kpis;
    use crate::growth::growth_series;
    use crate::schema::MonthPeriod;

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
    fn test_trend_boundary() {
        assert_eq!(Trend::from_avg_growth(Some(0.0001)), Trend::Positive);
        assert_eq!(Trend::from_avg_growth(Some(0.0)), Trend::Negative);
        assert_eq!(Trend::from_avg_growth(Some(-0.3)), Trend::Negative);
        assert_eq!(Trend::from_avg_growth(None), Trend::Negative);
    }

    #[test]
    fn test_stability_boundary() {
        assert_eq!(Stability::classify(99.0, 100.0), Stability::Stable);
        assert_eq!(Stability::classify(100.0, 100.0), Stability::Fluctuating);
        assert_eq!(Stability::classify(250.0, 100.0), Stability::Fluctuating);
    }

    #[test]
    fn test_single_month_is_insufficient() {
        let display = monthly(&[(1, 1000.0)]);
        let kpis = compute_kpis(&display, &growth_series(&display));
        let insights = narrate(&kpis, &display, "₹");
        assert_eq!(insights, Insights::insufficient());
        assert_eq!(insights.to_markdown(), INSUFFICIENT_DATA_MESSAGE);
    }

    #[test]
    fn test_narrative_contents() {
        let display = monthly(&[(1, 1000.0), (2, 1200.0), (3, 900.0)]);
        let kpis = compute_kpis(&display, &growth_series(&display));
        let insights = narrate(&kpis, &display, "₹");

        let Insights::Narrative {
            trend,
            stability,
            bullets,
            recommendations,
        } = &insights
        else {
            panic!("expected a narrative, got {:?}", insights);
        };

        assert_eq!(*trend, Trend::Negative);
        assert_eq!(*stability, Stability::Stable);
        assert_eq!(bullets.len(), 5);
        assert_eq!(recommendations.len(), 3);
        assert!(bullets[0].contains("**negative growth trend**"));
        assert!(bullets[0].contains("**-2.50%**"));
        assert!(bullets[1].contains("**Feb 2023**"));
        assert!(bullets[1].contains("**₹1,200**"));
        assert!(bullets[2].contains("**Mar 2023**"));
        assert!(bullets[3].contains("**stable sales behavior**"));
        assert!(bullets[4].contains("₹900"));
        assert!(bullets[4].contains("-25.00%"));

        let markdown = insights.to_markdown();
        assert!(markdown.starts_with("- **Overall Trend:**"));
        assert!(markdown.contains("  - Plan inventory based on **predicted growth direction**"));
    }
}
