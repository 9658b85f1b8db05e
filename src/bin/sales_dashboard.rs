use anyhow::{bail, Context, Result};
use clap::Parser;
use dotenv::dotenv;
use sales_dashboard::utils::{format_currency, format_percent};
use sales_dashboard::{DashboardConfig, DashboardFilters, DashboardReport, SalesDashboard};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

const BAR_WIDTH: usize = 40;

/// Renders the retail sales dashboard for a transactions CSV.
#[derive(Debug, Parser)]
#[command(name = "sales-dashboard", version, about)]
struct Cli {
    /// Transactions CSV with Date, Product Category, Gender and Total Amount columns
    #[arg(long, env = "SALES_DASHBOARD_DATA")]
    data: Option<PathBuf>,

    /// JSON configuration file (data_path, currency_symbol, filters)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Product category to include (repeatable, default: all)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Gender to include (repeatable, default: all)
    #[arg(long = "gender")]
    genders: Vec<String>,

    /// Month name to include, e.g. "March" (repeatable, default: all)
    #[arg(long = "month")]
    months: Vec<String>,

    /// Currency symbol for money amounts
    #[arg(long)]
    currency: Option<String>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the JSON schema of the report and exit
    #[arg(long)]
    schema: bool,

    /// List the available filter values and exit
    #[arg(long)]
    options: bool,
}

fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => match &cli.data {
            Some(data) => DashboardConfig::new(data.clone()),
            None => bail!("no input data: pass --data, --config or set SALES_DASHBOARD_DATA"),
        },
    };

    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(currency) = &cli.currency {
        config.currency_symbol = currency.clone();
    }

    config.validate().context("invalid configuration")
}

/// Starts from the config selection (or everything) and lets each non-empty
/// CLI list replace the corresponding set.
fn resolve_filters(
    cli: &Cli,
    config: &DashboardConfig,
    dashboard: &SalesDashboard,
) -> Result<DashboardFilters> {
    let mut filters = config
        .filters
        .clone()
        .unwrap_or_else(|| dashboard.default_filters());

    let to_set = |values: &[String]| values.iter().cloned().collect::<BTreeSet<_>>();
    if !cli.categories.is_empty() {
        filters.categories = to_set(&cli.categories);
    }
    if !cli.genders.is_empty() {
        filters.genders = to_set(&cli.genders);
    }
    if !cli.months.is_empty() {
        filters.months = to_set(&cli.months);
    }

    filters.normalized().context("invalid month filter")
}

fn render_text(report: &DashboardReport, dashboard: &SalesDashboard) -> String {
    let currency = dashboard.currency_symbol();
    let kpis = &report.kpis;
    let mut out = String::new();

    out.push_str("Sales Prediction Dashboard\n\n");
    out.push_str("## Key Performance Indicators\n\n");
    let rows = [
        ("Total Revenue", format_currency(kpis.total_revenue, currency)),
        (
            "Avg Monthly Revenue",
            format_currency(kpis.avg_monthly_revenue, currency),
        ),
        (
            "Previous Month Revenue",
            format!(
                "{} ({})",
                format_currency(kpis.previous_month_revenue, currency),
                kpis.previous_month_label
            ),
        ),
        (
            "Next Month Revenue",
            format!(
                "{} ({})",
                format_currency(kpis.next_month_revenue, currency),
                kpis.next_month_label
            ),
        ),
        ("Expected Growth (%)", format_percent(kpis.expected_growth_pct)),
    ];
    for (name, value) in rows {
        out.push_str(&format!("  {:<24} {}\n", name, value));
    }

    out.push_str("\n## Monthly Revenue Trend\n\n");
    let peak = report
        .chart
        .iter()
        .map(|p| p.revenue)
        .fold(0.0_f64, f64::max);
    for point in &report.chart {
        let width = if peak > 0.0 {
            ((point.revenue / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {:<10} {:>14} {}\n",
            point.label,
            format_currency(point.revenue, currency),
            "#".repeat(width)
        ));
    }
    if report.chart.is_empty() {
        out.push_str("  (no data for the current selection)\n");
    }

    out.push_str("\n## Insights & Decision Support\n\n");
    out.push_str(&report.insights.to_markdown());
    out.push('\n');

    out.push_str(&format!("\nData: {}\n", dashboard.load_report().summary()));
    out
}

fn main() -> Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    if cli.schema {
        println!("{}", DashboardReport::schema_as_json()?);
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let dashboard = SalesDashboard::from_config(&config)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;

    if cli.options {
        println!("{}", serde_json::to_string_pretty(dashboard.options())?);
        return Ok(());
    }

    let filters = resolve_filters(&cli, &config, &dashboard)?;
    let report = dashboard.compute(&filters);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report, &dashboard));
    }

    Ok(())
}
