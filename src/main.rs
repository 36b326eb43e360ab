//! Painel main entry point

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use painel_api::start_server;
use painel_config::{Config, ConfigError};
use painel_core::{
    aggregate_year, summarize_current_month, LedgerStore, MemoryStore, MonthlyReport, YearSeries,
};
use painel_utils::format_currency;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "painel")]
#[command(version = "0.1.0")]
#[command(about = "Small business financial dashboard: ledger, monthly reports and exports", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server (default)
    Serve,
    /// Print the twelve-month report for a year
    Report {
        /// Calendar year, defaults to the current one
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Print the default configuration file
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::InitConfig) = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, found) = match load_config(&args.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration from {}", args.config.display());
            eprintln!("{}", e.to_details());
            return Err(e.into());
        }
    };
    init_logging(&config.logging.level);
    if found {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = open_store(&config).await?;
        match args.command.unwrap_or(Command::Serve) {
            Command::Report { year } => {
                let year = year.unwrap_or_else(|| Utc::now().year());
                print_report(&config, store.as_ref(), year, Utc::now().date_naive()).await
            }
            _ => start_server(config.clone(), store)
                .await
                .context("HTTP server failed"),
        }
    })
}

/// Load `path` when it exists, otherwise fall back to the defaults
fn load_config(path: &Path) -> Result<(Config, bool), ConfigError> {
    if !path.exists() {
        return Ok((Config::default(), false));
    }
    Ok((Config::load(path)?, true))
}

/// RUST_LOG wins over the configured level
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<MemoryStore>> {
    let store = if config.data.persist {
        let path = config.data_file();
        MemoryStore::open(&path)
            .await
            .with_context(|| format!("Failed to open ledger snapshot {}", path.display()))?
    } else {
        log::info!("Persistence disabled, records live in memory only");
        MemoryStore::new()
    };
    Ok(Arc::new(store))
}

async fn print_report(config: &Config, store: &dyn LedgerStore, year: i32, today: NaiveDate) -> anyhow::Result<()> {
    let partials = store.monthly_partials(year).await?;
    let series = aggregate_year(year, &partials, config.reports.month_labels);
    for line in render_report(config, &series, today) {
        println!("{}", line);
    }
    Ok(())
}

fn render_report(config: &Config, series: &YearSeries, today: NaiveDate) -> Vec<String> {
    let currency = &config.currency;
    let money = |value: Decimal| {
        format_currency(
            value,
            &currency.symbol,
            currency.decimal_places,
            &currency.thousands_separator,
            &currency.decimal_separator,
        )
    };

    let report = MonthlyReport::from_series(series);
    let mut lines = vec![
        format!("Relatório mensal {}", report.year),
        format!(
            "{:<5} {:>18} {:>18} {:>18} {:>8} {:>6}",
            "Mês", "Entradas", "Saídas", "Líquido", "Margem", "Qtd"
        ),
    ];
    for row in &report.months {
        lines.push(format!(
            "{:<5} {:>18} {:>18} {:>18} {:>7}% {:>6}",
            row.month_label,
            money(row.total_income),
            money(row.total_expense),
            money(row.net_revenue),
            row.margin_percent,
            row.transaction_count
        ));
    }
    let totals = &report.totals;
    lines.push(format!(
        "{:<5} {:>18} {:>18} {:>18} {:>7}% {:>6}",
        "Total",
        money(totals.total_income),
        money(totals.total_expense),
        money(totals.net_revenue),
        totals.margin_percent,
        totals.transaction_count
    ));

    if let Ok(current) = summarize_current_month(series, today) {
        lines.push(format!(
            "Mês atual: entradas {}, saídas {}, líquido {}",
            money(current.income),
            money(current.expense),
            money(current.net)
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use painel_core::PartialMonthData;

    #[test]
    fn test_render_report() {
        let config = Config::default();
        let series = aggregate_year(
            2024,
            &[PartialMonthData::new(3, "1500".parse().unwrap(), "500.5".parse().unwrap(), 3)],
            config.reports.month_labels,
        );

        let lines = render_report(&config, &series, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(lines.len(), 2 + 12 + 1 + 1);
        assert!(lines[4].starts_with("Mar"));
        assert!(lines[4].contains("R$ 1.500,00"));
        assert!(lines[4].contains("R$ 999,50"));
        assert!(lines.last().unwrap().contains("líquido R$ 999,50"));

        let other_year = render_report(&config, &series, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(other_year.len(), 2 + 12 + 1);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let (config, found) = load_config(Path::new("/nonexistent/painel/config.yaml")).unwrap();
        assert!(!found);
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_invalid_config_reports_details() {
        let dir = std::env::temp_dir().join(format!("painel-config-{}", painel_utils::generate_id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "server:\n  port: 0\n").unwrap();

        let details = load_config(&path).unwrap_err().to_details();
        assert_eq!(details.field.as_deref(), Some("server.port"));
        assert!(details.to_string().starts_with("[INVALID_VALUE]"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
