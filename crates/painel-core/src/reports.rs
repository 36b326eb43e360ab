//! Report structures for API responses

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{margin_percent, MonthlyReportRow, YearSeries};
use crate::summary::{ClientSegmentStats, DashboardSnapshot};

/// Whole-year totals shown under the monthly table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    #[serde(rename = "total_entradas")]
    pub total_income: Decimal,
    #[serde(rename = "total_saidas")]
    pub total_expense: Decimal,
    #[serde(rename = "faturamento_liquido")]
    pub net_revenue: Decimal,
    /// Net as a percentage of income, 0 when there was no income
    #[serde(rename = "margem")]
    pub margin_percent: Decimal,
    #[serde(rename = "transacoes_count")]
    pub transaction_count: u32,
}

impl YearTotals {
    pub fn from_series(series: &YearSeries) -> Self {
        let total_income = series.total_income();
        let net_revenue = series.net_revenue();
        Self {
            total_income,
            total_expense: series.total_expense(),
            net_revenue,
            margin_percent: margin_percent(net_revenue, total_income),
            transaction_count: series.transaction_count(),
        }
    }
}

/// Monthly report response: all twelve months plus the year totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "meses")]
    pub months: Vec<MonthlyReportRow>,
    #[serde(rename = "totais")]
    pub totals: YearTotals,
}

impl MonthlyReport {
    pub fn from_series(series: &YearSeries) -> Self {
        Self {
            year: series.year,
            months: series.report_rows(),
            totals: YearTotals::from_series(series),
        }
    }
}

/// Everything the dashboard shows, bundled for download
#[derive(Debug, Clone, Serialize)]
pub struct DashboardExport {
    pub dashboard: DashboardSnapshot,
    #[serde(rename = "relatorio_mensal")]
    pub monthly_report: MonthlyReport,
    #[serde(rename = "estatisticas_clientes")]
    pub client_segments: Vec<ClientSegmentStats>,
    #[serde(rename = "export_timestamp")]
    pub exported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_year, PartialMonthData};
    use crate::summary::{DelinquencySummary, MonthSummary};
    use painel_config::MonthLocale;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn series() -> YearSeries {
        aggregate_year(
            2024,
            &[
                PartialMonthData::new(1, dec("300"), dec("100"), 3),
                PartialMonthData::new(3, dec("150"), dec("50"), 2),
            ],
            MonthLocale::Pt,
        )
    }

    #[test]
    fn test_year_totals() {
        let totals = YearTotals::from_series(&series());
        assert_eq!(totals.total_income, dec("450"));
        assert_eq!(totals.total_expense, dec("150"));
        assert_eq!(totals.net_revenue, dec("300"));
        assert_eq!(totals.margin_percent, dec("66.7"));
        assert_eq!(totals.transaction_count, 5);
    }

    #[test]
    fn test_year_totals_without_income() {
        let empty = aggregate_year(2024, &[], MonthLocale::Pt);
        assert_eq!(YearTotals::from_series(&empty).margin_percent, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_report_shape() {
        let report = MonthlyReport::from_series(&series());
        assert_eq!(report.months.len(), 12);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ano"], 2024);
        assert_eq!(json["meses"][2]["nome_mes"], "Mar");
        assert_eq!(json["meses"][2]["faturamento_liquido"], 100.0);
        assert_eq!(json["meses"][1]["transacoes_count"], 0);
        assert_eq!(json["totais"]["transacoes_count"], 5);
    }

    #[test]
    fn test_dashboard_export_keys() {
        let bundle = DashboardExport {
            dashboard: DashboardSnapshot {
                current_month: MonthSummary::zero(),
                delinquency: DelinquencySummary {
                    count: 0,
                    total_owed: Decimal::ZERO,
                },
            },
            monthly_report: MonthlyReport::from_series(&series()),
            client_segments: vec![],
            exported_at: Utc::now(),
        };
        let json = serde_json::to_value(&bundle).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["dashboard", "relatorio_mensal", "estatisticas_clientes", "export_timestamp"]
        );
    }
}
