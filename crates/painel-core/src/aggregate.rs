//! Monthly aggregation
//!
//! Folds a year of activity into exactly twelve month buckets. The usual
//! input is the sparse per-month totals reported by the persistence
//! collaborator; raw transactions can be folded directly through
//! [`aggregate_transactions`], which produces the same series.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use painel_config::MonthLocale;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{normalize_money, Transaction};
use crate::types::TransactionKind;

/// Report totals are kept at cent precision
pub const MONEY_DECIMAL_PLACES: u32 = 2;

const PT_MONTHS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The twelve month abbreviations in calendar order
pub fn month_labels(locale: MonthLocale) -> &'static [&'static str; 12] {
    match locale {
        MonthLocale::Pt => &PT_MONTHS,
        MonthLocale::En => &EN_MONTHS,
    }
}

/// Round a report total to cents, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    normalize_money(
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// Money addition that saturates at the `Decimal` bounds instead of panicking
pub fn add_money(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        if b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Money subtraction that saturates at the `Decimal` bounds
pub fn sub_money(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        if b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Totals for one month as reported by the collaborator. Only months with
/// activity are present. Malformed numeric fields read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialMonthData {
    #[serde(rename = "mes", default, deserialize_with = "lenient_count")]
    pub month: u32,
    #[serde(rename = "ano", default)]
    pub year: Option<i32>,
    #[serde(rename = "total_entradas", default, deserialize_with = "lenient_money")]
    pub total_income: Decimal,
    #[serde(rename = "total_saidas", default, deserialize_with = "lenient_money")]
    pub total_expense: Decimal,
    #[serde(rename = "transacoes_count", default, deserialize_with = "lenient_count")]
    pub transaction_count: u32,
}

impl PartialMonthData {
    pub fn new(month: u32, total_income: Decimal, total_expense: Decimal, transaction_count: u32) -> Self {
        Self {
            month,
            year: None,
            total_income,
            total_expense,
            transaction_count,
        }
    }
}

fn lenient_money<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(money_from_value(&value))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

fn money_from_value(value: &serde_json::Value) -> Decimal {
    let parsed = match value {
        serde_json::Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    normalize_money(parsed.unwrap_or(Decimal::ZERO))
}

fn count_from_value(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// One month of the year series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    #[serde(rename = "mes")]
    pub month_index: u32,
    #[serde(rename = "nome_mes")]
    pub month_label: String,
    #[serde(rename = "total_entradas")]
    pub total_income: Decimal,
    #[serde(rename = "total_saidas")]
    pub total_expense: Decimal,
    #[serde(rename = "faturamento_liquido")]
    pub net_revenue: Decimal,
    #[serde(rename = "transacoes_count")]
    pub transaction_count: u32,
}

impl MonthBucket {
    fn empty(month_index: u32, label: &str) -> Self {
        Self {
            month_index,
            month_label: label.to_string(),
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net_revenue: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    fn from_partial(partial: &PartialMonthData, label: &str) -> Self {
        let total_income = round_money(partial.total_income);
        let total_expense = round_money(partial.total_expense);
        Self {
            month_index: partial.month,
            month_label: label.to_string(),
            total_income,
            total_expense,
            net_revenue: normalize_money(sub_money(total_income, total_expense)),
            transaction_count: partial.transaction_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0 && self.total_income.is_zero() && self.total_expense.is_zero()
    }

    /// Net revenue as a percentage of income, one decimal place; 0 without income
    pub fn margin_percent(&self) -> Decimal {
        margin_percent(self.net_revenue, self.total_income)
    }
}

/// `net` as a percentage of `income`, one decimal place; 0 without income
pub fn margin_percent(net: Decimal, income: Decimal) -> Decimal {
    if income.is_zero() {
        return Decimal::ZERO;
    }
    let margin = net
        .checked_div(income)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if net.is_sign_negative() == income.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        });
    normalize_money(margin.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Exactly twelve buckets for one calendar year, January first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "meses")]
    months: [MonthBucket; 12],
}

impl YearSeries {
    pub fn months(&self) -> &[MonthBucket; 12] {
        &self.months
    }

    /// The bucket for a 1-based month index
    pub fn month(&self, month_index: u32) -> Option<&MonthBucket> {
        month_index
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year
    }

    pub fn total_income(&self) -> Decimal {
        self.months.iter().fold(Decimal::ZERO, |sum, m| add_money(sum, m.total_income))
    }

    pub fn total_expense(&self) -> Decimal {
        self.months.iter().fold(Decimal::ZERO, |sum, m| add_money(sum, m.total_expense))
    }

    pub fn net_revenue(&self) -> Decimal {
        normalize_money(sub_money(self.total_income(), self.total_expense()))
    }

    pub fn transaction_count(&self) -> u32 {
        self.months
            .iter()
            .fold(0u32, |count, m| count.saturating_add(m.transaction_count))
    }

    /// Rows for the monthly report table, margin included
    pub fn report_rows(&self) -> Vec<MonthlyReportRow> {
        self.months.iter().map(MonthlyReportRow::from).collect()
    }
}

/// A month bucket flattened for tables and exports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReportRow {
    #[serde(rename = "mes")]
    pub month_index: u32,
    #[serde(rename = "nome_mes")]
    pub month_label: String,
    #[serde(rename = "total_entradas")]
    pub total_income: Decimal,
    #[serde(rename = "total_saidas")]
    pub total_expense: Decimal,
    #[serde(rename = "faturamento_liquido")]
    pub net_revenue: Decimal,
    #[serde(rename = "margem")]
    pub margin_percent: Decimal,
    #[serde(rename = "transacoes_count")]
    pub transaction_count: u32,
}

impl From<&MonthBucket> for MonthlyReportRow {
    fn from(bucket: &MonthBucket) -> Self {
        Self {
            month_index: bucket.month_index,
            month_label: bucket.month_label.clone(),
            total_income: bucket.total_income,
            total_expense: bucket.total_expense,
            net_revenue: bucket.net_revenue,
            margin_percent: bucket.margin_percent(),
            transaction_count: bucket.transaction_count,
        }
    }
}

/// Fill the gaps in sparse partial totals to produce the full year.
///
/// Entries whose month index falls outside 1..=12, or that are tagged with
/// another year, are ignored. When two entries claim the same month the last
/// one wins.
pub fn aggregate_year(year: i32, partials: &[PartialMonthData], locale: MonthLocale) -> YearSeries {
    let mut by_month: BTreeMap<u32, &PartialMonthData> = BTreeMap::new();
    for partial in partials {
        if !(1..=12).contains(&partial.month) {
            log::debug!("ignoring partial with month index {}", partial.month);
            continue;
        }
        if partial.year.map_or(false, |y| y != year) {
            continue;
        }
        by_month.insert(partial.month, partial);
    }

    let labels = month_labels(locale);
    let months = std::array::from_fn(|i| {
        let month_index = i as u32 + 1;
        match by_month.get(&month_index) {
            Some(partial) => MonthBucket::from_partial(partial, labels[i]),
            None => MonthBucket::empty(month_index, labels[i]),
        }
    });

    YearSeries { year, months }
}

/// Sum raw transactions into sparse per-month totals for `year`, ascending by
/// month, holding only months with at least one transaction
pub fn monthly_partials(year: i32, transactions: &[Transaction]) -> Vec<PartialMonthData> {
    let mut totals: BTreeMap<u32, PartialMonthData> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.data.date.year() == year) {
        let month = transaction.data.date.month();
        let entry = totals
            .entry(month)
            .or_insert_with(|| PartialMonthData::new(month, Decimal::ZERO, Decimal::ZERO, 0));
        match transaction.data.kind {
            TransactionKind::Income => entry.total_income = add_money(entry.total_income, transaction.data.amount),
            TransactionKind::Expense => entry.total_expense = add_money(entry.total_expense, transaction.data.amount),
        }
        entry.transaction_count = entry.transaction_count.saturating_add(1);
    }

    totals
        .into_values()
        .map(|mut partial| {
            partial.year = Some(year);
            partial.total_income = round_money(partial.total_income);
            partial.total_expense = round_money(partial.total_expense);
            partial
        })
        .collect()
}

/// Fold raw transactions straight into the year series
pub fn aggregate_transactions(year: i32, transactions: &[Transaction], locale: MonthLocale) -> YearSeries {
    aggregate_year(year, &monthly_partials(year, transactions), locale)
}
