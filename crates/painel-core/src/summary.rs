//! Dashboard KPIs
//!
//! Current-month figures come either from an aggregated [`YearSeries`] or
//! from a live snapshot reported by the collaborator. Delinquency and
//! segment figures are derived from the client list.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{add_money, round_money, sub_money, YearSeries};
use crate::error::{CoreError, CoreResult};
use crate::models::{normalize_money, Client, Transaction};
use crate::types::{PurchaseProfile, TransactionKind};

/// Income, expense and net for one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    #[serde(rename = "entradas")]
    pub income: Decimal,
    #[serde(rename = "saidas")]
    pub expense: Decimal,
    #[serde(rename = "faturamento_liquido")]
    pub net: Decimal,
}

impl MonthSummary {
    pub fn zero() -> Self {
        Self {
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    /// Current-month totals straight from raw transactions
    pub fn from_transactions(transactions: &[Transaction], reference: NaiveDate) -> Self {
        let (income, expense) = transactions
            .iter()
            .filter(|t| t.data.date.year() == reference.year() && t.data.date.month() == reference.month())
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), t| match t.data.kind {
                TransactionKind::Income => (add_money(income, t.data.amount), expense),
                TransactionKind::Expense => (income, add_money(expense, t.data.amount)),
            });
        let income = round_money(income);
        let expense = round_money(expense);
        Self {
            income,
            expense,
            net: normalize_money(sub_money(income, expense)),
        }
    }
}

/// Read the KPIs for the month containing `reference` from an aggregated
/// year. Fails with `ScopeMismatch` when the series is for another year.
pub fn summarize_current_month(series: &YearSeries, reference: NaiveDate) -> CoreResult<MonthSummary> {
    if !series.contains(reference) {
        return Err(CoreError::ScopeMismatch {
            expected: reference.year(),
            actual: series.year,
        });
    }

    let bucket = series
        .month(reference.month())
        .ok_or_else(|| CoreError::ScopeMismatch {
            expected: reference.year(),
            actual: series.year,
        })?;

    Ok(MonthSummary {
        income: bucket.total_income,
        expense: bucket.total_expense,
        net: bucket.net_revenue,
    })
}

/// How many clients are delinquent and how much they owe in total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelinquencySummary {
    #[serde(rename = "quantidade")]
    pub count: usize,
    #[serde(rename = "valor_total_devido")]
    pub total_owed: Decimal,
}

impl DelinquencySummary {
    pub fn from_clients(clients: &[Client]) -> Self {
        let delinquent = clients.iter().filter(|c| c.data.is_delinquent());
        let (count, total) = delinquent.fold((0, Decimal::ZERO), |(count, total), c| {
            (count + 1, add_money(total, c.data.amount_owed))
        });
        Self {
            count,
            total_owed: round_money(total),
        }
    }
}

/// The dashboard snapshot the collaborator reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(rename = "mes_atual")]
    pub current_month: MonthSummary,
    #[serde(rename = "inadimplentes")]
    pub delinquency: DelinquencySummary,
}

/// Client statistics for one purchase profile tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSegmentStats {
    /// `None` groups clients without a purchase profile
    #[serde(rename = "tipo_compra")]
    pub profile: Option<PurchaseProfile>,
    #[serde(rename = "quantidade")]
    pub count: usize,
    #[serde(rename = "valor_total_devido")]
    pub total_owed: Decimal,
    #[serde(rename = "idade_media")]
    pub average_age: Option<Decimal>,
    #[serde(rename = "renda_media")]
    pub average_income: Option<Decimal>,
}

/// Group clients by purchase profile. Averages only count clients that
/// informed the value; income of zero counts as not informed.
pub fn client_segments(clients: &[Client]) -> Vec<ClientSegmentStats> {
    #[derive(Default)]
    struct Acc {
        count: usize,
        owed: Decimal,
        age_sum: Decimal,
        age_n: u32,
        income_sum: Decimal,
        income_n: u32,
    }

    let mut groups: BTreeMap<Option<PurchaseProfile>, Acc> = BTreeMap::new();
    for client in clients {
        let acc = groups.entry(client.data.purchase_profile).or_default();
        acc.count += 1;
        acc.owed = add_money(acc.owed, client.data.amount_owed);
        if let Some(age) = client.data.age {
            acc.age_sum = add_money(acc.age_sum, Decimal::from(age));
            acc.age_n += 1;
        }
        if !client.data.gross_income.is_zero() {
            acc.income_sum = add_money(acc.income_sum, client.data.gross_income);
            acc.income_n += 1;
        }
    }

    let average = |sum: Decimal, n: u32| {
        (n > 0).then(|| round_money(sum.checked_div(Decimal::from(n)).unwrap_or(sum)))
    };

    groups
        .into_iter()
        .map(|(profile, acc)| ClientSegmentStats {
            profile,
            count: acc.count,
            total_owed: round_money(acc.owed),
            average_age: average(acc.age_sum, acc.age_n),
            average_income: average(acc.income_sum, acc.income_n),
        })
        .collect()
}
