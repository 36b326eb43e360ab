//! Transaction filtering by client name and date range

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Filter criteria. Every supplied criterion must match; an empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the transaction's client name.
    /// Surrounding whitespace is trimmed first; a blank value matches everything.
    #[serde(rename = "cliente_nome", default)]
    pub client_name_contains: Option<String>,
    /// Inclusive lower bound
    #[serde(rename = "data_inicio", default)]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound
    #[serde(rename = "data_fim", default)]
    pub date_to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name_contains = Some(name.into());
        self
    }

    pub fn with_date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn with_date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Lowercased name needle, `None` when blank or absent
    fn name_needle(&self) -> Option<String> {
        self.client_name_contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// True when no criterion constrains the result
    pub fn is_empty(&self) -> bool {
        self.name_needle().is_none() && self.date_from.is_none() && self.date_to.is_none()
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_with(transaction, self.name_needle().as_deref())
    }

    fn matches_with(&self, transaction: &Transaction, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            match transaction.data.client_name.as_deref() {
                Some(name) if name.to_lowercase().contains(needle) => {}
                _ => return false,
            }
        }
        if let Some(from) = self.date_from {
            if transaction.data.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if transaction.data.date > to {
                return false;
            }
        }
        true
    }
}

/// Stable filter; the input is never reordered or mutated.
pub fn filter_transactions(all: &[Transaction], criteria: &TransactionFilter) -> Vec<Transaction> {
    if criteria.is_empty() {
        return all.to_vec();
    }
    let needle = criteria.name_needle();
    all.iter()
        .filter(|t| criteria.matches_with(t, needle.as_deref()))
        .cloned()
        .collect()
}
