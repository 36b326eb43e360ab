//! Editable record forms
//!
//! Forms hold what the user typed. `parse` turns them into typed payloads,
//! naming the first field that cannot be coerced.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::models::{check_money, Client, ClientData, Transaction, TransactionData};
use crate::types::{parse_optional_slug, Category, ClientStatus, TransactionKind, TriState};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==================== Field coercion ====================

/// Parse a currency amount; accepts `,` as the decimal separator
fn parse_money(field: &str, raw: &str) -> CoreResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(field, "value is required"));
    }
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    let value: Decimal = normalized
        .parse()
        .map_err(|_| CoreError::validation(field, format!("'{}' is not a number", trimmed)))?;
    check_money(field, value)?;
    Ok(value)
}

/// Blank optional amounts default to zero
fn parse_optional_money(field: &str, raw: &str) -> CoreResult<Decimal> {
    if raw.trim().is_empty() {
        Ok(Decimal::ZERO)
    } else {
        parse_money(field, raw)
    }
}

fn parse_count(field: &str, raw: &str) -> CoreResult<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| CoreError::validation(field, format!("'{}' is not a whole non-negative number", trimmed)))
}

fn parse_optional_count(field: &str, raw: &str) -> CoreResult<Option<u32>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_count(field, raw).map(Some)
    }
}

fn parse_date(field: &str, raw: &str) -> CoreResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(field, "date is required"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| CoreError::validation(field, format!("'{}' is not a YYYY-MM-DD date", trimmed)))
}

fn parse_optional_date(field: &str, raw: &str) -> CoreResult<Option<NaiveDate>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(field, raw).map(Some)
    }
}

fn parse_slug<T: serde::de::DeserializeOwned>(field: &str, raw: &str) -> CoreResult<Option<T>> {
    parse_optional_slug(raw).map_err(|_| CoreError::validation(field, format!("'{}' is not a valid option", raw.trim())))
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn slug_of<T: serde::Serialize>(value: &Option<T>) -> String {
    value
        .as_ref()
        .and_then(|v| serde_json::to_value(v).ok())
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

// ==================== Transaction form ====================

/// The transaction form as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    kind: TransactionKind,
    category: Category,
    pub description: String,
    pub amount: String,
    pub date: String,
    pub client_name: String,
    pub notes: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self::blank_on(Utc::now().date_naive())
    }
}

impl TransactionForm {
    /// Blank form dated `today`
    pub fn blank_on(today: NaiveDate) -> Self {
        let kind = TransactionKind::default();
        Self {
            kind,
            category: kind.default_category(),
            description: String::new(),
            amount: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            client_name: String::new(),
            notes: String::new(),
        }
    }

    /// Form holding the current values of `transaction`
    pub fn from_transaction(transaction: &Transaction) -> Self {
        let data = &transaction.data;
        Self {
            kind: data.kind,
            category: data.category,
            description: data.description.clone(),
            amount: data.amount.to_string(),
            date: data.date.format(DATE_FORMAT).to_string(),
            client_name: data.client_name.clone().unwrap_or_default(),
            notes: data.notes.clone().unwrap_or_default(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Changing the kind resets the category to that kind's default
    pub fn set_kind(&mut self, kind: TransactionKind) {
        if kind != self.kind {
            self.kind = kind;
            self.category = kind.default_category();
        }
    }

    /// Only categories of the current kind are accepted
    pub fn set_category(&mut self, category: Category) -> CoreResult<()> {
        if !category.belongs_to(self.kind) {
            return Err(CoreError::validation(
                "category",
                format!("category {} is not valid for {}", category, self.kind),
            ));
        }
        self.category = category;
        Ok(())
    }

    pub fn parse(&self) -> CoreResult<TransactionData> {
        let amount = parse_money("amount", &self.amount)?;
        let date = parse_date("date", &self.date)?;
        TransactionData {
            kind: self.kind,
            category: self.category,
            description: self.description.trim().to_string(),
            amount,
            date,
            client_name: optional_text(&self.client_name),
            notes: optional_text(&self.notes),
        }
        .into_validated()
    }
}

// ==================== Client form ====================

/// The client form as typed. Optional selects hold their slug, or the empty
/// string when not informed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: ClientStatus,
    pub amount_owed: String,
    pub last_payment_date: String,
    pub marital_status: String,
    pub dependents: String,
    pub education: String,
    pub has_credit_card: String,
    pub gross_income: String,
    pub age: String,
    pub purchase_frequency: String,
    pub purchase_count: String,
    pub purchase_profile: String,
    pub acquisition_channel: String,
    pub notes: String,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            status: ClientStatus::Current,
            amount_owed: "0".to_string(),
            last_payment_date: String::new(),
            marital_status: String::new(),
            dependents: "0".to_string(),
            education: String::new(),
            has_credit_card: String::new(),
            gross_income: "0".to_string(),
            age: String::new(),
            purchase_frequency: String::new(),
            purchase_count: "0".to_string(),
            purchase_profile: String::new(),
            acquisition_channel: String::new(),
            notes: String::new(),
        }
    }
}

impl ClientForm {
    /// Form holding the current values of `client`
    pub fn from_client(client: &Client) -> Self {
        let data = &client.data;
        Self {
            name: data.name.clone(),
            email: data.email.clone().unwrap_or_default(),
            phone: data.phone.clone().unwrap_or_default(),
            address: data.address.clone().unwrap_or_default(),
            status: data.status,
            amount_owed: data.amount_owed.to_string(),
            last_payment_date: data
                .last_payment_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            marital_status: slug_of(&data.marital_status),
            dependents: data.dependents.to_string(),
            education: slug_of(&data.education),
            has_credit_card: match data.has_credit_card {
                TriState::Yes => "true".to_string(),
                TriState::No => "false".to_string(),
                TriState::Unknown => String::new(),
            },
            gross_income: data.gross_income.to_string(),
            age: data.age.map(|a| a.to_string()).unwrap_or_default(),
            purchase_frequency: slug_of(&data.purchase_frequency),
            purchase_count: data.purchase_count.to_string(),
            purchase_profile: slug_of(&data.purchase_profile),
            acquisition_channel: slug_of(&data.acquisition_channel),
            notes: data.notes.clone().unwrap_or_default(),
        }
    }

    pub fn parse(&self) -> CoreResult<ClientData> {
        let has_credit_card: TriState = self
            .has_credit_card
            .parse()
            .map_err(|e: String| CoreError::validation("has_credit_card", e))?;

        ClientData {
            name: self.name.trim().to_string(),
            email: optional_text(&self.email),
            phone: optional_text(&self.phone),
            address: optional_text(&self.address),
            status: self.status,
            amount_owed: parse_optional_money("amount_owed", &self.amount_owed)?,
            last_payment_date: parse_optional_date("last_payment_date", &self.last_payment_date)?,
            marital_status: parse_slug("marital_status", &self.marital_status)?,
            dependents: parse_count("dependents", &self.dependents)?,
            education: parse_slug("education", &self.education)?,
            has_credit_card,
            gross_income: parse_optional_money("gross_income", &self.gross_income)?,
            age: parse_optional_count("age", &self.age)?,
            purchase_frequency: parse_slug("purchase_frequency", &self.purchase_frequency)?,
            purchase_count: parse_count("purchase_count", &self.purchase_count)?,
            purchase_profile: parse_slug("purchase_profile", &self.purchase_profile)?,
            acquisition_channel: parse_slug("acquisition_channel", &self.acquisition_channel)?,
            notes: optional_text(&self.notes),
        }
        .into_validated()
    }
}
