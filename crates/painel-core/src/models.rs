//! Core data models for the ledger
//!
//! Records are plain values. Field names on the wire follow the dashboard's
//! existing JSON contract (`tipo`, `valor`, `cliente_nome`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{
    AcquisitionChannel, Category, ClientStatus, Education, MaritalStatus, PurchaseFrequency,
    PurchaseProfile, TransactionKind, TriState,
};

/// Opaque identifier assigned by the persistence collaborator
pub type RecordId = String;

/// Collapse negative zero so it never reaches output
pub fn normalize_money(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}

/// Largest value any single money field accepts (one quadrillion)
pub fn max_money() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

/// A money field must be non-negative and no larger than [`max_money`]
pub fn check_money(field: &str, value: Decimal) -> CoreResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CoreError::validation(field, "value cannot be negative"));
    }
    if value > max_money() {
        return Err(CoreError::validation(
            field,
            format!("value cannot exceed {}", max_money()),
        ));
    }
    Ok(())
}

/// Everything about a transaction the user submits; updates replace all of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "cliente_nome", default)]
    pub client_name: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl TransactionData {
    /// Check the record invariants
    pub fn validate(&self) -> CoreResult<()> {
        if self.description.trim().is_empty() {
            return Err(CoreError::validation("description", "description is required"));
        }
        check_money("amount", self.amount)?;
        if !self.category.belongs_to(self.kind) {
            return Err(CoreError::validation(
                "category",
                format!("category {} is not valid for {}", self.category, self.kind),
            ));
        }
        Ok(())
    }

    /// Validate and normalise money and optional text
    pub fn into_validated(mut self) -> CoreResult<Self> {
        self.validate()?;
        self.amount = normalize_money(self.amount);
        self.client_name = non_blank(self.client_name);
        self.notes = non_blank(self.notes);
        Ok(self)
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: TransactionData,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(id: RecordId, data: TransactionData, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            data,
            created_at,
        }
    }
}

/// Everything about a client the user submits; updates replace all of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(rename = "valor_devido", default)]
    pub amount_owed: Decimal,
    #[serde(rename = "data_ultimo_pagamento", default)]
    pub last_payment_date: Option<NaiveDate>,
    #[serde(rename = "estado_civil", default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(rename = "numero_filhos", default)]
    pub dependents: u32,
    #[serde(rename = "escolaridade", default)]
    pub education: Option<Education>,
    #[serde(rename = "tem_cartao_credito", default)]
    pub has_credit_card: TriState,
    #[serde(rename = "renda_bruta", default)]
    pub gross_income: Decimal,
    #[serde(rename = "idade", default)]
    pub age: Option<u32>,
    #[serde(rename = "frequencia_compra", default)]
    pub purchase_frequency: Option<PurchaseFrequency>,
    #[serde(rename = "quantidade_compras", default)]
    pub purchase_count: u32,
    #[serde(rename = "tipo_compra", default)]
    pub purchase_profile: Option<PurchaseProfile>,
    #[serde(rename = "origem_cliente", default)]
    pub acquisition_channel: Option<AcquisitionChannel>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl ClientData {
    /// A client with only a name, every other field at its default
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            status: ClientStatus::Current,
            amount_owed: Decimal::ZERO,
            last_payment_date: None,
            marital_status: None,
            dependents: 0,
            education: None,
            has_credit_card: TriState::Unknown,
            gross_income: Decimal::ZERO,
            age: None,
            purchase_frequency: None,
            purchase_count: 0,
            purchase_profile: None,
            acquisition_channel: None,
            notes: None,
        }
    }

    /// Check the record invariants
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name", "name is required"));
        }
        check_money("amount_owed", self.amount_owed)?;
        check_money("gross_income", self.gross_income)?;
        Ok(())
    }

    /// Validate and normalise money and optional text
    pub fn into_validated(mut self) -> CoreResult<Self> {
        self.validate()?;
        self.amount_owed = normalize_money(self.amount_owed);
        self.gross_income = normalize_money(self.gross_income);
        self.email = non_blank(self.email);
        self.phone = non_blank(self.phone);
        self.address = non_blank(self.address);
        self.notes = non_blank(self.notes);
        Ok(self)
    }

    pub fn is_delinquent(&self) -> bool {
        self.status == ClientStatus::Delinquent
    }
}

/// A stored client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: ClientData,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(id: RecordId, data: ClientData, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            data,
            created_at,
        }
    }
}

/// Records the reconciler can write and merge back by id
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> TransactionData {
        TransactionData {
            kind: TransactionKind::Income,
            category: Category::VendaOculos,
            description: "Óculos de grau".to_string(),
            amount: "350.00".parse().unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            client_name: Some("  Maria Souza ".to_string()),
            notes: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_transaction_validation() {
        let data = sample_data().into_validated().unwrap();
        assert_eq!(data.client_name.as_deref(), Some("Maria Souza"));
        assert_eq!(data.notes, None);
    }

    #[test]
    fn test_transaction_rejects_foreign_category() {
        let mut data = sample_data();
        data.category = Category::Aluguel;
        let err = data.validate().unwrap_err();
        assert_eq!(err.field(), Some("category"));
    }

    #[test]
    fn test_transaction_rejects_negative_amount() {
        let mut data = sample_data();
        data.amount = "-1".parse().unwrap();
        assert_eq!(data.validate().unwrap_err().field(), Some("amount"));
    }

    #[test]
    fn test_money_fields_are_capped() {
        let mut data = sample_data();
        data.amount = max_money();
        assert!(data.validate().is_ok());
        data.amount = max_money() + Decimal::new(1, 2);
        assert_eq!(data.validate().unwrap_err().field(), Some("amount"));

        let mut client = ClientData::named("Ana");
        client.amount_owed = Decimal::MAX;
        assert_eq!(client.validate().unwrap_err().field(), Some("amount_owed"));
        client.amount_owed = Decimal::ZERO;
        client.gross_income = Decimal::MAX;
        assert_eq!(client.validate().unwrap_err().field(), Some("gross_income"));
    }

    #[test]
    fn test_transaction_rejects_blank_description() {
        let mut data = sample_data();
        data.description = "  ".to_string();
        assert_eq!(data.validate().unwrap_err().field(), Some("description"));
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let mut negative_zero = Decimal::ZERO;
        negative_zero.set_sign_negative(true);
        let mut data = sample_data();
        data.amount = negative_zero;
        let data = data.into_validated().unwrap();
        assert!(!data.amount.is_sign_negative());
    }

    #[test]
    fn test_transaction_wire_format() {
        let tx = Transaction::new("t-1".to_string(), sample_data(), Utc::now());
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["tipo"], "entrada");
        assert_eq!(json["categoria"], "venda_oculos");
        assert_eq!(json["valor"], 350.0);
        assert_eq!(json["data"], "2024-03-12");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back.data.amount, "350".parse::<Decimal>().unwrap());
        assert_eq!(back.id, "t-1");
    }

    #[test]
    fn test_client_defaults_on_missing_fields() {
        let data: ClientData = serde_json::from_str(r#"{"nome": "João"}"#).unwrap();
        assert_eq!(data.status, ClientStatus::Current);
        assert_eq!(data.amount_owed, Decimal::ZERO);
        assert_eq!(data.has_credit_card, TriState::Unknown);
        assert_eq!(data.dependents, 0);
        assert_eq!(data, ClientData::named("João"));
    }

    #[test]
    fn test_client_validation() {
        assert_eq!(
            ClientData::named(" ").validate().unwrap_err().field(),
            Some("name")
        );
        let mut data = ClientData::named("Ana");
        data.amount_owed = "-10".parse().unwrap();
        assert_eq!(data.validate().unwrap_err().field(), Some("amount_owed"));
    }
}
