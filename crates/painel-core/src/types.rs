//! Enumerations of the record model
//!
//! Every enum serializes to the lowercase slug used on the wire and in
//! exports ("entrada", "venda_oculos", "inadimplente", ...).

use serde::{Deserialize, Serialize};

/// Transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money coming in
    #[serde(rename = "entrada")]
    Income,
    /// Money going out
    #[serde(rename = "saida")]
    Expense,
}

impl Default for TransactionKind {
    fn default() -> Self {
        TransactionKind::Income
    }
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "entrada",
            TransactionKind::Expense => "saida",
        }
    }

    /// Categories allowed for this kind, default first
    pub fn categories(&self) -> &'static [Category] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// The category a form falls back to when the kind changes
    pub fn default_category(&self) -> Category {
        self.categories()[0]
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entrada" | "income" => Ok(TransactionKind::Income),
            "saida" | "saída" | "expense" => Ok(TransactionKind::Expense),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction category; the first six belong to income, the rest to expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    VendaOculos,
    VendaLentes,
    VendaAcessorios,
    ServicoExame,
    ServicoConsulta,
    OutrosServicos,
    CustoProdutos,
    Aluguel,
    Salarios,
    Energia,
    Agua,
    Telefone,
    Marketing,
    Manutencao,
    Impostos,
    OutrosCustos,
}

const INCOME_CATEGORIES: [Category; 6] = [
    Category::VendaOculos,
    Category::VendaLentes,
    Category::VendaAcessorios,
    Category::ServicoExame,
    Category::ServicoConsulta,
    Category::OutrosServicos,
];

const EXPENSE_CATEGORIES: [Category; 10] = [
    Category::CustoProdutos,
    Category::Aluguel,
    Category::Salarios,
    Category::Energia,
    Category::Agua,
    Category::Telefone,
    Category::Marketing,
    Category::Manutencao,
    Category::Impostos,
    Category::OutrosCustos,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::VendaOculos => "venda_oculos",
            Category::VendaLentes => "venda_lentes",
            Category::VendaAcessorios => "venda_acessorios",
            Category::ServicoExame => "servico_exame",
            Category::ServicoConsulta => "servico_consulta",
            Category::OutrosServicos => "outros_servicos",
            Category::CustoProdutos => "custo_produtos",
            Category::Aluguel => "aluguel",
            Category::Salarios => "salarios",
            Category::Energia => "energia",
            Category::Agua => "agua",
            Category::Telefone => "telefone",
            Category::Marketing => "marketing",
            Category::Manutencao => "manutencao",
            Category::Impostos => "impostos",
            Category::OutrosCustos => "outros_custos",
        }
    }

    /// The kind whose category set contains this category
    pub fn kind(&self) -> TransactionKind {
        if INCOME_CATEGORIES.contains(self) {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    pub fn belongs_to(&self, kind: TransactionKind) -> bool {
        self.kind() == kind
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        INCOME_CATEGORIES
            .iter()
            .chain(EXPENSE_CATEGORIES.iter())
            .find(|c| c.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    /// Payments up to date
    #[serde(rename = "adimplente")]
    Current,
    /// Owes money past due
    #[serde(rename = "inadimplente")]
    Delinquent,
}

impl Default for ClientStatus {
    fn default() -> Self {
        ClientStatus::Current
    }
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Current => "adimplente",
            ClientStatus::Delinquent => "inadimplente",
        }
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adimplente" | "current" => Ok(ClientStatus::Current),
            "inadimplente" | "delinquent" => Ok(ClientStatus::Delinquent),
            _ => Err(format!("Invalid client status: {}", s)),
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tri-state answer for yes/no questions the client may not have answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unknown => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::Yes,
            Some(false) => TriState::No,
            None => TriState::Unknown,
        }
    }
}

impl std::str::FromStr for TriState {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" | "sim" | "yes" | "s" | "1" => Ok(TriState::Yes),
            "false" | "nao" | "não" | "no" | "n" | "0" => Ok(TriState::No),
            "" | "unknown" | "null" => Ok(TriState::Unknown),
            _ => Err(format!("Invalid yes/no value: {}", s)),
        }
    }
}

// Stored as an optional boolean so absent and null both read back as Unknown.
impl Serialize for TriState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_bool().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(TriState::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Solteiro,
    Casado,
    Divorciado,
    Viuvo,
    UniaoEstavel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    Fundamental,
    Medio,
    Superior,
    Tecnico,
    PosGraduacao,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseFrequency {
    PrimeiraVez,
    Esporadico,
    Regular,
    Frequente,
}

/// Purchase profile tier, the key of client segment statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseProfile {
    Economico,
    Padrao,
    Premium,
    Luxo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionChannel {
    Amigo,
    Instagram,
    Whatsapp,
    Facebook,
    Google,
    PlacaLoja,
    PassandoRua,
    Outros,
}

/// Parse an optional enum from a form select; the empty option means "not informed"
pub(crate) fn parse_optional_slug<T>(value: &str) -> Result<Option<T>, serde_json::Error>
where
    T: serde::de::DeserializeOwned,
{
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    serde_json::from_value(serde_json::Value::String(value.to_lowercase())).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_sets() {
        assert_eq!(TransactionKind::Income.categories().len(), 6);
        assert_eq!(TransactionKind::Expense.categories().len(), 10);
        assert_eq!(TransactionKind::Income.default_category(), Category::VendaOculos);
        assert_eq!(TransactionKind::Expense.default_category(), Category::CustoProdutos);
    }

    #[test]
    fn test_category_membership() {
        assert!(Category::ServicoExame.belongs_to(TransactionKind::Income));
        assert!(!Category::Aluguel.belongs_to(TransactionKind::Income));
        assert_eq!(Category::Impostos.kind(), TransactionKind::Expense);
    }

    #[test]
    fn test_slugs_round_trip_through_serde() {
        let json = serde_json::to_string(&Category::OutrosCustos).unwrap();
        assert_eq!(json, "\"outros_custos\"");
        assert_eq!(
            serde_json::to_string(&TransactionKind::Expense).unwrap(),
            "\"saida\""
        );
        assert_eq!(
            serde_json::to_string(&ClientStatus::Delinquent).unwrap(),
            "\"inadimplente\""
        );
        assert_eq!(
            serde_json::to_string(&AcquisitionChannel::PlacaLoja).unwrap(),
            "\"placa_loja\""
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("entrada".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!("SAIDA".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert_eq!("venda_lentes".parse::<Category>().unwrap(), Category::VendaLentes);
        assert!("padaria".parse::<Category>().is_err());
        assert_eq!("inadimplente".parse::<ClientStatus>().unwrap(), ClientStatus::Delinquent);
    }

    #[test]
    fn test_tri_state() {
        assert_eq!("sim".parse::<TriState>().unwrap(), TriState::Yes);
        assert_eq!("false".parse::<TriState>().unwrap(), TriState::No);
        assert_eq!("".parse::<TriState>().unwrap(), TriState::Unknown);
        assert!("talvez".parse::<TriState>().is_err());

        assert_eq!(serde_json::to_string(&TriState::Unknown).unwrap(), "null");
        let parsed: TriState = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, TriState::Yes);
    }

    #[test]
    fn test_parse_optional_slug() {
        let empty: Option<Education> = parse_optional_slug("  ").unwrap();
        assert_eq!(empty, None);
        let value: Option<Education> = parse_optional_slug("pos_graduacao").unwrap();
        assert_eq!(value, Some(Education::PosGraduacao));
        assert!(parse_optional_slug::<Education>("doutorado").is_err());
    }
}
