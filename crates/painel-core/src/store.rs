//! Persistence collaborator
//!
//! [`LedgerStore`] is the boundary every record write and server-side
//! aggregate goes through. [`MemoryStore`] keeps records in memory and can
//! mirror them to a JSON snapshot file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::aggregate::monthly_partials;
use crate::aggregate::PartialMonthData;
use crate::error::{CoreError, CoreResult};
use crate::filter::{filter_transactions, TransactionFilter};
use crate::models::{Client, ClientData, Transaction, TransactionData};
use crate::summary::{DashboardSnapshot, DelinquencySummary, MonthSummary};
use crate::types::ClientStatus;

/// Store reference type
pub type StoreRef = Arc<dyn LedgerStore>;

/// Offset paging for list calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub skip: usize,
    /// `None` returns everything after `skip`
    pub limit: Option<usize>,
}

impl Page {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit: Some(limit),
        }
    }

    fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let rest = items.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => rest.take(limit).collect(),
            None => rest.collect(),
        }
    }
}

/// Trait for ledger persistence collaborators
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Transactions matching `filter`, newest date first
    async fn list_transactions(&self, filter: &TransactionFilter, page: Page) -> CoreResult<Vec<Transaction>>;

    async fn get_transaction(&self, id: &str) -> CoreResult<Transaction>;

    async fn create_transaction(&self, data: TransactionData) -> CoreResult<Transaction>;

    /// Replace every field of an existing transaction
    async fn update_transaction(&self, id: &str, data: TransactionData) -> CoreResult<Transaction>;

    async fn delete_transaction(&self, id: &str) -> CoreResult<()>;

    /// Clients sorted by name, optionally only those with `status`
    async fn list_clients(&self, status: Option<ClientStatus>, page: Page) -> CoreResult<Vec<Client>>;

    async fn get_client(&self, id: &str) -> CoreResult<Client>;

    async fn create_client(&self, data: ClientData) -> CoreResult<Client>;

    /// Replace every field of an existing client
    async fn update_client(&self, id: &str, data: ClientData) -> CoreResult<Client>;

    async fn delete_client(&self, id: &str) -> CoreResult<()>;

    /// Per-month totals for `year`, only months with activity, ascending
    async fn monthly_partials(&self, year: i32) -> CoreResult<Vec<PartialMonthData>>;

    /// Current-month totals and delinquency figures as of `today`
    async fn dashboard_snapshot(&self, today: NaiveDate) -> CoreResult<DashboardSnapshot>;
}

/// Everything the memory store holds; also the snapshot file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

/// In-memory store with an optional JSON snapshot
pub struct MemoryStore {
    data: RwLock<StoreData>,
    snapshot: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store that never touches disk
    pub fn new() -> Self {
        Self::with_data(StoreData::default())
    }

    pub fn with_data(data: StoreData) -> Self {
        Self {
            data: RwLock::new(data),
            snapshot: None,
        }
    }

    /// Open a store backed by `path`, loading it when the file exists
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let data = load_snapshot(&path).await?;
        log::info!(
            "Opened ledger snapshot {} ({} transactions, {} clients)",
            path.display(),
            data.transactions.len(),
            data.clients.len()
        );
        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(path),
        })
    }

    /// Copy of everything currently stored
    pub async fn data(&self) -> StoreData {
        self.data.read().await.clone()
    }

    async fn persist(&self, data: &StoreData) -> CoreResult<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::persistence(format!("{}: {}", parent.display(), e)))?;
        }
        let json = snapshot_json(data).map_err(|e| CoreError::persistence(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CoreError::persistence(format!("{}: {}", path.display(), e)))?;
        log::debug!("Saved ledger snapshot to {}", path.display());
        Ok(())
    }

    // The snapshot is written before the in-memory state is replaced, so a
    // failed write leaves the store exactly as it was.
    async fn commit<T>(&self, change: impl FnOnce(&mut StoreData) -> CoreResult<T>) -> CoreResult<T> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        let result = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(result)
    }
}

// ==================== Snapshot file ====================

// Money goes to disk as decimal strings; JSON numbers would pass through f64.
// `Decimal` reads back either form, so older numeric snapshots still load.
fn snapshot_json(data: &StoreData) -> serde_json::Result<String> {
    let transactions = data
        .transactions
        .iter()
        .map(|t| exact_money(t, &[("valor", t.data.amount)]))
        .collect::<serde_json::Result<Vec<_>>>()?;
    let clients = data
        .clients
        .iter()
        .map(|c| {
            exact_money(
                c,
                &[
                    ("valor_devido", c.data.amount_owed),
                    ("renda_bruta", c.data.gross_income),
                ],
            )
        })
        .collect::<serde_json::Result<Vec<_>>>()?;
    serde_json::to_string_pretty(&serde_json::json!({
        "transactions": transactions,
        "clients": clients,
    }))
}

fn exact_money<T: Serialize>(record: &T, amounts: &[(&str, Decimal)]) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Some(object) = value.as_object_mut() {
        for (key, amount) in amounts {
            object.insert(key.to_string(), Value::String(amount.to_string()));
        }
    }
    Ok(value)
}

async fn load_snapshot(path: &Path) -> CoreResult<StoreData> {
    if !path.exists() {
        log::debug!("No ledger snapshot at {}, starting empty", path.display());
        return Ok(StoreData::default());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::persistence(format!("{}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        return Ok(StoreData::default());
    }
    serde_json::from_str(&content)
        .map_err(|e| CoreError::persistence(format!("{}: {}", path.display(), e)))
}

fn not_found(resource: &str, id: &str) -> CoreError {
    CoreError::NotFound {
        resource: resource.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn list_transactions(&self, filter: &TransactionFilter, page: Page) -> CoreResult<Vec<Transaction>> {
        let data = self.data.read().await;
        let mut matched = filter_transactions(&data.transactions, filter);
        matched.sort_by(|a, b| {
            b.data
                .date
                .cmp(&a.data.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(page.apply(matched))
    }

    async fn get_transaction(&self, id: &str) -> CoreResult<Transaction> {
        let data = self.data.read().await;
        data.transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("transaction", id))
    }

    async fn create_transaction(&self, data: TransactionData) -> CoreResult<Transaction> {
        let transaction = Transaction::new(painel_utils::generate_id(), data.into_validated()?, Utc::now());
        let created = transaction.clone();
        self.commit(move |store| {
            store.transactions.push(transaction);
            Ok(())
        })
        .await?;
        log::info!("Created transaction {} ({} {})", created.id, created.data.kind, created.data.amount);
        Ok(created)
    }

    async fn update_transaction(&self, id: &str, data: TransactionData) -> CoreResult<Transaction> {
        let data = data.into_validated()?;
        let updated = self
            .commit(|store| {
                let existing = store
                    .transactions
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| not_found("transaction", id))?;
                existing.data = data;
                Ok(existing.clone())
            })
            .await?;
        log::info!("Updated transaction {}", id);
        Ok(updated)
    }

    async fn delete_transaction(&self, id: &str) -> CoreResult<()> {
        self.commit(|store| {
            let before = store.transactions.len();
            store.transactions.retain(|t| t.id != id);
            if store.transactions.len() == before {
                return Err(not_found("transaction", id));
            }
            Ok(())
        })
        .await?;
        log::info!("Deleted transaction {}", id);
        Ok(())
    }

    async fn list_clients(&self, status: Option<ClientStatus>, page: Page) -> CoreResult<Vec<Client>> {
        let data = self.data.read().await;
        let mut clients: Vec<Client> = data
            .clients
            .iter()
            .filter(|c| status.map_or(true, |s| c.data.status == s))
            .cloned()
            .collect();
        clients.sort_by(|a, b| a.data.name.cmp(&b.data.name));
        Ok(page.apply(clients))
    }

    async fn get_client(&self, id: &str) -> CoreResult<Client> {
        let data = self.data.read().await;
        data.clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found("client", id))
    }

    async fn create_client(&self, data: ClientData) -> CoreResult<Client> {
        let client = Client::new(painel_utils::generate_id(), data.into_validated()?, Utc::now());
        let created = client.clone();
        self.commit(move |store| {
            store.clients.push(client);
            Ok(())
        })
        .await?;
        log::info!("Created client {} ({})", created.id, created.data.name);
        Ok(created)
    }

    async fn update_client(&self, id: &str, data: ClientData) -> CoreResult<Client> {
        let data = data.into_validated()?;
        let updated = self
            .commit(|store| {
                let existing = store
                    .clients
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| not_found("client", id))?;
                existing.data = data;
                Ok(existing.clone())
            })
            .await?;
        log::info!("Updated client {}", id);
        Ok(updated)
    }

    async fn delete_client(&self, id: &str) -> CoreResult<()> {
        self.commit(|store| {
            let before = store.clients.len();
            store.clients.retain(|c| c.id != id);
            if store.clients.len() == before {
                return Err(not_found("client", id));
            }
            Ok(())
        })
        .await?;
        log::info!("Deleted client {}", id);
        Ok(())
    }

    async fn monthly_partials(&self, year: i32) -> CoreResult<Vec<PartialMonthData>> {
        let data = self.data.read().await;
        Ok(monthly_partials(year, &data.transactions))
    }

    async fn dashboard_snapshot(&self, today: NaiveDate) -> CoreResult<DashboardSnapshot> {
        let data = self.data.read().await;
        log::debug!("Dashboard snapshot for {}-{:02}", today.year(), today.month());
        Ok(DashboardSnapshot {
            current_month: MonthSummary::from_transactions(&data.transactions, today),
            delinquency: DelinquencySummary::from_clients(&data.clients),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::max_money;
    use crate::types::{Category, TransactionKind};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(kind: TransactionKind, amount: &str, day: NaiveDate) -> TransactionData {
        TransactionData {
            kind,
            category: kind.default_category(),
            description: "lançamento".to_string(),
            amount: dec(amount),
            date: day,
            client_name: None,
            notes: None,
        }
    }

    fn temp_snapshot() -> PathBuf {
        std::env::temp_dir()
            .join(format!("painel-test-{}", painel_utils::generate_id()))
            .join("painel.json")
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_validates() {
        let store = MemoryStore::new();
        let created = store
            .create_transaction(tx(TransactionKind::Income, "100", date(2024, 3, 1)))
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(store.get_transaction(&created.id).await.unwrap(), created);

        let mut bad = tx(TransactionKind::Expense, "10", date(2024, 3, 1));
        bad.category = Category::VendaOculos;
        let err = store.create_transaction(bad).await.unwrap_err();
        assert_eq!(err.field(), Some("category"));
        assert_eq!(store.data().await.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_list_transactions_newest_first_with_paging() {
        let store = MemoryStore::new();
        for day in [5, 1, 20, 12] {
            store
                .create_transaction(tx(TransactionKind::Income, "1", date(2024, 3, day)))
                .await
                .unwrap();
        }

        let all = store.list_transactions(&TransactionFilter::new(), Page::all()).await.unwrap();
        let days: Vec<u32> = all.iter().map(|t| t.data.date.day()).collect();
        assert_eq!(days, vec![20, 12, 5, 1]);

        let page = store.list_transactions(&TransactionFilter::new(), Page::new(1, 2)).await.unwrap();
        let days: Vec<u32> = page.iter().map(|t| t.data.date.day()).collect();
        assert_eq!(days, vec![12, 5]);
    }

    #[tokio::test]
    async fn test_update_replaces_payload_and_keeps_identity() {
        let store = MemoryStore::new();
        let created = store
            .create_transaction(tx(TransactionKind::Income, "100", date(2024, 3, 1)))
            .await
            .unwrap();

        let replacement = tx(TransactionKind::Expense, "40", date(2024, 3, 2));
        let updated = store.update_transaction(&created.id, replacement.clone()).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.data, replacement);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_client("nope").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        let err = store
            .update_transaction("nope", tx(TransactionKind::Income, "1", date(2024, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_clients_sorted_by_name_and_filtered_by_status() {
        let store = MemoryStore::new();
        for (name, status) in [
            ("Carla", ClientStatus::Delinquent),
            ("Ana", ClientStatus::Current),
            ("Bruno", ClientStatus::Delinquent),
        ] {
            let mut data = ClientData::named(name);
            data.status = status;
            store.create_client(data).await.unwrap();
        }

        let names = |list: Vec<Client>| list.into_iter().map(|c| c.data.name).collect::<Vec<_>>();
        assert_eq!(
            names(store.list_clients(None, Page::all()).await.unwrap()),
            vec!["Ana", "Bruno", "Carla"]
        );
        assert_eq!(
            names(store.list_clients(Some(ClientStatus::Delinquent), Page::all()).await.unwrap()),
            vec!["Bruno", "Carla"]
        );
    }

    #[tokio::test]
    async fn test_monthly_partials_and_snapshot() {
        let store = MemoryStore::new();
        store.create_transaction(tx(TransactionKind::Income, "100", date(2024, 3, 1))).await.unwrap();
        store.create_transaction(tx(TransactionKind::Income, "50", date(2024, 3, 9))).await.unwrap();
        store.create_transaction(tx(TransactionKind::Expense, "40", date(2024, 3, 10))).await.unwrap();
        store.create_transaction(tx(TransactionKind::Expense, "10", date(2024, 3, 11))).await.unwrap();
        store.create_transaction(tx(TransactionKind::Income, "999", date(2023, 3, 11))).await.unwrap();

        let partials = store.monthly_partials(2024).await.unwrap();
        assert_eq!(partials.len(), 1);
        assert_eq!(partials[0].month, 3);
        assert_eq!(partials[0].total_income, dec("150"));
        assert_eq!(partials[0].total_expense, dec("50"));
        assert_eq!(partials[0].transaction_count, 4);

        let mut owing = ClientData::named("Ana");
        owing.status = ClientStatus::Delinquent;
        owing.amount_owed = dec("80");
        store.create_client(owing).await.unwrap();

        let snapshot = store.dashboard_snapshot(date(2024, 3, 31)).await.unwrap();
        assert_eq!(snapshot.current_month.net, dec("100"));
        assert_eq!(snapshot.delinquency.count, 1);
        assert_eq!(snapshot.delinquency.total_owed, dec("80"));
    }

    #[tokio::test]
    async fn test_snapshot_file_round_trip() {
        let path = temp_snapshot();
        {
            let store = MemoryStore::open(&path).await.unwrap();
            store
                .create_transaction(tx(TransactionKind::Income, "12.34", date(2024, 5, 1)))
                .await
                .unwrap();
            store.create_client(ClientData::named("Ana")).await.unwrap();
        }

        let reopened = MemoryStore::open(&path).await.unwrap();
        let data = reopened.data().await;
        assert_eq!(data.transactions.len(), 1);
        assert_eq!(data.transactions[0].data.amount, dec("12.34"));
        assert_eq!(data.clients[0].data.name, "Ana");

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_snapshot_keeps_money_exact() {
        let path = temp_snapshot();
        let amount = dec("123456789012345.6789");
        {
            let store = MemoryStore::open(&path).await.unwrap();
            store
                .create_transaction(tx(TransactionKind::Income, "123456789012345.6789", date(2024, 5, 1)))
                .await
                .unwrap();
            let mut client = ClientData::named("Ana");
            client.amount_owed = max_money();
            client.gross_income = dec("98765432109876.54");
            store.create_client(client).await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""valor": "123456789012345.6789""#));

        let data = MemoryStore::open(&path).await.unwrap().data().await;
        assert_eq!(data.transactions[0].data.amount, amount);
        assert_eq!(data.clients[0].data.amount_owed, max_money());
        assert_eq!(data.clients[0].data.gross_income, dec("98765432109876.54"));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_numeric_snapshot_still_loads() {
        let path = temp_snapshot();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"transactions": [{"id": "t-1", "tipo": "saida", "categoria": "aluguel",
                "descricao": "Aluguel", "valor": 1500.5, "data": "2024-02-01",
                "created_at": "2024-02-01T10:00:00Z"}], "clients": []}"#,
        )
        .unwrap();

        let data = MemoryStore::open(&path).await.unwrap().data().await;
        assert_eq!(data.transactions[0].data.amount, dec("1500.5"));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_state_unchanged() {
        // A directory where the snapshot file should be makes every write fail.
        let path = temp_snapshot();
        std::fs::create_dir_all(&path).unwrap();
        let store = MemoryStore {
            data: RwLock::new(StoreData::default()),
            snapshot: Some(path.clone()),
        };

        let err = store
            .create_transaction(tx(TransactionKind::Income, "1", date(2024, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Persistence { .. }));
        assert!(store.data().await.transactions.is_empty());

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
