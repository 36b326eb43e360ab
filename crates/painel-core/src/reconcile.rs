//! Edit/create reconciliation
//!
//! A [`Reconciler`] owns one form and knows whether that form is creating a
//! new record or editing an existing one. Transactions and clients each get
//! their own reconciler inside a [`Session`].

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::form::{ClientForm, TransactionForm};
use crate::models::{Client, ClientData, Identified, RecordId, Transaction, TransactionData};
use crate::store::LedgerStore;

/// Whether the active form creates or edits
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(RecordId),
}

/// A form the reconciler can seed, parse and submit
#[async_trait]
pub trait RecordForm: Default + Clone + Send + Sync {
    type Record: Identified + Clone + Send + Sync;
    type Payload: Send;

    /// Resource name used in logs
    const RESOURCE: &'static str;

    fn seed(record: &Self::Record) -> Self;

    fn parse(&self) -> CoreResult<Self::Payload>;

    async fn create(store: &dyn LedgerStore, payload: Self::Payload) -> CoreResult<Self::Record>;

    async fn update(store: &dyn LedgerStore, id: &str, payload: Self::Payload) -> CoreResult<Self::Record>;
}

#[async_trait]
impl RecordForm for TransactionForm {
    type Record = Transaction;
    type Payload = TransactionData;

    const RESOURCE: &'static str = "transaction";

    fn seed(record: &Transaction) -> Self {
        TransactionForm::from_transaction(record)
    }

    fn parse(&self) -> CoreResult<TransactionData> {
        TransactionForm::parse(self)
    }

    async fn create(store: &dyn LedgerStore, payload: TransactionData) -> CoreResult<Transaction> {
        store.create_transaction(payload).await
    }

    async fn update(store: &dyn LedgerStore, id: &str, payload: TransactionData) -> CoreResult<Transaction> {
        store.update_transaction(id, payload).await
    }
}

#[async_trait]
impl RecordForm for ClientForm {
    type Record = Client;
    type Payload = ClientData;

    const RESOURCE: &'static str = "client";

    fn seed(record: &Client) -> Self {
        ClientForm::from_client(record)
    }

    fn parse(&self) -> CoreResult<ClientData> {
        ClientForm::parse(self)
    }

    async fn create(store: &dyn LedgerStore, payload: ClientData) -> CoreResult<Client> {
        store.create_client(payload).await
    }

    async fn update(store: &dyn LedgerStore, id: &str, payload: ClientData) -> CoreResult<Client> {
        store.update_client(id, payload).await
    }
}

/// What a successful submission did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    Created(R),
    Updated(R),
}

impl<R: Identified> SubmitOutcome<R> {
    pub fn record(&self) -> &R {
        match self {
            SubmitOutcome::Created(r) | SubmitOutcome::Updated(r) => r,
        }
    }

    pub fn into_record(self) -> R {
        match self {
            SubmitOutcome::Created(r) | SubmitOutcome::Updated(r) => r,
        }
    }

    /// Fold the written record into a locally cached list. Aggregates
    /// derived from the list must be recomputed afterwards.
    pub fn merge_into(self, records: &mut Vec<R>) {
        match self {
            SubmitOutcome::Created(record) => records.push(record),
            SubmitOutcome::Updated(record) => {
                match records.iter_mut().find(|r| r.id() == record.id()) {
                    Some(slot) => *slot = record,
                    None => records.push(record),
                }
            }
        }
    }
}

/// Edit/create state machine for one record type
#[derive(Debug, Clone, Default)]
pub struct Reconciler<F: RecordForm> {
    state: EditState,
    form: F,
}

impl<F: RecordForm> Reconciler<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// Start editing `record`, replacing whatever the form held
    pub fn begin_edit(&mut self, record: &F::Record) {
        self.form = F::seed(record);
        self.state = EditState::Editing(record.id().to_string());
    }

    /// Drop the edit and reset the form
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = EditState::Idle;
        self.form = F::default();
    }

    /// Parse the form and create or update through `store`.
    ///
    /// A form that does not parse is rejected before the store is called. A
    /// store failure is reported as `Persistence` and leaves both the state
    /// and the form as they were, so the submission can be retried.
    pub async fn submit(&mut self, store: &dyn LedgerStore) -> CoreResult<SubmitOutcome<F::Record>> {
        let payload = self.form.parse()?;

        let result = match &self.state {
            EditState::Editing(id) => F::update(store, id, payload).await.map(SubmitOutcome::Updated),
            EditState::Idle => F::create(store, payload).await.map(SubmitOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                self.reset();
                Ok(outcome)
            }
            Err(error) => {
                let error = match error {
                    CoreError::Persistence { .. } => error,
                    other => CoreError::persistence(other.to_string()),
                };
                DefaultErrorLogger.log_error(&error, &ErrorContext::new(format!("submit {}", F::RESOURCE)));
                Err(error)
            }
        }
    }
}

/// The caller-owned editing session: one reconciler per record type
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub transactions: Reconciler<TransactionForm>,
    pub clients: Reconciler<ClientForm>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
