//! Core ledger processing and business logic
//!
//! Records, monthly aggregation, dashboard KPIs, filtering, form
//! reconciliation and delimited-text export. Everything here is a pure
//! transformation over in-memory values except the [`store`] boundary.

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod models;
pub mod reconcile;
pub mod reports;
pub mod store;
pub mod summary;
pub mod types;

pub use aggregate::{
    add_money, aggregate_transactions, aggregate_year, margin_percent, month_labels, monthly_partials, round_money,
    sub_money, MonthBucket, MonthlyReportRow, PartialMonthData, YearSeries,
};
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger, ErrorSeverity,
};
pub use export::{export_file, export_filename, to_delimited_text, ExportFile};
pub use filter::{filter_transactions, TransactionFilter};
pub use form::{ClientForm, TransactionForm};
pub use models::{max_money, Client, ClientData, Identified, RecordId, Transaction, TransactionData};
pub use reconcile::{EditState, Reconciler, RecordForm, Session, SubmitOutcome};
pub use reports::{DashboardExport, MonthlyReport, YearTotals};
pub use store::{LedgerStore, MemoryStore, Page, StoreData, StoreRef};
pub use summary::{
    client_segments, summarize_current_month, ClientSegmentStats, DashboardSnapshot, DelinquencySummary,
    MonthSummary,
};
pub use types::{
    AcquisitionChannel, Category, ClientStatus, Education, MaritalStatus, PurchaseFrequency, PurchaseProfile,
    TransactionKind, TriState,
};
