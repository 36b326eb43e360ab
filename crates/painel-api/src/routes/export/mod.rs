//! Export routes - CSV downloads and the dashboard bundle

pub mod api;

pub use api::{api_export_clients, api_export_dashboard, api_export_transactions};
