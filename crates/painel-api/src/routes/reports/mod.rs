//! Report routes - monthly series and dashboard KPIs
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{api_dashboard, api_monthly_report};
