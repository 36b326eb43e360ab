//! Route modules for the API server
//!
//! - transactions: Transaction list, filter, CRUD
//! - clients: Client list, CRUD
//! - reports: Monthly report and dashboard KPIs
//! - export: CSV downloads and the dashboard bundle
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints

pub mod clients;
pub mod export;
pub mod params;
pub mod reports;
pub mod transactions;
