//! Client routes - list by status, create, replace, delete

pub mod api;

pub use api::{api_client_create, api_client_delete, api_client_detail, api_client_update, api_clients};
