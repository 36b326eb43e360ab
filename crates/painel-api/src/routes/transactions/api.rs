//! Transactions API endpoints - JSON API
//!
//! Endpoints:
//! - api_transactions: Filtered, paged list, newest first
//! - api_transaction_detail: Single transaction
//! - api_transaction_create: Create from a full payload
//! - api_transaction_update: Replace every field of a transaction
//! - api_transaction_delete: Delete a transaction

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use painel_core::{Transaction, TransactionData};

use crate::error::ApiResult;
use crate::routes::params::{self, Params};
use crate::AppState;

/// Get transactions with filter and pagination (JSON API)
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(query): Query<Params>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let filter = params::transaction_filter(&query)?;
    let page = params::page(&query, state.config.pagination.records_per_page)?;
    let transactions = state.store.list_transactions(&filter, page).await?;
    Ok(Json(transactions))
}

/// Get single transaction detail (JSON API)
pub async fn api_transaction_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.store.get_transaction(&id).await?))
}

pub async fn api_transaction_create(
    State(state): State<AppState>,
    Json(payload): Json<TransactionData>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state.store.create_transaction(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn api_transaction_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionData>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.store.update_transaction(&id, payload).await?))
}

pub async fn api_transaction_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_transaction(&id).await?;
    Ok(Json(serde_json::json!({ "message": "Transação deletada com sucesso" })))
}
