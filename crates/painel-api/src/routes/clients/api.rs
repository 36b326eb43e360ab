//! Clients API endpoints - JSON API

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use painel_core::{Client, ClientData, ClientStatus};

use crate::error::ApiResult;
use crate::routes::params::{self, Params};
use crate::AppState;

/// Clients sorted by name; `status` narrows to current or delinquent
pub async fn api_clients(
    State(state): State<AppState>,
    Query(query): Query<Params>,
) -> ApiResult<Json<Vec<Client>>> {
    let status = params::optional::<ClientStatus>(&query, "status")?;
    let page = params::page(&query, state.config.pagination.records_per_page)?;
    Ok(Json(state.store.list_clients(status, page).await?))
}

pub async fn api_client_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    Ok(Json(state.store.get_client(&id).await?))
}

pub async fn api_client_create(
    State(state): State<AppState>,
    Json(payload): Json<ClientData>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let created = state.store.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn api_client_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ClientData>,
) -> ApiResult<Json<Client>> {
    Ok(Json(state.store.update_client(&id, payload).await?))
}

pub async fn api_client_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_client(&id).await?;
    Ok(Json(serde_json::json!({ "message": "Cliente deletado com sucesso" })))
}
