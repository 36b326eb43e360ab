//! Export API endpoints
//!
//! Endpoints:
//! - api_export_transactions: Transactions as CSV, honouring the list filter
//! - api_export_clients: Clients as CSV
//! - api_export_dashboard: Dashboard, monthly report and client segments as JSON

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Datelike, Utc};
use painel_core::{client_segments, export_file, DashboardExport, ExportFile, Page};

use crate::error::ApiResult;
use crate::routes::params::{self, Params};
use crate::routes::reports::api::{monthly_report, today};
use crate::AppState;

fn attachment(file: ExportFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        file.filename,
        urlencoding::encode(&file.filename)
    );
    (
        [
            (header::CONTENT_TYPE, file.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response()
}

pub async fn api_export_transactions(
    State(state): State<AppState>,
    Query(query): Query<Params>,
) -> ApiResult<Response> {
    let filter = params::transaction_filter(&query)?;
    let transactions = state.store.list_transactions(&filter, Page::all()).await?;
    let file = export_file(
        "transacoes",
        &transactions,
        state.config.export.delimiter_byte(),
        today(),
    )?;
    log::info!("Exported {} transactions to {}", transactions.len(), file.filename);
    Ok(attachment(file))
}

pub async fn api_export_clients(State(state): State<AppState>) -> ApiResult<Response> {
    let clients = state.store.list_clients(None, Page::all()).await?;
    let file = export_file("clientes", &clients, state.config.export.delimiter_byte(), today())?;
    log::info!("Exported {} clients to {}", clients.len(), file.filename);
    Ok(attachment(file))
}

pub async fn api_export_dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardExport>> {
    let date = today();
    let dashboard = state.store.dashboard_snapshot(date).await?;
    let report = monthly_report(&state, date.year()).await?;
    let clients = state.store.list_clients(None, Page::all()).await?;

    Ok(Json(DashboardExport {
        dashboard,
        monthly_report: report,
        client_segments: client_segments(&clients),
        exported_at: Utc::now(),
    }))
}
