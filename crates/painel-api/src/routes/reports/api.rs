//! Reports API endpoints - JSON API

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, NaiveDate, Utc};
use painel_core::{aggregate_year, DashboardSnapshot, MonthlyReport};

use crate::error::ApiResult;
use crate::routes::params::{self, Params};
use crate::AppState;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Twelve-month report for `year`, gaps filled from the store's sparse totals
pub(crate) async fn monthly_report(state: &AppState, year: i32) -> ApiResult<MonthlyReport> {
    let partials = state.store.monthly_partials(year).await?;
    let series = aggregate_year(year, &partials, state.config.reports.month_labels);
    Ok(MonthlyReport::from_series(&series))
}

/// Monthly report; `ano` defaults to the current year
pub async fn api_monthly_report(
    State(state): State<AppState>,
    Query(query): Query<Params>,
) -> ApiResult<Json<MonthlyReport>> {
    let year = params::optional::<i32>(&query, "ano")?.unwrap_or_else(|| today().year());
    Ok(Json(monthly_report(&state, year).await?))
}

/// Current month totals and delinquency figures
pub async fn api_dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardSnapshot>> {
    Ok(Json(state.store.dashboard_snapshot(today()).await?))
}
