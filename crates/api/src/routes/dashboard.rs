//! Dashboard routes, served through the summary cache.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::{AppState, error::ApiResult, middleware::Caller};
use cashbook_core::access::GlobalView;
use cashbook_core::dashboard::{
    GlobalSummary, PerformanceReport, PeriodStats, ScopeSummary, StatsWindow,
};
use cashbook_db::DashboardRepository;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stats/weekly", get(get_weekly_stats))
        .route("/dashboard/stats/monthly", get(get_monthly_stats))
        .route("/dashboard/stats/agents_performance", get(get_agents_performance))
        .route("/admin/dashboard/global", get(get_global_dashboard))
}

/// Drops cached summaries touched by a mutation in the caller's scope.
pub(crate) fn invalidate_dashboard(state: &AppState, caller: &Caller) {
    match caller.dashboard_key() {
        Some(key) => state.dashboard_cache.invalidate(key),
        None => state.dashboard_cache.invalidate_all(),
    }
}

/// GET /dashboard - Summary of the caller's accessible agents.
async fn get_dashboard(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<ScopeSummary>> {
    let key = caller.dashboard_key();

    if let Some(cached) = key.and_then(|k| state.dashboard_cache.scoped(k)) {
        debug!(user_id = %caller.user_id(), "Dashboard cache hit");
        return Ok(Json(ScopeSummary::clone(&cached)));
    }

    let summary = DashboardRepository::new((*state.db).clone())
        .scoped_summary(&caller.access, today())
        .await?;

    if let Some(key) = key {
        state.dashboard_cache.store_scoped(key, summary.clone());
    }
    Ok(Json(summary))
}

/// GET /dashboard/stats/weekly - Activity over the last seven days.
async fn get_weekly_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<PeriodStats>> {
    period_stats(&state, &caller, StatsWindow::Weekly).await
}

/// GET /dashboard/stats/monthly - Activity in the current calendar month.
async fn get_monthly_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<PeriodStats>> {
    period_stats(&state, &caller, StatsWindow::Monthly).await
}

async fn period_stats(
    state: &AppState,
    caller: &Caller,
    window: StatsWindow,
) -> ApiResult<Json<PeriodStats>> {
    let stats = DashboardRepository::new((*state.db).clone())
        .period_stats(&caller.access, window, today())
        .await?;
    Ok(Json(stats))
}

/// GET /dashboard/stats/agents_performance - Monthly figures per accessible agent.
async fn get_agents_performance(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<PerformanceReport>> {
    let report = DashboardRepository::new((*state.db).clone())
        .agent_performance(&caller.access, today())
        .await?;
    Ok(Json(report))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /admin/dashboard/global - Totals across every tenant. Configured operators only.
async fn get_global_dashboard(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<GlobalSummary>> {
    let view = GlobalView::for_principal(&caller.principal, &state.global_view)?;

    if let Some(cached) = state.dashboard_cache.global() {
        debug!(requested_by = %view.requested_by(), "Global dashboard cache hit");
        return Ok(Json(GlobalSummary::clone(&cached)));
    }

    let summary = DashboardRepository::new((*state.db).clone())
        .global_summary(&view)
        .await?;
    state.dashboard_cache.store_global(summary.clone());
    Ok(Json(summary))
}
