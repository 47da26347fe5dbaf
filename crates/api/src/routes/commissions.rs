//! Commission routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Caller,
    routes::dashboard::invalidate_dashboard,
};
use cashbook_core::commission::{CommissionDraft, CommissionFilter};
use cashbook_db::{
    CommissionRepository,
    entities::commissions,
    repositories::UpdateCommissionInput,
};
use cashbook_shared::{
    AppError,
    types::{AgentId, CommissionId},
};

/// Creates the commission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commissions", get(list_commissions).post(create_commission))
        .route(
            "/commissions/{commission_id}",
            get(get_commission)
                .put(update_commission)
                .delete(delete_commission),
        )
}

/// Request body for creating a commission.
#[derive(Debug, Deserialize)]
pub struct CreateCommissionRequest {
    /// Agent the commission belongs to.
    pub agent_id: AgentId,
    /// Amount earned.
    pub amount: Decimal,
    /// Month (1-12).
    pub month: i32,
    /// Year.
    pub year: i32,
}

/// Request body for updating a commission.
#[derive(Debug, Deserialize)]
pub struct UpdateCommissionRequest {
    /// Must match the current agent when present.
    pub agent_id: Option<AgentId>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New month.
    pub month: Option<i32>,
    /// New year.
    pub year: Option<i32>,
}

/// GET /commissions?month=&year=&agent_id=
async fn list_commissions(
    State(state): State<AppState>,
    caller: Caller,
    Query(filter): Query<CommissionFilter>,
) -> ApiResult<Json<Vec<commissions::Model>>> {
    let rows = CommissionRepository::new((*state.db).clone())
        .list(&caller.access, filter)
        .await?;
    Ok(Json(rows))
}

/// POST /commissions
async fn create_commission(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateCommissionRequest>,
) -> ApiResult<impl IntoResponse> {
    let draft = CommissionDraft::new(
        payload.agent_id,
        payload.amount,
        payload.month,
        payload.year,
    )?;

    let commission = CommissionRepository::new((*state.db).clone())
        .create(&caller.access, draft)
        .await?;

    invalidate_dashboard(&state, &caller);
    Ok((StatusCode::CREATED, Json(commission)))
}

/// GET /commissions/{commission_id}
async fn get_commission(
    State(state): State<AppState>,
    caller: Caller,
    Path(commission_id): Path<CommissionId>,
) -> ApiResult<Json<commissions::Model>> {
    let row = CommissionRepository::new((*state.db).clone())
        .find(&caller.access, commission_id)
        .await?;
    Ok(Json(row))
}

/// PUT /commissions/{commission_id}
async fn update_commission(
    State(state): State<AppState>,
    caller: Caller,
    Path(commission_id): Path<CommissionId>,
    Json(payload): Json<UpdateCommissionRequest>,
) -> ApiResult<Json<commissions::Model>> {
    let repo = CommissionRepository::new((*state.db).clone());

    if let Some(agent_id) = payload.agent_id {
        let existing = repo.find(&caller.access, commission_id).await?;
        if AgentId::from_uuid(existing.agent_id) != agent_id {
            return Err(ApiError(AppError::rejected(
                "AGENT_IMMUTABLE",
                Some("agent_id"),
                "A commission cannot be moved to another agent",
            )));
        }
    }

    let row = repo
        .update(
            &caller.access,
            commission_id,
            UpdateCommissionInput {
                amount: payload.amount,
                month: payload.month,
                year: payload.year,
            },
        )
        .await?;

    invalidate_dashboard(&state, &caller);
    Ok(Json(row))
}

/// DELETE /commissions/{commission_id}
async fn delete_commission(
    State(state): State<AppState>,
    caller: Caller,
    Path(commission_id): Path<CommissionId>,
) -> ApiResult<StatusCode> {
    CommissionRepository::new((*state.db).clone())
        .delete(&caller.access, commission_id)
        .await?;

    invalidate_dashboard(&state, &caller);
    Ok(StatusCode::NO_CONTENT)
}
