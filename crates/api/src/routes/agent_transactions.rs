//! Agent self-reported ledger routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState, error::ApiResult, middleware::Caller, routes::dashboard::invalidate_dashboard,
};
use cashbook_db::{AgentTransactionRepository, entities::agent_transactions};
use cashbook_shared::types::AgentId;

/// Creates the agent transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/agents/{agent_id}/agent-transactions",
        get(list_agent_transactions).post(create_agent_transaction),
    )
}

/// Request body for a self-reported balance.
#[derive(Debug, Deserialize)]
pub struct CreateAgentTransactionRequest {
    /// Closing balance reported by the agent.
    pub closing_balance: Decimal,
}

/// POST /agents/{agent_id}/agent-transactions
async fn create_agent_transaction(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
    Json(payload): Json<CreateAgentTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let entry = AgentTransactionRepository::new((*state.db).clone())
        .create(&caller.access, agent_id, payload.closing_balance)
        .await?;

    invalidate_dashboard(&state, &caller);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /agents/{agent_id}/agent-transactions
async fn list_agent_transactions(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
) -> ApiResult<Json<Vec<agent_transactions::Model>>> {
    let rows = AgentTransactionRepository::new((*state.db).clone())
        .list(&caller.access, agent_id)
        .await?;
    Ok(Json(rows))
}
