//! Agent routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState, error::ApiResult, middleware::Caller, routes::dashboard::invalidate_dashboard,
};
use cashbook_core::agent::AgentProfile;
use cashbook_db::{
    AgentRepository,
    entities::agents,
    repositories::AgentWithBalance,
};
use cashbook_shared::types::AgentId;

/// Creates the agent routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/agents", get(list_agents).post(create_agent))
        .route("/agents/{agent_id}", get(get_agent).delete(delete_agent))
}

/// Request body for creating an agent.
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    /// Display name.
    pub name: String,
    /// Classification, e.g. "Bank".
    pub type_of_agent: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

/// GET /agents - Agents the caller may act upon.
async fn list_agents(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<agents::Model>>> {
    let rows = AgentRepository::new((*state.db).clone())
        .list(&caller.access)
        .await?;
    Ok(Json(rows))
}

/// POST /agents - Create an agent owned by the caller's admin.
async fn create_agent(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateAgentRequest>,
) -> ApiResult<impl IntoResponse> {
    let owner = caller.principal.owning_admin()?;
    let profile = AgentProfile::new(
        &payload.name,
        &payload.type_of_agent,
        payload.phone.as_deref(),
        payload.email.as_deref(),
    )?;

    let agent = AgentRepository::new((*state.db).clone())
        .create(owner, profile)
        .await?;

    invalidate_dashboard(&state, &caller);
    info!(agent_id = %agent.id, %owner, created_by = %caller.user_id(), "Agent created");

    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /agents/{agent_id} - One agent with its self-reported balance.
async fn get_agent(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
) -> ApiResult<Json<AgentWithBalance>> {
    let agent = AgentRepository::new((*state.db).clone())
        .find(&caller.access, agent_id)
        .await?;
    Ok(Json(agent))
}

/// DELETE /agents/{agent_id} - Delete an agent and everything it owns.
async fn delete_agent(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
) -> ApiResult<StatusCode> {
    caller.principal.require_admin()?;

    AgentRepository::new((*state.db).clone())
        .delete(&caller.access, agent_id)
        .await?;

    invalidate_dashboard(&state, &caller);
    info!(%agent_id, "Agent deleted");

    Ok(StatusCode::NO_CONTENT)
}
