//! Daily transaction routes.
//!
//! Continuity is enforced by the repository under the agent row lock.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, error::ApiResult, middleware::Caller, routes::dashboard::invalidate_dashboard,
};
use cashbook_core::ledger::ContinuityWarning;
use cashbook_db::{
    TransactionRepository,
    entities::transactions,
    repositories::CreateTransactionInput,
};
use cashbook_shared::types::{AgentId, PageRequest, PageResponse};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/agents/{agent_id}/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/agents/{agent_id}/transactions/latest", get(latest_transaction))
        .route("/me/transactions", get(list_own_transactions))
}

/// Request body for recording a day.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Business date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Closing balance.
    pub closing_balance: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Accept an opening balance mismatch with a warning. Admins only.
    #[serde(default)]
    pub override_continuity: bool,
}

/// A recorded transaction with any accepted warnings.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// The stored row.
    #[serde(flatten)]
    pub transaction: transactions::Model,
    /// Continuity findings accepted with the row.
    pub warnings: Vec<ContinuityWarning>,
}

/// POST /agents/{agent_id}/transactions - Record a day for an agent.
async fn create_transaction(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let mode = state
        .ledger_policy
        .mode_for(caller.principal.is_admin(), payload.override_continuity)?;

    let recorded = TransactionRepository::new((*state.db).clone())
        .create(
            &caller.access,
            CreateTransactionInput {
                agent_id,
                creator_id: caller.user_id(),
                date: payload.date,
                opening_balance: payload.opening_balance,
                closing_balance: payload.closing_balance,
                notes: payload
                    .notes
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            },
            mode,
        )
        .await?;

    invalidate_dashboard(&state, &caller);

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction: recorded.transaction,
            warnings: recorded.warnings,
        }),
    ))
}

/// GET /agents/{agent_id}/transactions - Paged history, newest date first.
async fn list_transactions(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<transactions::Model>>> {
    let page = TransactionRepository::new((*state.db).clone())
        .list_page(&caller.access, agent_id, &page)
        .await?;
    Ok(Json(page))
}

/// GET /agents/{agent_id}/transactions/latest - Latest day, or a zero closing balance.
async fn latest_transaction(
    State(state): State<AppState>,
    caller: Caller,
    Path(agent_id): Path<AgentId>,
) -> ApiResult<Response> {
    let latest = TransactionRepository::new((*state.db).clone())
        .latest(&caller.access, agent_id)
        .await?;

    Ok(match latest {
        Some(row) => Json(row).into_response(),
        None => Json(json!({ "closing_balance": Decimal::ZERO })).into_response(),
    })
}

/// GET /me/transactions - Days recorded by the caller, oldest first.
async fn list_own_transactions(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<transactions::Model>>> {
    let page = TransactionRepository::new((*state.db).clone())
        .list_by_creator(&caller.access, caller.user_id(), &page)
        .await?;
    Ok(Json(page))
}
