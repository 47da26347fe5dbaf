//! Debtor routes and payment recording.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Caller,
    routes::dashboard::invalidate_dashboard,
};
use cashbook_core::debt::{DebtorBalance, PaymentStatus, SettlementKind};
use cashbook_db::{
    DebtorRepository,
    entities::debtors,
    repositories::{CreateDebtorInput, DebtorOverview},
};
use cashbook_shared::{
    AppError,
    types::{AgentId, DebtorId},
};

/// Creates the debtor routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debtors", get(list_debtors).post(create_debtor))
        .route("/debtors/overview", get(debtor_overview))
        .route("/debtors/{debtor_id}", get(get_debtor))
        .route("/debtors/{debtor_id}/payments", post(record_payment))
}

/// Request body for creating a debtor.
#[derive(Debug, Deserialize)]
pub struct CreateDebtorRequest {
    /// Agent the debt is owed to.
    pub agent_id: AgentId,
    /// Debtor name.
    pub name: String,
    /// Amount owed.
    pub debt_amount: Decimal,
    /// Contact phone.
    pub phone: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Request body for a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid.
    pub payment_amount: Decimal,
}

/// A debtor row with its derived fields.
#[derive(Debug, Serialize)]
pub struct DebtorResponse {
    /// The stored row.
    #[serde(flatten)]
    pub debtor: debtors::Model,
    /// Outstanding plus paid.
    pub original_debt: Decimal,
    /// Outstanding or paid off.
    pub payment_status: PaymentStatus,
}

impl DebtorResponse {
    fn from_model(debtor: debtors::Model) -> ApiResult<Self> {
        let balance = DebtorBalance::from_stored(debtor.debt_amount, debtor.total_paid)?;
        Ok(Self {
            debtor,
            original_debt: balance.original_debt(),
            payment_status: balance.status(),
        })
    }
}

/// Result of a recorded payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// The debtor after the payment.
    pub debtor: DebtorResponse,
    /// Portion of the payment applied to the debt.
    pub applied: Decimal,
    /// Portion beyond what was owed. Not recorded.
    pub unapplied: Decimal,
    /// Full or partial.
    pub settlement: SettlementKind,
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /debtors
async fn list_debtors(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<DebtorResponse>>> {
    let rows = DebtorRepository::new((*state.db).clone())
        .list(&caller.access)
        .await?;

    let debtors = rows
        .into_iter()
        .map(DebtorResponse::from_model)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(debtors))
}

/// GET /debtors/overview
async fn debtor_overview(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<DebtorOverview>> {
    let overview = DebtorRepository::new((*state.db).clone())
        .overview(&caller.access)
        .await?;
    Ok(Json(overview))
}

/// POST /debtors
async fn create_debtor(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateDebtorRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError(AppError::rejected(
            "BLANK_FIELD",
            Some("name"),
            "name can't be blank",
        )));
    }

    let debtor = DebtorRepository::new((*state.db).clone())
        .create(
            &caller.access,
            CreateDebtorInput {
                agent_id: payload.agent_id,
                name,
                debt_amount: payload.debt_amount,
                phone: optional(payload.phone),
                notes: optional(payload.notes),
            },
        )
        .await?;

    invalidate_dashboard(&state, &caller);
    Ok((StatusCode::CREATED, Json(DebtorResponse::from_model(debtor)?)))
}

/// GET /debtors/{debtor_id}
async fn get_debtor(
    State(state): State<AppState>,
    caller: Caller,
    Path(debtor_id): Path<DebtorId>,
) -> ApiResult<Json<DebtorResponse>> {
    let row = DebtorRepository::new((*state.db).clone())
        .find(&caller.access, debtor_id)
        .await?;
    Ok(Json(DebtorResponse::from_model(row)?))
}

/// POST /debtors/{debtor_id}/payments
async fn record_payment(
    State(state): State<AppState>,
    caller: Caller,
    Path(debtor_id): Path<DebtorId>,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult<Json<PaymentResponse>> {
    let outcome = DebtorRepository::new((*state.db).clone())
        .apply_payment(&caller.access, debtor_id, payload.payment_amount)
        .await?;

    invalidate_dashboard(&state, &caller);

    Ok(Json(PaymentResponse {
        debtor: DebtorResponse::from_model(outcome.debtor)?,
        applied: outcome.settlement.applied,
        unapplied: outcome.settlement.unapplied,
        settlement: outcome.settlement.kind,
    }))
}
