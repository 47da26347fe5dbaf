//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod agent_transactions;
pub mod agents;
pub mod auth;
pub mod commissions;
pub mod dashboard;
pub mod debtors;
pub mod employees;
pub mod health;
pub mod transactions;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::session_routes())
        .merge(employees::routes())
        .merge(agents::routes())
        .merge(transactions::routes())
        .merge(agent_transactions::routes())
        .merge(commissions::routes())
        .merge(debtors::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
