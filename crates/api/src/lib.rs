//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware and the scoped caller extractor
//! - The `{ "errors": [...] }` response envelope

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use cashbook_core::access::GlobalViewPolicy;
use cashbook_core::dashboard::DashboardCache;
use cashbook_core::ledger::ContinuityPolicy;
use cashbook_shared::JwtService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Continuity rules applied to daily transactions.
    pub ledger_policy: ContinuityPolicy,
    /// Read cache for dashboard summaries.
    pub dashboard_cache: DashboardCache,
    /// Domain used for derived employee emails.
    pub employee_email_domain: Arc<str>,
    /// Admins allowed to read across tenants.
    pub global_view: Arc<GlobalViewPolicy>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
