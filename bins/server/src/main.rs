//! Cashbook API Server
//!
//! Main entry point for the Cashbook backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashbook_api::{AppState, create_router};
use cashbook_core::access::GlobalViewPolicy;
use cashbook_core::dashboard::DashboardCache;
use cashbook_core::ledger::ContinuityPolicy;
use cashbook_db::connect_with_pool;
use cashbook_shared::types::UserId;
use cashbook_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!("Connected to database");

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("jwt.access_token_expiry_secs is out of range")?,
        refresh_token_expires_days: i64::try_from(config.jwt.refresh_token_expiry_secs / 86400)
            .context("jwt.refresh_token_expiry_secs is out of range")?,
    };

    let ledger_policy = ContinuityPolicy {
        strict_opening_balance: config.ledger.strict_opening_balance,
        allow_admin_override: config.ledger.allow_admin_override,
    };
    info!(
        strict_opening_balance = ledger_policy.strict_opening_balance,
        allow_admin_override = ledger_policy.allow_admin_override,
        "Ledger continuity policy"
    );

    let global_view = GlobalViewPolicy::new(
        config
            .access
            .global_view_admins
            .iter()
            .copied()
            .map(UserId::from_uuid),
    );
    info!(
        operators = config.access.global_view_admins.len(),
        "Global dashboard access"
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(jwt_config)),
        ledger_policy,
        dashboard_cache: DashboardCache::with_config(
            config.cache.dashboard_capacity,
            config.cache.dashboard_ttl_secs,
        ),
        employee_email_domain: Arc::from(config.employees.email_domain.as_str()),
        global_view: Arc::new(global_view),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
