//! The scoped caller: current user row plus the agents it may act upon.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use cashbook_core::access::{AccessibleAgents, Principal};
use cashbook_core::dashboard::DashboardKey;
use cashbook_db::ScopeRepository;
use cashbook_shared::{AppError, types::UserId};

/// The authenticated caller, resolved against the database on every request.
///
/// Role and admin link come from the stored user, not from token claims, so
/// a demoted or unlinked user loses access on their next request.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Who is calling.
    pub principal: Principal,
    /// Agents the caller may read or mutate.
    pub access: AccessibleAgents,
}

impl Caller {
    /// The caller's user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.principal.id()
    }

    /// Cache key of the caller's scope, `None` when the scope is empty.
    #[must_use]
    pub fn dashboard_key(&self) -> Option<DashboardKey> {
        self.principal.scope().owner().map(DashboardKey)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let user_id = UserId::from_uuid(auth.user_id());

        let scope_repo = ScopeRepository::new((*state.db).clone());
        let Some(principal) = scope_repo.principal(user_id).await? else {
            warn!(%user_id, "Token presented for a deleted user");
            return Err(ApiError(AppError::Unauthorized(
                "User no longer exists".to_string(),
            )));
        };

        let access = scope_repo.accessible_agents(&principal).await?;
        Ok(Self { principal, access })
    }
}
