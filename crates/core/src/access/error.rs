//! Access control errors.

use cashbook_shared::types::AgentId;
use thiserror::Error;

/// Errors raised when a caller reaches outside their scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The agent exists but is not in the caller's accessible set.
    #[error("Agent {0} is not accessible to the current user")]
    AgentNotInScope(AgentId),

    /// The operation is reserved for admins.
    #[error("This action requires an admin account")]
    AdminRequired,

    /// An admin who is not configured for the cross-tenant view.
    #[error("The global dashboard is not enabled for this account")]
    GlobalViewNotGranted,

    /// An employee with no admin tried to act on their admin's behalf.
    #[error("Employee is not assigned to an admin")]
    NoAdminAssigned,
}

impl AccessError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AgentNotInScope(_) => "AGENT_NOT_IN_SCOPE",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::GlobalViewNotGranted => "GLOBAL_VIEW_NOT_GRANTED",
            Self::NoAdminAssigned => "NO_ADMIN_ASSIGNED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        403
    }
}
