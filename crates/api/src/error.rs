//! Maps domain and repository errors onto the HTTP error envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::{error, warn};

use cashbook_core::access::AccessError;
use cashbook_core::agent::AgentError as ProfileError;
use cashbook_core::auth::PasswordError;
use cashbook_core::commission::CommissionError as RuleError;
use cashbook_core::debt::DebtError;
use cashbook_core::ledger::LedgerError;
use cashbook_db::repositories::{AgentError, CommissionError, DebtorError, TransactionError};
use cashbook_shared::{AppError, JwtError};

/// Handler error, rendered as `{ "errors": [ { code, field, message } ] }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Returns the wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (status, Json(json!({ "errors": self.0.to_field_errors() }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self(AppError::Database(e.to_string()))
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        warn!(code = e.error_code(), "Access denied");
        Self(AppError::denied(e.error_code(), None, e.to_string()))
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::OverrideNotPermitted => {
                warn!("Continuity override refused");
                Self(AppError::denied(
                    e.error_code(),
                    Some(e.field()),
                    e.to_string(),
                ))
            }
            _ => Self(AppError::rejected(
                e.error_code(),
                Some(e.field()),
                e.to_string(),
            )),
        }
    }
}

impl From<DebtError> for ApiError {
    fn from(e: DebtError) -> Self {
        match e {
            DebtError::InvalidBalance { .. } => Self(AppError::Internal(e.to_string())),
            _ => Self(AppError::rejected(e.error_code(), e.field(), e.to_string())),
        }
    }
}

impl From<RuleError> for ApiError {
    fn from(e: RuleError) -> Self {
        Self(AppError::rejected(
            e.error_code(),
            Some(e.field()),
            e.to_string(),
        ))
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        Self(AppError::rejected(
            e.error_code(),
            Some(e.field()),
            e.to_string(),
        ))
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort => Self(AppError::rejected(
                "WEAK_PASSWORD",
                Some("password"),
                e.to_string(),
            )),
            _ => Self(AppError::Internal(e.to_string())),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::EncodingError(_) => Self(AppError::Internal(e.to_string())),
            JwtError::Expired => Self(AppError::Unauthorized("Token has expired".to_string())),
            JwtError::DecodingError(_) | JwtError::WrongKind => Self(AppError::Unauthorized(
                "Invalid or malformed token".to_string(),
            )),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::NotFound(_) => Self(AppError::NotFound(e.to_string())),
            AgentError::Access(e) => e.into(),
            AgentError::Database(e) => e.into(),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::AgentNotFound(_) => Self(AppError::NotFound(e.to_string())),
            TransactionError::Access(e) => e.into(),
            TransactionError::Ledger(e) => e.into(),
            TransactionError::Database(e) => e.into(),
        }
    }
}

impl From<CommissionError> for ApiError {
    fn from(e: CommissionError) -> Self {
        match e {
            CommissionError::NotFound(_) | CommissionError::AgentNotFound(_) => {
                Self(AppError::NotFound(e.to_string()))
            }
            CommissionError::Access(e) => e.into(),
            CommissionError::Rule(e) => e.into(),
            CommissionError::Database(e) => e.into(),
        }
    }
}

impl From<DebtorError> for ApiError {
    fn from(e: DebtorError) -> Self {
        match e {
            DebtorError::NotFound(_) | DebtorError::AgentNotFound(_) => {
                Self(AppError::NotFound(e.to_string()))
            }
            DebtorError::ConcurrentModification(_) => Self(AppError::Conflict(e.to_string())),
            DebtorError::Access(e) => e.into(),
            DebtorError::Debt(e) => e.into(),
            DebtorError::Database(e) => e.into(),
        }
    }
}
