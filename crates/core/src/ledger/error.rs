//! Ledger error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::MoneyError;

/// Errors that can occur when recording a daily transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A transaction already exists for this agent on this date.
    #[error("A transaction already exists for {date}")]
    DuplicateDate {
        /// The contested date.
        date: NaiveDate,
    },

    /// The date is earlier than the agent's latest recorded transaction.
    #[error("Date {date} is before the latest recorded transaction ({latest})")]
    NonSequentialDate {
        /// The proposed date.
        date: NaiveDate,
        /// Date of the agent's most recent transaction.
        latest: NaiveDate,
    },

    /// The opening balance does not continue the previous closing balance.
    #[error("Opening balance {actual} does not match previous closing balance {expected}")]
    OpeningBalanceMismatch {
        /// The previous day's closing balance.
        expected: Decimal,
        /// The submitted opening balance.
        actual: Decimal,
    },

    /// A balance cannot be stored exactly.
    #[error("{field} {reason}")]
    UnstorableAmount {
        /// The offending balance field.
        field: &'static str,
        /// Why it was refused.
        reason: MoneyError,
    },

    /// A continuity override was requested by a caller who may not use it.
    #[error("Continuity override is not permitted for this user")]
    OverrideNotPermitted,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateDate { .. } => "DUPLICATE_DATE",
            Self::NonSequentialDate { .. } => "NON_SEQUENTIAL_DATE",
            Self::OpeningBalanceMismatch { .. } => "OPENING_BALANCE_MISMATCH",
            Self::UnstorableAmount { .. } => "INVALID_AMOUNT",
            Self::OverrideNotPermitted => "OVERRIDE_NOT_PERMITTED",
        }
    }

    /// The request field the caller should correct.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::DuplicateDate { .. } | Self::NonSequentialDate { .. } => "date",
            Self::OpeningBalanceMismatch { .. } => "opening_balance",
            Self::UnstorableAmount { field, .. } => *field,
            Self::OverrideNotPermitted => "override_continuity",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::OverrideNotPermitted => 403,
            _ => 422,
        }
    }
}
