//! Debt settlement errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::MoneyError;

/// Errors that can occur when creating a debt or applying a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebtError {
    /// Payment amount is zero or negative.
    #[error("Payment amount must be greater than zero, got {0}")]
    NonPositivePayment(Decimal),

    /// The debt is already fully paid.
    #[error("Debt is already paid off")]
    AlreadyPaidOff,

    /// A debt amount below zero was submitted.
    #[error("Debt amount cannot be negative, got {0}")]
    NegativeDebt(Decimal),

    /// Payment amount cannot be stored exactly.
    #[error("Payment amount {0}")]
    UnstorablePayment(MoneyError),

    /// Debt amount cannot be stored exactly.
    #[error("Debt amount {0}")]
    UnstorableDebt(MoneyError),

    /// Stored balances violate the non-negative invariant.
    #[error("Stored debtor balance is invalid (debt {debt_amount}, paid {total_paid})")]
    InvalidBalance {
        /// Stored outstanding amount.
        debt_amount: Decimal,
        /// Stored amount paid.
        total_paid: Decimal,
    },
}

impl DebtError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositivePayment(_) | Self::AlreadyPaidOff | Self::UnstorablePayment(_) => {
                "INVALID_PAYMENT"
            }
            Self::NegativeDebt(_) | Self::UnstorableDebt(_) => "INVALID_DEBT_AMOUNT",
            Self::InvalidBalance { .. } => "INVALID_DEBTOR_BALANCE",
        }
    }

    /// The request field the caller should correct, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::NonPositivePayment(_) | Self::AlreadyPaidOff | Self::UnstorablePayment(_) => {
                Some("payment_amount")
            }
            Self::NegativeDebt(_) | Self::UnstorableDebt(_) => Some("debt_amount"),
            Self::InvalidBalance { .. } => None,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidBalance { .. } => 500,
            _ => 422,
        }
    }
}
