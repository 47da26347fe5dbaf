//! Commission rules.
//!
//! A commission is an amount earned by one agent for a calendar month.
//! Several commissions may share the same agent and period.

use cashbook_shared::types::AgentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{MoneyError, check_storable};

/// Earliest accepted commission year.
pub const MIN_YEAR: i32 = 2000;

/// Latest accepted commission year.
pub const MAX_YEAR: i32 = 2100;

/// Errors raised by commission validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommissionError {
    /// Amount below zero.
    #[error("Commission amount cannot be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Amount cannot be stored exactly.
    #[error("Commission amount {0}")]
    UnstorableAmount(MoneyError),

    /// Month outside 1..=12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(i32),

    /// Year outside the accepted range.
    #[error("Year must be between {MIN_YEAR} and {MAX_YEAR}, got {0}")]
    InvalidYear(i32),
}

impl CommissionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) | Self::UnstorableAmount(_) => "INVALID_AMOUNT",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::InvalidYear(_) => "INVALID_YEAR",
        }
    }

    /// The request field the caller should correct.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) | Self::UnstorableAmount(_) => "amount",
            Self::InvalidMonth(_) => "month",
            Self::InvalidYear(_) => "year",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        422
    }
}

/// A calendar month a commission is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommissionPeriod {
    /// Year.
    pub year: i32,
    /// Month, 1-based.
    pub month: i32,
}

impl CommissionPeriod {
    /// Validates and builds a period.
    ///
    /// # Errors
    ///
    /// `InvalidMonth` or `InvalidYear` when out of range.
    pub const fn new(month: i32, year: i32) -> Result<Self, CommissionError> {
        if month < 1 || month > 12 {
            return Err(CommissionError::InvalidMonth(month));
        }
        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(CommissionError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }
}

/// A validated commission, ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionDraft {
    /// Owning agent.
    pub agent_id: AgentId,
    /// Amount earned.
    pub amount: Decimal,
    /// Period earned in.
    pub period: CommissionPeriod,
}

impl CommissionDraft {
    /// Validates commission fields.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: amount, then month, then year.
    pub fn new(
        agent_id: AgentId,
        amount: Decimal,
        month: i32,
        year: i32,
    ) -> Result<Self, CommissionError> {
        if amount < Decimal::ZERO {
            return Err(CommissionError::NegativeAmount(amount));
        }
        check_storable(amount).map_err(CommissionError::UnstorableAmount)?;
        let period = CommissionPeriod::new(month, year)?;
        Ok(Self {
            agent_id,
            amount,
            period,
        })
    }
}

/// Optional filters for listing commissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CommissionFilter {
    /// Restrict to a month.
    pub month: Option<i32>,
    /// Restrict to a year.
    pub year: Option<i32>,
    /// Restrict to one agent.
    pub agent_id: Option<AgentId>,
}
