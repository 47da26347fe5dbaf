//! Domain types for daily balance transactions.

use cashbook_shared::types::AgentId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::money::check_storable;

/// The balance fields of an existing transaction that continuity depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Business date.
    pub date: NaiveDate,
    /// Balance at the start of the day.
    pub opening_balance: Decimal,
    /// Balance at the end of the day.
    pub closing_balance: Decimal,
}

/// A transaction submitted for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedTransaction {
    /// Owning agent.
    pub agent_id: AgentId,
    /// Business date.
    pub date: NaiveDate,
    /// Submitted opening balance.
    pub opening_balance: Decimal,
    /// Submitted closing balance.
    pub closing_balance: Decimal,
}

impl ProposedTransaction {
    /// Checks that both balances are stored exactly as submitted.
    ///
    /// # Errors
    ///
    /// `UnstorableAmount` naming the first offending field.
    pub fn check_amounts(&self) -> Result<(), LedgerError> {
        check_balance("opening_balance", self.opening_balance)?;
        check_balance("closing_balance", self.closing_balance)
    }
}

/// Checks one balance field for storage.
///
/// # Errors
///
/// `UnstorableAmount` for `field`.
pub fn check_balance(field: &'static str, amount: Decimal) -> Result<(), LedgerError> {
    check_storable(amount)
        .map(|_| ())
        .map_err(|reason| LedgerError::UnstorableAmount { field, reason })
}

/// What the validator needs to know about an agent's existing transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerHistory {
    /// The transaction already recorded on the proposed date, if any.
    pub on_date: Option<LedgerRecord>,
    /// The agent's most recent transaction by date, if any.
    pub latest: Option<LedgerRecord>,
}

impl LedgerHistory {
    /// An agent with no transactions yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            on_date: None,
            latest: None,
        }
    }

    /// Builds the history from an agent's records for a proposed date.
    pub fn from_records<I>(date: NaiveDate, records: I) -> Self
    where
        I: IntoIterator<Item = LedgerRecord>,
    {
        let mut history = Self::empty();
        for record in records {
            if record.date == date {
                history.on_date = Some(record);
            }
            if history.latest.is_none_or(|latest| record.date > latest.date) {
                history.latest = Some(record);
            }
        }
        history
    }
}

/// How opening-balance mismatches are treated for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuityMode {
    /// Mismatches are rejected.
    Strict,
    /// Mismatches are accepted with a warning (strictness disabled by config).
    Lenient,
    /// An admin explicitly overrode continuity for a back-office correction.
    Override,
}

/// Configured continuity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuityPolicy {
    /// Reject opening-balance mismatches unless overridden.
    pub strict_opening_balance: bool,
    /// Admins may override a mismatch.
    pub allow_admin_override: bool,
}

impl Default for ContinuityPolicy {
    fn default() -> Self {
        Self {
            strict_opening_balance: true,
            allow_admin_override: true,
        }
    }
}

impl ContinuityPolicy {
    /// Resolves the mode for one submission.
    ///
    /// # Errors
    ///
    /// `OverrideNotPermitted` if an override is requested by a non-admin or
    /// while overrides are disabled.
    pub const fn mode_for(
        &self,
        is_admin: bool,
        override_requested: bool,
    ) -> Result<ContinuityMode, LedgerError> {
        if override_requested {
            if is_admin && self.allow_admin_override {
                return Ok(ContinuityMode::Override);
            }
            return Err(LedgerError::OverrideNotPermitted);
        }

        if self.strict_opening_balance {
            Ok(ContinuityMode::Strict)
        } else {
            Ok(ContinuityMode::Lenient)
        }
    }
}

/// A non-fatal continuity finding recorded alongside an accepted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContinuityWarning {
    /// The opening balance did not continue the previous closing balance.
    OpeningBalanceMismatch {
        /// The previous day's closing balance.
        expected: Decimal,
        /// The submitted opening balance.
        actual: Decimal,
    },
}

/// A transaction that passed continuity validation and may be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    /// Owning agent.
    pub agent_id: AgentId,
    /// Business date.
    pub date: NaiveDate,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Closing balance.
    pub closing_balance: Decimal,
    /// Date of the transaction this one continues, if any.
    pub predecessor_date: Option<NaiveDate>,
    /// Findings accepted under a lenient or override mode.
    pub warnings: Vec<ContinuityWarning>,
}
