//! Continuity validation for daily balance transactions.
//!
//! Checks run in a fixed order and the first failure wins:
//! 0. both balances are storable without rounding
//! 1. duplicate date
//! 2. date not after the agent's latest transaction
//! 3. opening balance against the predecessor's closing balance
//!
//! Only the third check depends on [`ContinuityMode`]. Duplicates and
//! back-dated submissions are rejected in every mode.

use super::error::LedgerError;
use super::types::{
    ContinuityMode, ContinuityWarning, LedgerHistory, ProposedTransaction, ValidatedTransaction,
};

/// Validates proposed transactions against an agent's history.
///
/// Pure: callers load [`LedgerHistory`] inside the same database transaction
/// that will persist the result, while holding the agent's row lock.
pub struct ContinuityValidator;

impl ContinuityValidator {
    /// Validates a proposed transaction and prepares it for persistence.
    ///
    /// # Errors
    ///
    /// - `UnstorableAmount` if a balance would be rounded or overflow in storage
    /// - `DuplicateDate` if the agent already has a transaction on that date
    /// - `NonSequentialDate` if the agent's latest transaction is later
    /// - `OpeningBalanceMismatch` under [`ContinuityMode::Strict`]
    pub fn validate_and_prepare(
        proposed: &ProposedTransaction,
        history: &LedgerHistory,
        mode: ContinuityMode,
    ) -> Result<ValidatedTransaction, LedgerError> {
        proposed.check_amounts()?;

        if history.on_date.is_some() {
            return Err(LedgerError::DuplicateDate {
                date: proposed.date,
            });
        }

        let mut warnings = Vec::new();

        let predecessor = match history.latest {
            Some(latest) if latest.date == proposed.date => {
                return Err(LedgerError::DuplicateDate {
                    date: proposed.date,
                });
            }
            Some(latest) if latest.date > proposed.date => {
                return Err(LedgerError::NonSequentialDate {
                    date: proposed.date,
                    latest: latest.date,
                });
            }
            other => other,
        };

        if let Some(previous) = predecessor
            && proposed.opening_balance != previous.closing_balance
        {
            match mode {
                ContinuityMode::Strict => {
                    return Err(LedgerError::OpeningBalanceMismatch {
                        expected: previous.closing_balance,
                        actual: proposed.opening_balance,
                    });
                }
                ContinuityMode::Lenient | ContinuityMode::Override => {
                    warnings.push(ContinuityWarning::OpeningBalanceMismatch {
                        expected: previous.closing_balance,
                        actual: proposed.opening_balance,
                    });
                }
            }
        }

        Ok(ValidatedTransaction {
            agent_id: proposed.agent_id,
            date: proposed.date,
            opening_balance: proposed.opening_balance,
            closing_balance: proposed.closing_balance,
            predecessor_date: predecessor.map(|p| p.date),
            warnings,
        })
    }
}
