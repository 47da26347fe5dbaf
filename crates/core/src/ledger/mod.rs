//! Daily balance ledgers.
//!
//! This module implements the ledger rules for an agent's balance history:
//! - one employee-recorded transaction per agent per calendar date
//! - each opening balance continues the previous closing balance
//! - dates only move forward
//! - the agent's self-reported ledger derives its own opening balance

pub mod agent_ledger;
pub mod continuity;
pub mod error;
pub mod types;

#[cfg(test)]
mod continuity_props;

pub use agent_ledger::{AgentLedgerEntry, current_balance, next_opening_balance};
pub use continuity::ContinuityValidator;
pub use error::LedgerError;
pub use types::{
    ContinuityMode, ContinuityPolicy, ContinuityWarning, LedgerHistory, LedgerRecord,
    ProposedTransaction, ValidatedTransaction,
};
