//! Debtor payment settlement.
//!
//! A debtor's balance is a pair `(debt_amount, total_paid)` where
//! `debt_amount` is what remains outstanding. Every accepted payment keeps
//! `debt_amount + total_paid` equal to the original debt and neither side
//! ever goes negative.

pub mod error;
pub mod settlement;
pub mod types;

#[cfg(test)]
mod settlement_props;

pub use error::DebtError;
pub use settlement::SettlementEngine;
pub use types::{DebtorBalance, PaymentStatus, Settlement, SettlementKind};
