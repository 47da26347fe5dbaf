//! The agent's self-reported balance ledger.
//!
//! Entries only carry a closing balance from the caller. The opening balance
//! is always the previous entry's closing balance, or zero for the first.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::check_balance;

/// A prepared self-reported balance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentLedgerEntry {
    /// Derived opening balance.
    pub opening_balance: Decimal,
    /// Reported closing balance.
    pub closing_balance: Decimal,
}

impl AgentLedgerEntry {
    /// Prepares the next entry after `previous_closing`.
    ///
    /// # Errors
    ///
    /// `UnstorableAmount` if `closing_balance` would not be stored exactly.
    pub fn next(
        previous_closing: Option<Decimal>,
        closing_balance: Decimal,
    ) -> Result<Self, LedgerError> {
        check_balance("closing_balance", closing_balance)?;
        Ok(Self {
            opening_balance: next_opening_balance(previous_closing),
            closing_balance,
        })
    }

    /// Net movement over the entry.
    #[must_use]
    pub fn movement(&self) -> Decimal {
        self.closing_balance - self.opening_balance
    }
}

/// Opening balance for the next entry.
#[must_use]
pub fn next_opening_balance(previous_closing: Option<Decimal>) -> Decimal {
    previous_closing.unwrap_or(Decimal::ZERO)
}

/// An agent's current balance given its latest self-reported closing balance.
#[must_use]
pub fn current_balance(latest_closing: Option<Decimal>) -> Decimal {
    latest_closing.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_entry_opens_at_zero() {
        let entry = AgentLedgerEntry::next(None, dec!(250.00)).unwrap();
        assert_eq!(entry.opening_balance, Decimal::ZERO);
        assert_eq!(entry.movement(), dec!(250.00));
    }

    #[test]
    fn test_entries_chain() {
        let first = AgentLedgerEntry::next(None, dec!(250.00)).unwrap();
        let second = AgentLedgerEntry::next(Some(first.closing_balance), dec!(180.00)).unwrap();
        assert_eq!(second.opening_balance, dec!(250.00));
        assert_eq!(second.movement(), dec!(-70.00));
    }

    #[test]
    fn test_sub_scale_closing_rejected() {
        let result = AgentLedgerEntry::next(Some(dec!(10)), dec!(12.00001));
        assert!(matches!(
            result,
            Err(LedgerError::UnstorableAmount { field: "closing_balance", .. })
        ));
    }

    #[test]
    fn test_current_balance_defaults_to_zero() {
        assert_eq!(current_balance(None), Decimal::ZERO);
        assert_eq!(current_balance(Some(dec!(12.34))), dec!(12.34));
    }
}
