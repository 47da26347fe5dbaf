//! Property-based tests for debt settlement.
//!
//! - Conservation: `debt_amount + total_paid` never changes
//! - Neither side ever goes negative
//! - Rejected payments leave the balance untouched
//! - Settled balances are exactly what storage keeps

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::DebtError;
use super::settlement::SettlementEngine;
use super::types::{DebtorBalance, PaymentStatus, SettlementKind};
use crate::money::MONEY_SCALE;

/// Strategy for original debts from 0.00 to 100,000.00.
fn debt_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for payments from -1,000.00 to 50,000.00, including zero.
fn payment() -> impl Strategy<Value = Decimal> {
    (-100_000i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for payments with five decimal places, some finer than storage.
fn fine_payment() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|units| Decimal::new(units, 5))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any sequence of payments conserves the original debt.
    #[test]
    fn prop_conservation(
        original in debt_amount(),
        payments in prop::collection::vec(payment(), 0..20),
    ) {
        let mut balance = DebtorBalance::new(original).unwrap();

        for amount in payments {
            if let Ok(settlement) = SettlementEngine::apply_payment(&balance, amount) {
                prop_assert_eq!(settlement.applied + settlement.unapplied, amount);
                prop_assert!(settlement.applied > Decimal::ZERO);
                balance = settlement.balance;
            }

            prop_assert!(balance.debt_amount >= Decimal::ZERO);
            prop_assert!(balance.total_paid >= Decimal::ZERO);
            prop_assert_eq!(balance.debt_amount + balance.total_paid, original);
        }
    }

    /// Rejected payments are reported with a reason and change nothing.
    #[test]
    fn prop_rejections_are_explained(
        debt in debt_amount(),
        paid in debt_amount(),
        amount in payment(),
    ) {
        let balance = DebtorBalance::from_stored(debt, paid).unwrap();
        let result = SettlementEngine::apply_payment(&balance, amount);

        if amount <= Decimal::ZERO {
            prop_assert_eq!(result, Err(DebtError::NonPositivePayment(amount)));
        } else if debt == Decimal::ZERO {
            prop_assert_eq!(result, Err(DebtError::AlreadyPaidOff));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Full settlements end at zero and report paid off; partial ones do not.
    #[test]
    fn prop_kind_matches_status(debt in debt_amount(), amount in payment()) {
        let balance = DebtorBalance::new(debt).unwrap();
        if let Ok(settlement) = SettlementEngine::apply_payment(&balance, amount) {
            match settlement.kind {
                SettlementKind::Full => {
                    prop_assert_eq!(settlement.balance.debt_amount, Decimal::ZERO);
                    prop_assert_eq!(settlement.balance.status(), PaymentStatus::PaidOff);
                }
                SettlementKind::Partial => {
                    prop_assert_eq!(settlement.unapplied, Decimal::ZERO);
                    prop_assert_eq!(settlement.balance.status(), PaymentStatus::Outstanding);
                }
            }
        }
    }

    /// Payments finer than the stored scale are refused, so a balance that
    /// is written and read back still conserves the original debt.
    #[test]
    fn prop_settled_amounts_survive_storage(
        original in debt_amount(),
        payments in prop::collection::vec(fine_payment(), 1..20),
    ) {
        let mut balance = DebtorBalance::new(original).unwrap();

        for amount in payments {
            match SettlementEngine::apply_payment(&balance, amount) {
                Ok(settlement) => {
                    prop_assert!(amount.normalize().scale() <= MONEY_SCALE);
                    balance = settlement.balance;
                }
                Err(DebtError::UnstorablePayment(_)) => {
                    prop_assert!(amount.normalize().scale() > MONEY_SCALE);
                }
                Err(other) => prop_assert_eq!(other, DebtError::AlreadyPaidOff),
            }

            let stored_debt = balance.debt_amount.round_dp(MONEY_SCALE);
            let stored_paid = balance.total_paid.round_dp(MONEY_SCALE);
            prop_assert_eq!(stored_debt, balance.debt_amount);
            prop_assert_eq!(stored_paid, balance.total_paid);
            prop_assert_eq!(stored_debt + stored_paid, original);
        }
    }
}
