//! The payment settlement engine.

use rust_decimal::Decimal;

use super::error::DebtError;
use super::types::{DebtorBalance, Settlement, SettlementKind};
use crate::money::check_storable;

/// Applies payments to debtor balances.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Applies a payment.
    ///
    /// A payment at or above the outstanding amount settles it in full; the
    /// excess is reported as `unapplied` and never added to `total_paid`.
    ///
    /// # Errors
    ///
    /// - `NonPositivePayment` if `payment <= 0`
    /// - `UnstorablePayment` if the amount would be rounded or overflow in storage
    /// - `AlreadyPaidOff` if nothing is outstanding
    pub fn apply_payment(
        balance: &DebtorBalance,
        payment: Decimal,
    ) -> Result<Settlement, DebtError> {
        if payment <= Decimal::ZERO {
            return Err(DebtError::NonPositivePayment(payment));
        }
        check_storable(payment).map_err(DebtError::UnstorablePayment)?;

        let outstanding = balance.debt_amount;
        if outstanding <= Decimal::ZERO {
            return Err(DebtError::AlreadyPaidOff);
        }

        if payment >= outstanding {
            return Ok(Settlement {
                balance: DebtorBalance {
                    debt_amount: Decimal::ZERO,
                    total_paid: balance.total_paid + outstanding,
                },
                applied: outstanding,
                unapplied: payment - outstanding,
                kind: SettlementKind::Full,
            });
        }

        Ok(Settlement {
            balance: DebtorBalance {
                debt_amount: outstanding - payment,
                total_paid: balance.total_paid + payment,
            },
            applied: payment,
            unapplied: Decimal::ZERO,
            kind: SettlementKind::Partial,
        })
    }
}
