//! Debtor balance types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DebtError;
use crate::money::check_storable;

/// Payment status of a debtor.
///
/// `PaidOff` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Some debt remains.
    #[serde(rename = "Outstanding")]
    Outstanding,
    /// Nothing remains.
    #[serde(rename = "Paid Off")]
    PaidOff,
}

impl PaymentStatus {
    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::PaidOff => "Paid Off",
        }
    }
}

/// A debtor's outstanding and paid amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtorBalance {
    /// Remaining principal.
    pub debt_amount: Decimal,
    /// Total paid so far.
    pub total_paid: Decimal,
}

impl DebtorBalance {
    /// A new debt with nothing paid.
    ///
    /// # Errors
    ///
    /// Returns `DebtError::NegativeDebt` if `debt_amount < 0`, or
    /// `UnstorableDebt` if it would not be stored exactly.
    pub fn new(debt_amount: Decimal) -> Result<Self, DebtError> {
        if debt_amount < Decimal::ZERO {
            return Err(DebtError::NegativeDebt(debt_amount));
        }
        check_storable(debt_amount).map_err(DebtError::UnstorableDebt)?;
        Ok(Self {
            debt_amount,
            total_paid: Decimal::ZERO,
        })
    }

    /// Rebuilds a balance from stored values, checking the invariant.
    ///
    /// # Errors
    ///
    /// Returns `DebtError::InvalidBalance` if either side is negative.
    pub fn from_stored(debt_amount: Decimal, total_paid: Decimal) -> Result<Self, DebtError> {
        if debt_amount < Decimal::ZERO || total_paid < Decimal::ZERO {
            return Err(DebtError::InvalidBalance {
                debt_amount,
                total_paid,
            });
        }
        Ok(Self {
            debt_amount,
            total_paid,
        })
    }

    /// The original debt: outstanding plus paid.
    #[must_use]
    pub fn original_debt(&self) -> Decimal {
        self.debt_amount + self.total_paid
    }

    /// Current payment status.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        if self.debt_amount > Decimal::ZERO {
            PaymentStatus::Outstanding
        } else {
            PaymentStatus::PaidOff
        }
    }
}

/// Whether a payment settled the debt in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    /// The payment covered the whole outstanding amount.
    Full,
    /// Some debt remains.
    Partial,
}

/// Outcome of applying one payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Balance after the payment.
    pub balance: DebtorBalance,
    /// Portion of the payment applied to the debt.
    pub applied: Decimal,
    /// Portion exceeding the outstanding amount. Not recorded on the debtor.
    pub unapplied: Decimal,
    /// Full or partial settlement.
    pub kind: SettlementKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(
            DebtorBalance::new(dec!(-1)),
            Err(DebtError::NegativeDebt(dec!(-1)))
        );
        let zero = DebtorBalance::new(Decimal::ZERO).unwrap();
        assert_eq!(zero.status(), PaymentStatus::PaidOff);
    }

    #[test]
    fn test_new_rejects_unstorable_amounts() {
        assert!(matches!(
            DebtorBalance::new(dec!(10.00001)),
            Err(DebtError::UnstorableDebt(_))
        ));
        assert!(matches!(
            DebtorBalance::new(dec!(1000000000000000)),
            Err(DebtError::UnstorableDebt(_))
        ));
        assert_eq!(
            DebtError::UnstorableDebt(crate::money::MoneyError::TooPrecise(dec!(10.00001)))
                .error_code(),
            "INVALID_DEBT_AMOUNT"
        );
    }

    #[test]
    fn test_original_debt_and_status() {
        let balance = DebtorBalance::from_stored(dec!(300.00), dec!(200.00)).unwrap();
        assert_eq!(balance.original_debt(), dec!(500.00));
        assert_eq!(balance.status(), PaymentStatus::Outstanding);
        assert_eq!(balance.status().label(), "Outstanding");
    }

    #[test]
    fn test_from_stored_rejects_negative_paid() {
        assert!(DebtorBalance::from_stored(dec!(10), dec!(-1)).is_err());
    }

    #[test]
    fn test_status_serializes_as_label() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::PaidOff).unwrap(),
            serde_json::json!("Paid Off")
        );
    }
}
