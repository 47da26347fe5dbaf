//! Storable money amounts.
//!
//! Every money column is `NUMERIC(19, 4)`. An amount is only accepted when
//! it is stored exactly as submitted, so rules that compare or sum amounts
//! see the same value the database keeps.

use rust_decimal::Decimal;
use thiserror::Error;

/// Decimal places kept by money columns.
pub const MONEY_SCALE: u32 = 4;

/// Largest magnitude a money column holds: 15 integer digits, 4 fractional.
#[must_use]
pub fn max_money() -> Decimal {
    Decimal::from_i128_with_scale(9_999_999_999_999_999_999, MONEY_SCALE)
}

/// Reasons an amount cannot be stored exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// More than four significant decimal places.
    #[error("{0} has more than {MONEY_SCALE} decimal places")]
    TooPrecise(Decimal),

    /// Outside the storable range.
    #[error("{0} is outside the supported range")]
    OutOfRange(Decimal),
}

/// Checks that `amount` round-trips through storage unchanged.
///
/// Trailing zeros do not count against the scale: `1.50000` is accepted.
///
/// # Errors
///
/// `TooPrecise` or `OutOfRange`.
pub fn check_storable(amount: Decimal) -> Result<Decimal, MoneyError> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(MoneyError::TooPrecise(amount));
    }
    if amount.abs() > max_money() {
        return Err(MoneyError::OutOfRange(amount));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(150.0001))]
    #[case(dec!(-42.5))]
    #[case(dec!(1.50000))]
    #[case(dec!(999999999999999.9999))]
    fn test_storable_amounts(#[case] amount: Decimal) {
        assert_eq!(check_storable(amount), Ok(amount));
    }

    #[test]
    fn test_sub_scale_amount_rejected() {
        assert_eq!(
            check_storable(dec!(150.00004)),
            Err(MoneyError::TooPrecise(dec!(150.00004)))
        );
        assert_eq!(
            check_storable(dec!(0.00005)),
            Err(MoneyError::TooPrecise(dec!(0.00005)))
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            check_storable(dec!(1000000000000000)),
            Err(MoneyError::OutOfRange(dec!(1000000000000000)))
        );
        assert!(check_storable(dec!(-1000000000000000)).is_err());
    }
}
