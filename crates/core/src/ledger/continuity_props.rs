//! Property-based tests for the continuity validator.
//!
//! - Accepted transactions under strict mode always form an unbroken chain
//! - A second transaction on the same date is always rejected
//! - Nothing earlier than the latest date is ever accepted
//! - Accepted balances are exactly what storage keeps

use cashbook_shared::types::AgentId;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::continuity::ContinuityValidator;
use super::error::LedgerError;
use super::types::{ContinuityMode, LedgerHistory, LedgerRecord, ProposedTransaction};

/// Strategy to generate balances from -10,000.00 to 10,000.00.
fn balance() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// One submission attempt: a day offset from the start date, whether to
/// continue the chain honestly, and the balances to use otherwise.
fn attempt() -> impl Strategy<Value = (u64, bool, Decimal, Decimal)> {
    (0u64..30, any::<bool>(), balance(), balance())
}

/// Balances with five decimal places, some finer than storage keeps.
fn fine_balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|units| Decimal::new(units, 5))
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Replays attempts through the validator, persisting whatever it accepts.
fn replay(attempts: &[(u64, bool, Decimal, Decimal)], mode: ContinuityMode) -> Vec<LedgerRecord> {
    let agent_id = AgentId::new();
    let mut records: Vec<LedgerRecord> = Vec::new();

    for (offset, honest, opening, closing) in attempts {
        let date = start() + Days::new(*offset);
        let history = LedgerHistory::from_records(date, records.iter().copied());
        let opening = match (*honest, history.latest) {
            (true, Some(latest)) => latest.closing_balance,
            _ => *opening,
        };

        let proposed = ProposedTransaction {
            agent_id,
            date,
            opening_balance: opening,
            closing_balance: *closing,
        };

        if let Ok(validated) = ContinuityValidator::validate_and_prepare(&proposed, &history, mode) {
            records.push(LedgerRecord {
                date: validated.date,
                opening_balance: validated.opening_balance,
                closing_balance: validated.closing_balance,
            });
        }
    }

    records
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Under strict mode every accepted transaction continues its predecessor.
    #[test]
    fn prop_strict_mode_preserves_chain(attempts in prop::collection::vec(attempt(), 1..40)) {
        let mut records = replay(&attempts, ContinuityMode::Strict);
        records.sort_by_key(|r| r.date);

        for pair in records.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
            prop_assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    /// At most one transaction per date survives, in every mode.
    #[test]
    fn prop_one_transaction_per_date(
        attempts in prop::collection::vec(attempt(), 1..40),
        lenient in any::<bool>(),
    ) {
        let mode = if lenient { ContinuityMode::Override } else { ContinuityMode::Strict };
        let records = replay(&attempts, mode);

        let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        let total = dates.len();
        dates.sort();
        dates.dedup();
        prop_assert_eq!(dates.len(), total);
    }

    /// Accepted dates are strictly increasing in submission order.
    #[test]
    fn prop_dates_monotonic(attempts in prop::collection::vec(attempt(), 1..40)) {
        let records = replay(&attempts, ContinuityMode::Override);
        for pair in records.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
    }

    /// Resubmitting an existing date is rejected as a duplicate regardless of balances.
    #[test]
    fn prop_duplicate_always_rejected(
        closing in balance(),
        opening in balance(),
        offset in 0u64..30,
    ) {
        let date = start() + Days::new(offset);
        let existing = LedgerRecord { date, opening_balance: Decimal::ZERO, closing_balance: closing };
        let history = LedgerHistory::from_records(date, [existing]);
        let proposed = ProposedTransaction {
            agent_id: AgentId::new(),
            date,
            opening_balance: opening,
            closing_balance: closing,
        };

        let result = ContinuityValidator::validate_and_prepare(&proposed, &history, ContinuityMode::Override);
        prop_assert_eq!(result, Err(LedgerError::DuplicateDate { date }));
    }

    /// A closing balance that survives validation reads back unchanged, so an
    /// honest client continuing from it is never reported as a mismatch.
    #[test]
    fn prop_stored_closing_continues_chain(closing in fine_balance(), next in balance()) {
        let agent_id = AgentId::new();
        let first = ProposedTransaction {
            agent_id,
            date: start(),
            opening_balance: Decimal::ZERO,
            closing_balance: closing,
        };

        match ContinuityValidator::validate_and_prepare(&first, &LedgerHistory::empty(), ContinuityMode::Strict) {
            Ok(validated) => {
                let stored = LedgerRecord {
                    date: validated.date,
                    opening_balance: validated.opening_balance.round_dp(4),
                    closing_balance: validated.closing_balance.round_dp(4),
                };
                let date = start() + Days::new(1);
                let second = ProposedTransaction {
                    agent_id,
                    date,
                    opening_balance: closing,
                    closing_balance: next,
                };
                let history = LedgerHistory::from_records(date, [stored]);
                prop_assert!(
                    ContinuityValidator::validate_and_prepare(&second, &history, ContinuityMode::Strict).is_ok()
                );
            }
            Err(err) => {
                prop_assert!(closing.normalize().scale() > 4);
                prop_assert_eq!(err.error_code(), "INVALID_AMOUNT");
            }
        }
    }
}
