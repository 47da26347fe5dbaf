//! Dashboard data types.

use cashbook_shared::types::{AgentId, TransactionId};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Today's balances for a single agent, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRecord {
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Closing balance.
    pub closing_balance: Decimal,
}

/// Opening and closing position for a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPosition {
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Closing balance.
    pub closing_balance: Decimal,
    /// Closing minus opening.
    pub net_change: Decimal,
    /// Whether a transaction was recorded today.
    pub has_today_transaction: bool,
}

impl DailyPosition {
    /// Position for one agent.
    ///
    /// With no transaction today the agent carries its latest closing balance
    /// (or zero) as both opening and closing.
    #[must_use]
    pub fn for_agent(today: Option<DayRecord>, latest_closing: Option<Decimal>) -> Self {
        match today {
            Some(record) => Self {
                opening_balance: record.opening_balance,
                closing_balance: record.closing_balance,
                net_change: record.closing_balance - record.opening_balance,
                has_today_transaction: true,
            },
            None => {
                let carried = latest_closing.unwrap_or(Decimal::ZERO);
                Self {
                    opening_balance: carried,
                    closing_balance: carried,
                    net_change: Decimal::ZERO,
                    has_today_transaction: false,
                }
            }
        }
    }

    /// Sums agent positions into one.
    pub fn combine<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        positions.into_iter().fold(Self::default(), |acc, p| Self {
            opening_balance: acc.opening_balance + p.opening_balance,
            closing_balance: acc.closing_balance + p.closing_balance,
            net_change: acc.net_change + p.net_change,
            has_today_transaction: acc.has_today_transaction || p.has_today_transaction,
        })
    }
}

/// A recent transaction shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentTransaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Agent ID.
    pub agent_id: AgentId,
    /// Agent name.
    pub agent_name: String,
    /// Business date.
    pub date: NaiveDate,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Closing balance.
    pub closing_balance: Decimal,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

/// Summary for one caller's accessible agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSummary {
    /// Business date the summary was computed for.
    pub as_of: NaiveDate,
    /// Accessible agents.
    pub agent_count: u64,
    /// Transactions across those agents.
    pub transaction_count: u64,
    /// Today's combined position.
    pub today: DailyPosition,
    /// Commissions attributed to the current month.
    pub month_commission_total: Decimal,
    /// Debtors with something outstanding.
    pub active_debtor_count: u64,
    /// Total outstanding debt.
    pub outstanding_debt_total: Decimal,
    /// Most recent transactions.
    pub recent_transactions: Vec<RecentTransaction>,
}

impl ScopeSummary {
    /// The summary for a caller with no accessible agents.
    #[must_use]
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            agent_count: 0,
            transaction_count: 0,
            today: DailyPosition::default(),
            month_commission_total: Decimal::ZERO,
            active_debtor_count: 0,
            outstanding_debt_total: Decimal::ZERO,
            recent_transactions: Vec::new(),
        }
    }
}

/// Commission total for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCommissionTotal {
    /// Agent ID.
    pub agent_id: AgentId,
    /// Agent name.
    pub agent_name: String,
    /// Sum of commissions.
    pub total: Decimal,
}

/// Totals across every tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSummary {
    /// All users.
    pub total_users: u64,
    /// All agents.
    pub total_agents: u64,
    /// All transactions.
    pub total_transactions: u64,
    /// Sum of all commissions.
    pub total_commissions: Decimal,
    /// Sum of all outstanding debt.
    pub total_outstanding_debt: Decimal,
    /// Commission totals per agent, largest first.
    pub commissions_per_agent: Vec<AgentCommissionTotal>,
}

/// A reporting window ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsWindow {
    /// The last seven days plus today.
    Weekly,
    /// The current calendar month.
    Monthly,
}

impl StatsWindow {
    /// First and last dates covered, inclusive.
    #[must_use]
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Weekly => (today - Days::new(7), today),
            Self::Monthly => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                (first, last)
            }
        }
    }
}

/// Activity totals over a [`StatsWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Window reported on.
    pub window: StatsWindow,
    /// First date covered.
    pub from: NaiveDate,
    /// Last date covered.
    pub to: NaiveDate,
    /// Daily transactions dated inside the window.
    pub transaction_count: u64,
    /// Commissions for the window.
    ///
    /// Weekly counts commissions recorded in the window; monthly counts those
    /// attributed to the month.
    pub commission_total: Decimal,
}

/// One agent's line in the performance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPerformance {
    /// Agent ID.
    pub agent_id: AgentId,
    /// Agent name.
    pub agent_name: String,
    /// Commissions attributed to the current month.
    pub monthly_commission: Decimal,
    /// Debtors with something outstanding.
    pub active_debtors: u64,
}

/// Per-agent commission and debtor figures with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Month reported on.
    pub as_of: NaiveDate,
    /// One line per accessible agent, by name.
    pub agents: Vec<AgentPerformance>,
    /// Number of agents.
    pub total_agents: u64,
    /// Sum of monthly commissions.
    pub total_commissions_monthly: Decimal,
    /// Sum of active debtors.
    pub total_active_debtors: u64,
}

impl PerformanceReport {
    /// Builds the report and its totals.
    #[must_use]
    pub fn from_agents(as_of: NaiveDate, mut agents: Vec<AgentPerformance>) -> Self {
        agents.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));
        Self {
            as_of,
            total_agents: u64::try_from(agents.len()).unwrap_or(u64::MAX),
            total_commissions_monthly: agents.iter().map(|a| a.monthly_commission).sum(),
            total_active_debtors: agents.iter().map(|a| a.active_debtors).sum(),
            agents,
        }
    }
}
