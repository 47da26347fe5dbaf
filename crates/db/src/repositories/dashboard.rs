//! Dashboard repository for summary queries.
//!
//! Scoped summaries only ever read rows of the caller's accessible agents.
//! The global summary requires a [`GlobalView`], held only by configured operators.

use std::collections::HashMap;

use cashbook_core::access::{AccessibleAgents, GlobalView};
use cashbook_core::dashboard::{
    AgentCommissionTotal, AgentPerformance, DailyPosition, DayRecord, GlobalSummary,
    PerformanceReport, PeriodStats, RecentTransaction, ScopeSummary, StatsWindow,
};
use cashbook_shared::types::{AgentId, TransactionId};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::scope::agent_uuids;
use crate::entities::{agents, commissions, debtors, transactions, users};

/// Number of recent transactions on the scoped dashboard.
const RECENT_LIMIT: u64 = 5;

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Summary of the caller's accessible agents as of `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn scoped_summary(
        &self,
        access: &AccessibleAgents,
        today: NaiveDate,
    ) -> Result<ScopeSummary, DbErr> {
        if access.is_empty() {
            return Ok(ScopeSummary::empty(today));
        }
        let ids = agent_uuids(access);

        let agent_rows = agents::Entity::find()
            .filter(agents::Column::Id.is_in(ids.clone()))
            .all(&self.db)
            .await?;
        let names: HashMap<Uuid, String> =
            agent_rows.into_iter().map(|a| (a.id, a.name)).collect();

        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::AgentId.is_in(ids.clone()))
            .count(&self.db)
            .await?;

        let today_position = self.daily_position(&ids, today).await?;

        let month_commission_total: Decimal = commissions::Entity::find()
            .filter(commissions::Column::AgentId.is_in(ids.clone()))
            .filter(commissions::Column::Year.eq(today.year()))
            .filter(commissions::Column::Month.eq(month_of(today)))
            .select_only()
            .column(commissions::Column::Amount)
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?
            .into_iter()
            .sum();

        let outstanding: Vec<Decimal> = debtors::Entity::find()
            .filter(debtors::Column::AgentId.is_in(ids.clone()))
            .filter(debtors::Column::DebtAmount.gt(Decimal::ZERO))
            .select_only()
            .column(debtors::Column::DebtAmount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let recent_transactions = transactions::Entity::find()
            .filter(transactions::Column::AgentId.is_in(ids))
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| RecentTransaction {
                id: TransactionId::from_uuid(t.id),
                agent_id: AgentId::from_uuid(t.agent_id),
                agent_name: names.get(&t.agent_id).cloned().unwrap_or_default(),
                date: t.date,
                opening_balance: t.opening_balance,
                closing_balance: t.closing_balance,
                created_at: t.created_at.into(),
            })
            .collect();

        Ok(ScopeSummary {
            as_of: today,
            agent_count: count_of(names.len()),
            transaction_count,
            today: today_position,
            month_commission_total,
            active_debtor_count: count_of(outstanding.len()),
            outstanding_debt_total: outstanding.into_iter().sum(),
            recent_transactions,
        })
    }

    /// Combined position across agents for `today`.
    ///
    /// Each agent contributes today's transaction, or else its latest
    /// closing balance carried forward.
    async fn daily_position(&self, ids: &[Uuid], today: NaiveDate) -> Result<DailyPosition, DbErr> {
        let rows: Vec<(Uuid, NaiveDate, Decimal, Decimal)> = transactions::Entity::find()
            .filter(transactions::Column::AgentId.is_in(ids.to_vec()))
            .filter(transactions::Column::Date.lte(today))
            .select_only()
            .column(transactions::Column::AgentId)
            .column(transactions::Column::Date)
            .column(transactions::Column::OpeningBalance)
            .column(transactions::Column::ClosingBalance)
            .order_by_asc(transactions::Column::Date)
            .into_tuple()
            .all(&self.db)
            .await?;

        // Ascending by date, so the last row per agent wins.
        let mut latest: HashMap<Uuid, (NaiveDate, Decimal, Decimal)> = HashMap::new();
        for (agent_id, date, opening, closing) in rows {
            latest.insert(agent_id, (date, opening, closing));
        }

        Ok(DailyPosition::combine(ids.iter().map(|id| {
            match latest.get(id) {
                Some((date, opening, closing)) if *date == today => DailyPosition::for_agent(
                    Some(DayRecord {
                        opening_balance: *opening,
                        closing_balance: *closing,
                    }),
                    None,
                ),
                Some((_, _, closing)) => DailyPosition::for_agent(None, Some(*closing)),
                None => DailyPosition::for_agent(None, None),
            }
        })))
    }

    /// Transaction count and commission total over a window ending `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn period_stats(
        &self,
        access: &AccessibleAgents,
        window: StatsWindow,
        today: NaiveDate,
    ) -> Result<PeriodStats, DbErr> {
        let (from, to) = window.bounds(today);
        let mut stats = PeriodStats {
            window,
            from,
            to,
            transaction_count: 0,
            commission_total: Decimal::ZERO,
        };
        if access.is_empty() {
            return Ok(stats);
        }
        let ids = agent_uuids(access);

        stats.transaction_count = transactions::Entity::find()
            .filter(transactions::Column::AgentId.is_in(ids.clone()))
            .filter(transactions::Column::Date.between(from, to))
            .count(&self.db)
            .await?;

        let commissions_in_window = commissions::Entity::find()
            .filter(commissions::Column::AgentId.is_in(ids));
        let commissions_in_window = match window {
            StatsWindow::Weekly => commissions_in_window
                .filter(commissions::Column::CreatedAt.gte(start_of(from)))
                .filter(commissions::Column::CreatedAt.lt(start_of(to + Days::new(1)))),
            StatsWindow::Monthly => commissions_in_window
                .filter(commissions::Column::Year.eq(today.year()))
                .filter(commissions::Column::Month.eq(month_of(today))),
        };

        stats.commission_total = commissions_in_window
            .select_only()
            .column(commissions::Column::Amount)
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?
            .into_iter()
            .sum();

        Ok(stats)
    }

    /// Monthly commission and active debtors per accessible agent.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn agent_performance(
        &self,
        access: &AccessibleAgents,
        today: NaiveDate,
    ) -> Result<PerformanceReport, DbErr> {
        if access.is_empty() {
            return Ok(PerformanceReport::from_agents(today, Vec::new()));
        }
        let ids = agent_uuids(access);

        let agent_rows: Vec<(Uuid, String)> = agents::Entity::find()
            .filter(agents::Column::Id.is_in(ids.clone()))
            .select_only()
            .column(agents::Column::Id)
            .column(agents::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        let commission_rows: Vec<(Uuid, Decimal)> = commissions::Entity::find()
            .filter(commissions::Column::AgentId.is_in(ids.clone()))
            .filter(commissions::Column::Year.eq(today.year()))
            .filter(commissions::Column::Month.eq(month_of(today)))
            .select_only()
            .column(commissions::Column::AgentId)
            .column(commissions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut monthly: HashMap<Uuid, Decimal> = HashMap::new();
        for (agent_id, amount) in commission_rows {
            *monthly.entry(agent_id).or_default() += amount;
        }

        let debtor_rows: Vec<Uuid> = debtors::Entity::find()
            .filter(debtors::Column::AgentId.is_in(ids))
            .filter(debtors::Column::DebtAmount.gt(Decimal::ZERO))
            .select_only()
            .column(debtors::Column::AgentId)
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut active: HashMap<Uuid, u64> = HashMap::new();
        for agent_id in debtor_rows {
            *active.entry(agent_id).or_default() += 1;
        }

        let lines = agent_rows
            .into_iter()
            .map(|(id, name)| AgentPerformance {
                agent_id: AgentId::from_uuid(id),
                agent_name: name,
                monthly_commission: monthly.get(&id).copied().unwrap_or_default(),
                active_debtors: active.get(&id).copied().unwrap_or_default(),
            })
            .collect();

        Ok(PerformanceReport::from_agents(today, lines))
    }

    /// Totals across every tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn global_summary(&self, view: &GlobalView) -> Result<GlobalSummary, DbErr> {
        tracing::info!(requested_by = %view.requested_by(), "Global dashboard computed");

        let total_users = users::Entity::find().count(&self.db).await?;
        let total_transactions = transactions::Entity::find().count(&self.db).await?;

        let agent_rows = agents::Entity::find().all(&self.db).await?;
        let total_agents = count_of(agent_rows.len());

        let commission_rows: Vec<(Uuid, Decimal)> = commissions::Entity::find()
            .select_only()
            .column(commissions::Column::AgentId)
            .column(commissions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut per_agent: HashMap<Uuid, Decimal> = HashMap::new();
        let mut total_commissions = Decimal::ZERO;
        for (agent_id, amount) in commission_rows {
            *per_agent.entry(agent_id).or_default() += amount;
            total_commissions += amount;
        }

        let mut commissions_per_agent: Vec<AgentCommissionTotal> = agent_rows
            .into_iter()
            .filter_map(|agent| {
                per_agent.get(&agent.id).map(|total| AgentCommissionTotal {
                    agent_id: AgentId::from_uuid(agent.id),
                    agent_name: agent.name,
                    total: *total,
                })
            })
            .collect();
        commissions_per_agent.sort_by(|a, b| b.total.cmp(&a.total));

        let total_outstanding_debt: Decimal = debtors::Entity::find()
            .filter(debtors::Column::DebtAmount.gt(Decimal::ZERO))
            .select_only()
            .column(debtors::Column::DebtAmount)
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?
            .into_iter()
            .sum();

        Ok(GlobalSummary {
            total_users,
            total_agents,
            total_transactions,
            total_commissions,
            total_outstanding_debt,
            commissions_per_agent,
        })
    }
}

fn month_of(date: NaiveDate) -> i32 {
    i32::try_from(date.month()).unwrap_or(1)
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn count_of(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
