//! Agent self-reported ledger repository.

use cashbook_core::access::AccessibleAgents;
use cashbook_core::ledger::AgentLedgerEntry;
use cashbook_shared::types::AgentId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::scope::authorize_agent;
use super::transaction::{TransactionError, lock_agent};
use crate::entities::agent_transactions;

/// Agent transaction repository.
#[derive(Debug, Clone)]
pub struct AgentTransactionRepository {
    db: DatabaseConnection,
}

impl AgentTransactionRepository {
    /// Creates a new agent transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a self-reported closing balance.
    ///
    /// The opening balance is the previous entry's closing balance, read
    /// under the agent row lock.
    ///
    /// # Errors
    ///
    /// `Access` if out of scope, `AgentNotFound` if missing, or a database error.
    pub async fn create(
        &self,
        access: &AccessibleAgents,
        agent_id: AgentId,
        closing_balance: Decimal,
    ) -> Result<agent_transactions::Model, TransactionError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let txn = self.db.begin().await?;
        lock_agent(&txn, agent_id).await?;

        let previous: Option<Decimal> = agent_transactions::Entity::find()
            .filter(agent_transactions::Column::AgentId.eq(agent_id.into_inner()))
            .order_by_desc(agent_transactions::Column::CreatedAt)
            .order_by_desc(agent_transactions::Column::Id)
            .select_only()
            .column(agent_transactions::Column::ClosingBalance)
            .into_tuple()
            .one(&txn)
            .await?;

        let entry = AgentLedgerEntry::next(previous, closing_balance)?;
        let now = chrono::Utc::now().into();
        let row = agent_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            agent_id: Set(agent_id.into_inner()),
            opening_balance: Set(entry.opening_balance),
            closing_balance: Set(entry.closing_balance),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = row.insert(&txn).await?;
        txn.commit().await?;

        info!(
            %agent_id,
            movement = %entry.movement(),
            "Agent transaction recorded"
        );

        Ok(inserted)
    }

    /// Lists an agent's self-reported entries, newest first.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` if missing, `Access` if out of scope, or a database error.
    pub async fn list(
        &self,
        access: &AccessibleAgents,
        agent_id: AgentId,
    ) -> Result<Vec<agent_transactions::Model>, TransactionError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let rows = agent_transactions::Entity::find()
            .filter(agent_transactions::Column::AgentId.eq(agent_id.into_inner()))
            .order_by_desc(agent_transactions::Column::CreatedAt)
            .order_by_desc(agent_transactions::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
