//! Agent repository.

use cashbook_core::access::{AccessError, AccessibleAgents};
use cashbook_core::agent::AgentProfile;
use cashbook_core::ledger::current_balance;
use cashbook_shared::types::{AgentId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use uuid::Uuid;

use super::scope::{AgentLookupError, agent_uuids, authorize_agent};
use crate::entities::{agent_transactions, agents};

/// Error types for agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent not found.
    #[error("Agent not found: {0}")]
    NotFound(AgentId),

    /// Agent is outside the caller's scope.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AgentLookupError> for AgentError {
    fn from(err: AgentLookupError) -> Self {
        match err {
            AgentLookupError::Missing(id) => Self::NotFound(id),
            AgentLookupError::Denied(e) => Self::Access(e),
            AgentLookupError::Database(e) => Self::Database(e),
        }
    }
}

/// An agent with its current self-reported balance.
#[derive(Debug, Clone, Serialize)]
pub struct AgentWithBalance {
    /// The agent row.
    #[serde(flatten)]
    pub agent: agents::Model,
    /// Closing balance of the latest self-reported entry, or zero.
    pub current_balance: Decimal,
}

/// Agent repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AgentRepository {
    db: DatabaseConnection,
}

impl AgentRepository {
    /// Creates a new agent repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accessible agents by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, access: &AccessibleAgents) -> Result<Vec<agents::Model>, DbErr> {
        if access.is_empty() {
            return Ok(Vec::new());
        }

        agents::Entity::find()
            .filter(agents::Column::Id.is_in(agent_uuids(access)))
            .order_by_asc(agents::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates an agent owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, owner: UserId, profile: AgentProfile) -> Result<agents::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let agent = agents::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(owner.into_inner()),
            name: Set(profile.name),
            type_of_agent: Set(profile.type_of_agent),
            phone: Set(profile.phone),
            email: Set(profile.email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        agent.insert(&self.db).await
    }

    /// Finds an accessible agent with its current balance.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such agent exists, `Access` if it is out of scope.
    pub async fn find(
        &self,
        access: &AccessibleAgents,
        agent_id: AgentId,
    ) -> Result<AgentWithBalance, AgentError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let agent = agents::Entity::find_by_id(agent_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AgentError::NotFound(agent_id))?;

        let latest_closing: Option<Decimal> = agent_transactions::Entity::find()
            .filter(agent_transactions::Column::AgentId.eq(agent_id.into_inner()))
            .order_by_desc(agent_transactions::Column::CreatedAt)
            .order_by_desc(agent_transactions::Column::Id)
            .select_only()
            .column(agent_transactions::Column::ClosingBalance)
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(AgentWithBalance {
            agent,
            current_balance: current_balance(latest_closing),
        })
    }

    /// Deletes an accessible agent and everything it owns.
    ///
    /// Transactions, agent transactions, commissions and debtors go with it
    /// through `ON DELETE CASCADE`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such agent exists, `Access` if it is out of scope.
    pub async fn delete(&self, access: &AccessibleAgents, agent_id: AgentId) -> Result<(), AgentError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let result = agents::Entity::delete_by_id(agent_id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AgentError::NotFound(agent_id));
        }
        Ok(())
    }
}
