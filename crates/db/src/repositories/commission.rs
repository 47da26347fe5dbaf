//! Commission repository.

use cashbook_core::access::{AccessError, AccessibleAgents};
use cashbook_core::commission::{CommissionDraft, CommissionError as RuleError, CommissionFilter};
use cashbook_shared::types::{AgentId, CommissionId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use super::scope::{AgentLookupError, agent_uuids, authorize_agent};
use crate::entities::commissions;

/// Error types for commission operations.
#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    /// Commission not found.
    #[error("Commission not found: {0}")]
    NotFound(CommissionId),

    /// Agent not found.
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Agent is outside the caller's scope.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Commission fields rejected.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AgentLookupError> for CommissionError {
    fn from(err: AgentLookupError) -> Self {
        match err {
            AgentLookupError::Missing(id) => Self::AgentNotFound(id),
            AgentLookupError::Denied(e) => Self::Access(e),
            AgentLookupError::Database(e) => Self::Database(e),
        }
    }
}

/// Fields that may change on an existing commission.
#[derive(Debug, Clone, Copy)]
pub struct UpdateCommissionInput {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New month.
    pub month: Option<i32>,
    /// New year.
    pub year: Option<i32>,
}

/// Commission repository.
#[derive(Debug, Clone)]
pub struct CommissionRepository {
    db: DatabaseConnection,
}

impl CommissionRepository {
    /// Creates a new commission repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accessible commissions, newest period first.
    ///
    /// An `agent_id` filter outside the scope is rejected rather than
    /// silently returning nothing.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` or `Access` for a bad agent filter, or a database error.
    pub async fn list(
        &self,
        access: &AccessibleAgents,
        filter: CommissionFilter,
    ) -> Result<Vec<commissions::Model>, CommissionError> {
        let agent_ids = match filter.agent_id {
            Some(agent_id) => vec![authorize_agent(&self.db, access, agent_id).await?.into_inner()],
            None => agent_uuids(access),
        };
        if agent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            commissions::Entity::find().filter(commissions::Column::AgentId.is_in(agent_ids));
        if let Some(month) = filter.month {
            query = query.filter(commissions::Column::Month.eq(month));
        }
        if let Some(year) = filter.year {
            query = query.filter(commissions::Column::Year.eq(year));
        }

        let rows = query
            .order_by_desc(commissions::Column::Year)
            .order_by_desc(commissions::Column::Month)
            .order_by_desc(commissions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Creates a commission.
    ///
    /// # Errors
    ///
    /// `AgentNotFound`, `Access` if the agent is out of scope, or a database error.
    pub async fn create(
        &self,
        access: &AccessibleAgents,
        draft: CommissionDraft,
    ) -> Result<commissions::Model, CommissionError> {
        authorize_agent(&self.db, access, draft.agent_id).await?;

        let now = chrono::Utc::now().into();
        let row = commissions::ActiveModel {
            id: Set(Uuid::now_v7()),
            agent_id: Set(draft.agent_id.into_inner()),
            amount: Set(draft.amount),
            month: Set(draft.period.month),
            year: Set(draft.period.year),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = row.insert(&self.db).await?;
        info!(agent_id = %draft.agent_id, commission_id = %inserted.id, "Commission created");
        Ok(inserted)
    }

    /// Finds an accessible commission.
    ///
    /// # Errors
    ///
    /// `NotFound` if missing, `Access` if its agent is out of scope.
    pub async fn find(
        &self,
        access: &AccessibleAgents,
        id: CommissionId,
    ) -> Result<commissions::Model, CommissionError> {
        let row = commissions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CommissionError::NotFound(id))?;

        access.authorize(AgentId::from_uuid(row.agent_id))?;
        Ok(row)
    }

    /// Updates amount or period. The owning agent never changes.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Access`, `Rule` for invalid fields, or a database error.
    pub async fn update(
        &self,
        access: &AccessibleAgents,
        id: CommissionId,
        input: UpdateCommissionInput,
    ) -> Result<commissions::Model, CommissionError> {
        let existing = self.find(access, id).await?;

        let draft = CommissionDraft::new(
            AgentId::from_uuid(existing.agent_id),
            input.amount.unwrap_or(existing.amount),
            input.month.unwrap_or(existing.month),
            input.year.unwrap_or(existing.year),
        )?;

        let mut row: commissions::ActiveModel = existing.into();
        row.amount = Set(draft.amount);
        row.month = Set(draft.period.month);
        row.year = Set(draft.period.year);
        row.updated_at = Set(chrono::Utc::now().into());

        let updated = row.update(&self.db).await?;
        info!(commission_id = %id, "Commission updated");
        Ok(updated)
    }

    /// Deletes an accessible commission.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Access`, or a database error.
    pub async fn delete(
        &self,
        access: &AccessibleAgents,
        id: CommissionId,
    ) -> Result<(), CommissionError> {
        let existing = self.find(access, id).await?;
        commissions::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        info!(commission_id = %id, "Commission deleted");
        Ok(())
    }
}
