//! Daily transaction repository.
//!
//! Creation runs inside one database transaction that:
//! 1. locks the agent row (`SELECT ... FOR UPDATE`)
//! 2. loads the agent's same-day and latest transactions
//! 3. validates continuity
//! 4. inserts the row
//!
//! The agent lock serializes writers for one agent. `UNIQUE (agent_id, date)`
//! still backs the duplicate check, and a violation surfaces as
//! [`LedgerError::DuplicateDate`].

use cashbook_core::access::{AccessError, AccessibleAgents};
use cashbook_core::ledger::{
    ContinuityMode, ContinuityValidator, ContinuityWarning, LedgerError, LedgerHistory,
    LedgerRecord, ProposedTransaction,
};
use cashbook_shared::types::{AgentId, PageRequest, PageResponse, UserId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::scope::{AgentLookupError, agent_uuids, authorize_agent};
use crate::entities::{agents, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Agent not found.
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Agent is outside the caller's scope.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Continuity rule rejected the transaction.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AgentLookupError> for TransactionError {
    fn from(err: AgentLookupError) -> Self {
        match err {
            AgentLookupError::Missing(id) => Self::AgentNotFound(id),
            AgentLookupError::Denied(e) => Self::Access(e),
            AgentLookupError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for recording a daily transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Agent ID.
    pub agent_id: AgentId,
    /// User recording the transaction.
    pub creator_id: UserId,
    /// Business date.
    pub date: NaiveDate,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Closing balance.
    pub closing_balance: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
}

/// A persisted transaction and any continuity warnings accepted with it.
#[derive(Debug, Clone)]
pub struct RecordedTransaction {
    /// The inserted row.
    pub transaction: transactions::Model,
    /// Warnings accepted under a lenient or override mode.
    pub warnings: Vec<ContinuityWarning>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and records a daily transaction atomically.
    ///
    /// Nothing is written if any check fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The agent is out of scope or missing
    /// - Continuity validation fails
    /// - Database operation fails
    pub async fn create(
        &self,
        access: &AccessibleAgents,
        input: CreateTransactionInput,
        mode: ContinuityMode,
    ) -> Result<RecordedTransaction, TransactionError> {
        authorize_agent(&self.db, access, input.agent_id).await?;

        let txn = self.db.begin().await?;

        lock_agent(&txn, input.agent_id).await?;
        let history = load_history(&txn, input.agent_id, input.date).await?;

        let proposed = ProposedTransaction {
            agent_id: input.agent_id,
            date: input.date,
            opening_balance: input.opening_balance,
            closing_balance: input.closing_balance,
        };
        let validated = ContinuityValidator::validate_and_prepare(&proposed, &history, mode)?;

        for warning in &validated.warnings {
            warn!(
                agent_id = %input.agent_id,
                creator_id = %input.creator_id,
                date = %input.date,
                ?mode,
                ?warning,
                "Continuity warning accepted"
            );
        }

        let now = Utc::now().into();
        let row = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            agent_id: Set(validated.agent_id.into_inner()),
            creator_id: Set(Some(input.creator_id.into_inner())),
            date: Set(validated.date),
            opening_balance: Set(validated.opening_balance),
            closing_balance: Set(validated.closing_balance),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let transaction = row
            .insert(&txn)
            .await
            .map_err(|e| duplicate_date_or(e, validated.date))?;

        txn.commit().await?;

        info!(
            agent_id = %input.agent_id,
            transaction_id = %transaction.id,
            date = %transaction.date,
            "Transaction recorded"
        );

        Ok(RecordedTransaction {
            transaction,
            warnings: validated.warnings,
        })
    }

    /// Lists an agent's transactions, newest date first.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` if missing, `Access` if the agent is out of scope.
    pub async fn list(
        &self,
        access: &AccessibleAgents,
        agent_id: AgentId,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let rows = transactions::Entity::find()
            .filter(transactions::Column::AgentId.eq(agent_id.into_inner()))
            .order_by_desc(transactions::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// One page of an agent's transactions, newest date first.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` if missing, `Access` if the agent is out of scope.
    pub async fn list_page(
        &self,
        access: &AccessibleAgents,
        agent_id: AgentId,
        page: &PageRequest,
    ) -> Result<PageResponse<transactions::Model>, TransactionError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let query = transactions::Entity::find()
            .filter(transactions::Column::AgentId.eq(agent_id.into_inner()));
        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(transactions::Column::Date)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let per_page = u32::try_from(page.limit()).unwrap_or(page.per_page);
        Ok(PageResponse::new(rows, page.page.max(1), per_page, total))
    }

    /// Lists transactions recorded by `creator`, oldest first.
    ///
    /// Only rows of accessible agents are returned, so a user moved to
    /// another tenant no longer sees what they recorded there.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_creator(
        &self,
        access: &AccessibleAgents,
        creator: UserId,
        page: &PageRequest,
    ) -> Result<PageResponse<transactions::Model>, TransactionError> {
        let per_page = u32::try_from(page.limit()).unwrap_or(page.per_page);
        if access.is_empty() {
            return Ok(PageResponse::new(Vec::new(), page.page.max(1), per_page, 0));
        }

        let query = transactions::Entity::find()
            .filter(transactions::Column::CreatorId.eq(creator.into_inner()))
            .filter(transactions::Column::AgentId.is_in(agent_uuids(access)));
        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page.page.max(1), per_page, total))
    }

    /// Returns an agent's most recent transaction by date.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` if missing, `Access` if the agent is out of scope.
    pub async fn latest(
        &self,
        access: &AccessibleAgents,
        agent_id: AgentId,
    ) -> Result<Option<transactions::Model>, TransactionError> {
        authorize_agent(&self.db, access, agent_id).await?;

        let row = transactions::Entity::find()
            .filter(transactions::Column::AgentId.eq(agent_id.into_inner()))
            .order_by_desc(transactions::Column::Date)
            .one(&self.db)
            .await?;

        Ok(row)
    }
}

/// Locks the agent row for the rest of the transaction.
pub(crate) async fn lock_agent(
    txn: &DatabaseTransaction,
    agent_id: AgentId,
) -> Result<agents::Model, TransactionError> {
    agents::Entity::find_by_id(agent_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(TransactionError::AgentNotFound(agent_id))
}

async fn load_history(
    txn: &DatabaseTransaction,
    agent_id: AgentId,
    date: NaiveDate,
) -> Result<LedgerHistory, DbErr> {
    let on_date = transactions::Entity::find()
        .filter(transactions::Column::AgentId.eq(agent_id.into_inner()))
        .filter(transactions::Column::Date.eq(date))
        .one(txn)
        .await?;

    let latest = transactions::Entity::find()
        .filter(transactions::Column::AgentId.eq(agent_id.into_inner()))
        .order_by_desc(transactions::Column::Date)
        .one(txn)
        .await?;

    Ok(LedgerHistory {
        on_date: on_date.as_ref().map(to_record),
        latest: latest.as_ref().map(to_record),
    })
}

fn to_record(model: &transactions::Model) -> LedgerRecord {
    LedgerRecord {
        date: model.date,
        opening_balance: model.opening_balance,
        closing_balance: model.closing_balance,
    }
}

/// Maps a unique violation on `(agent_id, date)` to `DuplicateDate`.
fn duplicate_date_or(err: DbErr, date: NaiveDate) -> TransactionError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!(%date, "Duplicate date caught by unique constraint");
            TransactionError::Ledger(LedgerError::DuplicateDate { date })
        }
        _ => TransactionError::Database(err),
    }
}
