//! Debtor repository.
//!
//! Payments lock the debtor row and then write with a compare-and-swap on
//! `version`, so two payments can never both apply against the same balance.

use cashbook_core::access::{AccessError, AccessibleAgents};
use cashbook_core::debt::{DebtError, DebtorBalance, PaymentStatus, Settlement, SettlementEngine};
use cashbook_shared::types::{AgentId, DebtorId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::scope::{AgentLookupError, agent_uuids, authorize_agent};
use crate::entities::debtors;

/// Error types for debtor operations.
#[derive(Debug, thiserror::Error)]
pub enum DebtorError {
    /// Debtor not found.
    #[error("Debtor not found: {0}")]
    NotFound(DebtorId),

    /// Agent not found.
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Agent is outside the caller's scope.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Settlement rule rejected the operation.
    #[error(transparent)]
    Debt(#[from] DebtError),

    /// The debtor changed between read and write.
    #[error("Debtor {0} was modified concurrently, please retry")]
    ConcurrentModification(DebtorId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AgentLookupError> for DebtorError {
    fn from(err: AgentLookupError) -> Self {
        match err {
            AgentLookupError::Missing(id) => Self::AgentNotFound(id),
            AgentLookupError::Denied(e) => Self::Access(e),
            AgentLookupError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for creating a debtor.
#[derive(Debug, Clone)]
pub struct CreateDebtorInput {
    /// Owning agent.
    pub agent_id: AgentId,
    /// Debtor name.
    pub name: String,
    /// Amount owed.
    pub debt_amount: Decimal,
    /// Contact phone.
    pub phone: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// A debtor after a payment, with the settlement details.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// Updated row.
    pub debtor: debtors::Model,
    /// Settlement computed for the payment.
    pub settlement: Settlement,
}

/// Per-debtor line of the overview.
#[derive(Debug, Clone, Serialize)]
pub struct DebtorOverviewLine {
    /// Debtor ID.
    pub id: Uuid,
    /// Agent ID.
    pub agent_id: Uuid,
    /// Name.
    pub name: String,
    /// Outstanding amount.
    pub debt_amount: Decimal,
    /// Paid so far.
    pub total_paid: Decimal,
    /// Outstanding plus paid.
    pub original_debt: Decimal,
    /// Outstanding or paid off.
    pub payment_status: PaymentStatus,
}

/// Debtor overview with totals.
#[derive(Debug, Clone, Serialize)]
pub struct DebtorOverview {
    /// One line per debtor.
    pub debtors: Vec<DebtorOverviewLine>,
    /// Sum of outstanding amounts.
    pub total_outstanding: Decimal,
    /// Sum of payments.
    pub total_paid: Decimal,
    /// Sum of original debts.
    pub total_original: Decimal,
    /// Debtors with something outstanding.
    pub outstanding_count: u64,
}

/// Debtor repository.
#[derive(Debug, Clone)]
pub struct DebtorRepository {
    db: DatabaseConnection,
}

impl DebtorRepository {
    /// Creates a new debtor repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accessible debtors, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, access: &AccessibleAgents) -> Result<Vec<debtors::Model>, DbErr> {
        if access.is_empty() {
            return Ok(Vec::new());
        }

        debtors::Entity::find()
            .filter(debtors::Column::AgentId.is_in(agent_uuids(access)))
            .order_by_desc(debtors::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Builds the payment overview for accessible debtors.
    ///
    /// # Errors
    ///
    /// A stored balance that violates the invariant, or a database error.
    pub async fn overview(&self, access: &AccessibleAgents) -> Result<DebtorOverview, DebtorError> {
        let rows = self.list(access).await?;

        let mut overview = DebtorOverview {
            debtors: Vec::with_capacity(rows.len()),
            total_outstanding: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_original: Decimal::ZERO,
            outstanding_count: 0,
        };

        for row in rows {
            let balance = DebtorBalance::from_stored(row.debt_amount, row.total_paid)?;
            let status = balance.status();

            overview.total_outstanding += balance.debt_amount;
            overview.total_paid += balance.total_paid;
            overview.total_original += balance.original_debt();
            if status == PaymentStatus::Outstanding {
                overview.outstanding_count += 1;
            }

            overview.debtors.push(DebtorOverviewLine {
                id: row.id,
                agent_id: row.agent_id,
                name: row.name,
                debt_amount: balance.debt_amount,
                total_paid: balance.total_paid,
                original_debt: balance.original_debt(),
                payment_status: status,
            });
        }

        Ok(overview)
    }

    /// Creates a debtor with nothing paid.
    ///
    /// # Errors
    ///
    /// `AgentNotFound`, `Access`, `Debt` for an invalid amount, or a database error.
    pub async fn create(
        &self,
        access: &AccessibleAgents,
        input: CreateDebtorInput,
    ) -> Result<debtors::Model, DebtorError> {
        authorize_agent(&self.db, access, input.agent_id).await?;
        let balance = DebtorBalance::new(input.debt_amount)?;

        let now = chrono::Utc::now().into();
        let row = debtors::ActiveModel {
            id: Set(Uuid::now_v7()),
            agent_id: Set(input.agent_id.into_inner()),
            name: Set(input.name),
            debt_amount: Set(balance.debt_amount),
            total_paid: Set(balance.total_paid),
            phone: Set(input.phone),
            notes: Set(input.notes),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = row.insert(&self.db).await?;
        info!(agent_id = %input.agent_id, debtor_id = %inserted.id, "Debtor created");
        Ok(inserted)
    }

    /// Finds an accessible debtor.
    ///
    /// # Errors
    ///
    /// `NotFound` if missing, `Access` if its agent is out of scope.
    pub async fn find(
        &self,
        access: &AccessibleAgents,
        id: DebtorId,
    ) -> Result<debtors::Model, DebtorError> {
        let row = debtors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DebtorError::NotFound(id))?;

        access.authorize(AgentId::from_uuid(row.agent_id))?;
        Ok(row)
    }

    /// Applies a payment atomically.
    ///
    /// # Errors
    ///
    /// - `NotFound` or `Access` for the debtor
    /// - `Debt` if the settlement engine rejects the payment
    /// - `ConcurrentModification` if the version check fails
    /// - Database errors
    pub async fn apply_payment(
        &self,
        access: &AccessibleAgents,
        id: DebtorId,
        amount: Decimal,
    ) -> Result<PaymentOutcome, DebtorError> {
        let txn = self.db.begin().await?;

        let row = debtors::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DebtorError::NotFound(id))?;
        access.authorize(AgentId::from_uuid(row.agent_id))?;

        let balance = DebtorBalance::from_stored(row.debt_amount, row.total_paid)?;
        let settlement = SettlementEngine::apply_payment(&balance, amount)?;

        let result = debtors::Entity::update_many()
            .col_expr(
                debtors::Column::DebtAmount,
                Expr::value(settlement.balance.debt_amount),
            )
            .col_expr(
                debtors::Column::TotalPaid,
                Expr::value(settlement.balance.total_paid),
            )
            .col_expr(debtors::Column::Version, Expr::value(row.version + 1))
            .filter(debtors::Column::Id.eq(row.id))
            .filter(debtors::Column::Version.eq(row.version))
            .exec(&txn)
            .await?;

        if result.rows_affected != 1 {
            warn!(debtor_id = %id, version = row.version, "Debtor version check failed");
            return Err(DebtorError::ConcurrentModification(id));
        }

        let debtor = debtors::Entity::find_by_id(row.id)
            .one(&txn)
            .await?
            .ok_or(DebtorError::NotFound(id))?;

        txn.commit().await?;

        info!(
            debtor_id = %id,
            applied = %settlement.applied,
            unapplied = %settlement.unapplied,
            status = settlement.balance.status().label(),
            "Payment applied"
        );

        Ok(PaymentOutcome { debtor, settlement })
    }
}
