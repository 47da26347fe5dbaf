//! Access scope resolution against stored users and agents.
//!
//! Every other repository takes the [`AccessibleAgents`] produced here, so
//! this is the single place agent ownership is read for authorization.

use cashbook_core::access::{AccessError, AccessibleAgents, Principal};
use cashbook_shared::types::{AgentId, UserId};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{agents, users};

/// Why a client-supplied agent id cannot be acted upon.
#[derive(Debug, thiserror::Error)]
pub enum AgentLookupError {
    /// No agent has this id.
    #[error("Agent not found: {0}")]
    Missing(AgentId),

    /// The agent exists but belongs to another tenant.
    #[error(transparent)]
    Denied(#[from] AccessError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Resolves principals and their accessible agents.
#[derive(Debug, Clone)]
pub struct ScopeRepository {
    db: DatabaseConnection,
}

impl ScopeRepository {
    /// Creates a new scope repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the current principal from the user row.
    ///
    /// Returns `None` if the user no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn principal(&self, user_id: UserId) -> Result<Option<Principal>, DbErr> {
        let user = users::Entity::find_by_id(user_id.into_inner())
            .one(&self.db)
            .await?;

        Ok(user.map(|u| principal_from_model(&u)))
    }

    /// Computes the agents a principal may act upon.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn accessible_agents(&self, principal: &Principal) -> Result<AccessibleAgents, DbErr> {
        let scope = principal.scope();
        let Some(owner) = scope.owner() else {
            return Ok(AccessibleAgents::none());
        };

        let rows: Vec<(Uuid, Uuid)> = agents::Entity::find()
            .filter(agents::Column::UserId.eq(owner.into_inner()))
            .select_only()
            .column(agents::Column::Id)
            .column(agents::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(AccessibleAgents::from_owned(
            scope,
            rows.into_iter()
                .map(|(id, user_id)| (AgentId::from_uuid(id), UserId::from_uuid(user_id))),
        ))
    }
}

/// Builds a principal from a stored user.
#[must_use]
pub fn principal_from_model(user: &users::Model) -> Principal {
    Principal::from_parts(
        UserId::from_uuid(user.id),
        user.role.as_str(),
        user.admin_id.map(UserId::from_uuid),
    )
}

/// Authorizes a client-supplied agent id.
///
/// An id naming no agent is `Missing` for every caller; `Denied` is only
/// reported for agents that exist outside the scope.
pub(crate) async fn authorize_agent<C: ConnectionTrait>(
    db: &C,
    access: &AccessibleAgents,
    agent_id: AgentId,
) -> Result<AgentId, AgentLookupError> {
    let Err(denied) = access.authorize(agent_id) else {
        return Ok(agent_id);
    };

    let exists = agents::Entity::find_by_id(agent_id.into_inner())
        .count(db)
        .await?
        > 0;
    if exists {
        Err(AgentLookupError::Denied(denied))
    } else {
        Err(AgentLookupError::Missing(agent_id))
    }
}

/// Converts accessible agent ids for use in `is_in` filters.
pub(crate) fn agent_uuids(access: &AccessibleAgents) -> Vec<Uuid> {
    access.ids().into_iter().map(AgentId::into_inner).collect()
}
