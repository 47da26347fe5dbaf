//! Accessible-agent sets and the privileged global view.

use std::collections::BTreeSet;

use cashbook_shared::types::{AgentId, UserId};

use super::error::AccessError;
use super::principal::Principal;

/// Which owner's agents a caller may act upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessScope {
    /// Agents owned by this admin.
    OwnedBy(UserId),
    /// No agents at all.
    Empty,
}

impl AccessScope {
    /// The owning admin, if the scope is non-empty.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        match self {
            Self::OwnedBy(id) => Some(*id),
            Self::Empty => None,
        }
    }
}

/// The authoritative set of agents a caller may read or write.
///
/// An empty set is a valid state: lists come back empty and direct lookups
/// are denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibleAgents {
    ids: BTreeSet<AgentId>,
}

impl AccessibleAgents {
    /// An empty set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolves the set from `(agent_id, owner_id)` rows.
    ///
    /// Rows owned by anyone other than the scope's owner are dropped, so the
    /// result is correct even when the caller passes unfiltered rows.
    pub fn from_owned<I>(scope: AccessScope, rows: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, UserId)>,
    {
        let Some(owner) = scope.owner() else {
            return Self::none();
        };

        let ids = rows
            .into_iter()
            .filter(|(_, owner_id)| *owner_id == owner)
            .map(|(agent_id, _)| agent_id)
            .collect();

        Self { ids }
    }

    /// Returns true if the agent is in scope.
    #[must_use]
    pub fn contains(&self, agent_id: AgentId) -> bool {
        self.ids.contains(&agent_id)
    }

    /// Authorizes an operation on one agent.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AgentNotInScope` when the agent is outside the set.
    pub fn authorize(&self, agent_id: AgentId) -> Result<AgentId, AccessError> {
        if self.contains(agent_id) {
            Ok(agent_id)
        } else {
            Err(AccessError::AgentNotInScope(agent_id))
        }
    }

    /// Agent ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<AgentId> {
        self.ids.iter().copied().collect()
    }

    /// Returns true if no agent is accessible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of accessible agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// The admins configured as platform operators.
///
/// Any visitor can register an admin account, so being an admin is not
/// enough to read other tenants. Only ids listed here may.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalViewPolicy {
    operators: BTreeSet<UserId>,
}

impl GlobalViewPolicy {
    /// A policy granting the view to exactly these users.
    pub fn new<I>(operators: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        Self {
            operators: operators.into_iter().collect(),
        }
    }

    /// Returns true if `user_id` is a configured operator.
    #[must_use]
    pub fn permits(&self, user_id: UserId) -> bool {
        self.operators.contains(&user_id)
    }
}

/// Proof that the caller may read across every tenant.
///
/// The only constructor requires an admin principal listed in the
/// [`GlobalViewPolicy`], so code holding a `GlobalView` has passed both checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalView {
    requested_by: UserId,
}

impl GlobalView {
    /// Grants the global view to a configured operator.
    ///
    /// # Errors
    ///
    /// `AdminRequired` for any non-admin, `GlobalViewNotGranted` for an admin
    /// the policy does not list.
    pub fn for_principal(
        principal: &Principal,
        policy: &GlobalViewPolicy,
    ) -> Result<Self, AccessError> {
        let requested_by = principal.require_admin()?;
        if !policy.permits(requested_by) {
            return Err(AccessError::GlobalViewNotGranted);
        }
        Ok(Self { requested_by })
    }

    /// The admin who requested the view.
    #[must_use]
    pub const fn requested_by(&self) -> UserId {
        self.requested_by
    }
}
