//! The authenticated caller and their role.

use cashbook_shared::types::UserId;
use serde::{Deserialize, Serialize};

use super::error::AccessError;
use super::scope::AccessScope;

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns agents and manages employees.
    Admin,
    /// Records balances for their admin's agents.
    Employee,
}

impl Role {
    /// Parses a stored role name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    /// The stored role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller an operation runs on behalf of.
///
/// Built from the current user row, never from token claims alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// An admin user.
    Admin {
        /// The admin's id.
        id: UserId,
    },
    /// An employee, optionally linked to an admin.
    Employee {
        /// The employee's id.
        id: UserId,
        /// The admin whose agents the employee works on.
        admin_id: Option<UserId>,
    },
    /// A user whose stored role is not recognised. Fails closed.
    Unrecognized {
        /// The user's id.
        id: UserId,
    },
}

impl Principal {
    /// Builds a principal from stored user fields.
    ///
    /// Admins never carry an `admin_id`; one stored on an admin row is ignored.
    #[must_use]
    pub fn from_parts(id: UserId, role: &str, admin_id: Option<UserId>) -> Self {
        match Role::parse(role) {
            Some(Role::Admin) => Self::Admin { id },
            Some(Role::Employee) => Self::Employee { id, admin_id },
            None => Self::Unrecognized { id },
        }
    }

    /// The caller's user id.
    #[must_use]
    pub const fn id(&self) -> UserId {
        match self {
            Self::Admin { id } | Self::Employee { id, .. } | Self::Unrecognized { id } => *id,
        }
    }

    /// The caller's role, if recognised.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Admin { .. } => Some(Role::Admin),
            Self::Employee { .. } => Some(Role::Employee),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Returns true for admins.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// The scope of agents this caller may act upon.
    #[must_use]
    pub const fn scope(&self) -> AccessScope {
        match self {
            Self::Admin { id } => AccessScope::OwnedBy(*id),
            Self::Employee {
                admin_id: Some(admin_id),
                ..
            } => AccessScope::OwnedBy(*admin_id),
            Self::Employee { admin_id: None, .. } | Self::Unrecognized { .. } => {
                AccessScope::Empty
            }
        }
    }

    /// The admin that new agents created by this caller belong to.
    ///
    /// # Errors
    ///
    /// `NoAdminAssigned` for an unlinked employee, `AdminRequired` for an
    /// unrecognised role.
    pub const fn owning_admin(&self) -> Result<UserId, AccessError> {
        match self {
            Self::Admin { id } => Ok(*id),
            Self::Employee {
                admin_id: Some(admin_id),
                ..
            } => Ok(*admin_id),
            Self::Employee { admin_id: None, .. } => Err(AccessError::NoAdminAssigned),
            Self::Unrecognized { .. } => Err(AccessError::AdminRequired),
        }
    }

    /// Ensures the caller is an admin.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AdminRequired` otherwise.
    pub const fn require_admin(&self) -> Result<UserId, AccessError> {
        match self {
            Self::Admin { id } => Ok(*id),
            _ => Err(AccessError::AdminRequired),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::Employee.to_string(), "employee");
    }

    #[test]
    fn test_admin_scope_is_self() {
        let id = UserId::new();
        let principal = Principal::from_parts(id, "admin", None);
        assert!(principal.is_admin());
        assert_eq!(principal.scope(), AccessScope::OwnedBy(id));
        assert_eq!(principal.owning_admin(), Ok(id));
    }

    #[test]
    fn test_admin_ignores_stray_admin_id() {
        let id = UserId::new();
        let principal = Principal::from_parts(id, "admin", Some(UserId::new()));
        assert_eq!(principal.scope(), AccessScope::OwnedBy(id));
    }

    #[test]
    fn test_employee_scope_is_their_admin() {
        let admin = UserId::new();
        let principal = Principal::from_parts(UserId::new(), "employee", Some(admin));
        assert_eq!(principal.scope(), AccessScope::OwnedBy(admin));
        assert_eq!(principal.owning_admin(), Ok(admin));
        assert_eq!(principal.require_admin(), Err(AccessError::AdminRequired));
    }

    #[test]
    fn test_employee_without_admin_has_empty_scope() {
        let principal = Principal::from_parts(UserId::new(), "employee", None);
        assert_eq!(principal.scope(), AccessScope::Empty);
        assert_eq!(
            principal.owning_admin(),
            Err(AccessError::NoAdminAssigned)
        );
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let principal = Principal::from_parts(UserId::new(), "auditor", Some(UserId::new()));
        assert_eq!(principal.role(), None);
        assert_eq!(principal.scope(), AccessScope::Empty);
        assert!(principal.require_admin().is_err());
        assert!(principal.owning_admin().is_err());
    }
}
