//! Access scoping for multi-tenant data.
//!
//! Every read or write of an agent, transaction, commission, debtor or
//! agent transaction goes through [`AccessibleAgents`]. The set is derived
//! from the caller's [`Principal`]:
//! - an admin sees exactly the agents they own
//! - an employee sees exactly the agents owned by their admin
//! - anything else sees nothing
//!
//! Cross-tenant reads are only possible through [`GlobalView`], which can
//! only be obtained by an admin listed in the [`GlobalViewPolicy`] and is
//! never produced implicitly.

mod error;
mod principal;
mod scope;

pub use error::AccessError;
pub use principal::{Principal, Role};
pub use scope::{AccessScope, AccessibleAgents, GlobalView, GlobalViewPolicy};
