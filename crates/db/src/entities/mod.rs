//! `SeaORM` entity definitions.

pub mod agent_transactions;
pub mod agents;
pub mod commissions;
pub mod debtors;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;

pub mod prelude {
    //! Entity re-exports.
    pub use super::agent_transactions::Entity as AgentTransactions;
    pub use super::agents::Entity as Agents;
    pub use super::commissions::Entity as Commissions;
    pub use super::debtors::Entity as Debtors;
    pub use super::transactions::Entity as Transactions;
    pub use super::users::Entity as Users;
}
