//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every agent-owned read or write takes the caller's `AccessibleAgents`.

pub mod agent;
pub mod agent_transaction;
pub mod commission;
pub mod dashboard;
pub mod debtor;
pub mod scope;
pub mod transaction;
pub mod user;

pub use agent::{AgentError, AgentRepository, AgentWithBalance};
pub use agent_transaction::AgentTransactionRepository;
pub use commission::{CommissionError, CommissionRepository, UpdateCommissionInput};
pub use dashboard::DashboardRepository;
pub use debtor::{
    CreateDebtorInput, DebtorError, DebtorOverview, DebtorOverviewLine, DebtorRepository,
    PaymentOutcome,
};
pub use scope::{ScopeRepository, principal_from_model};
pub use transaction::{
    CreateTransactionInput, RecordedTransaction, TransactionError, TransactionRepository,
};
pub use user::{CreateUserInput, UserRepository};
