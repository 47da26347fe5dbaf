//! Integration tests for daily transaction recording.
//!
//! Run with `cargo test -p cashbook-db -- --ignored` against a PostgreSQL
//! database at `DATABASE_URL`.

mod common;

use std::sync::Arc;

use cashbook_core::ledger::{ContinuityMode, LedgerError};
use cashbook_db::entities::{sea_orm_active_enums::UserRole, transactions};
use cashbook_db::repositories::{
    AgentRepository, AgentTransactionRepository, CreateTransactionInput, TransactionError,
    TransactionRepository, UserRepository,
};
use cashbook_shared::types::{AgentId, PageRequest, UserId};
use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::sync::Barrier;

use common::{access_for, agent_id, connect, create_agent, create_user};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn input(
    agent: &cashbook_db::entities::agents::Model,
    creator: uuid::Uuid,
    d: u32,
    opening: Decimal,
    closing: Decimal,
) -> CreateTransactionInput {
    CreateTransactionInput {
        agent_id: agent_id(agent),
        creator_id: UserId::from_uuid(creator),
        date: day(d),
        opening_balance: opening,
        closing_balance: closing,
        notes: None,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_daily_chain_scenario() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let employee = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let agent = create_agent(&db, admin.id, "CRDB").await;
    let (_, access) = access_for(&db, employee.id).await;
    let repo = TransactionRepository::new(db.clone());

    repo.create(&access, input(&agent, employee.id, 1, dec!(0), dec!(100.00)), ContinuityMode::Strict)
        .await
        .expect("first day");

    let second = repo
        .create(&access, input(&agent, employee.id, 2, dec!(100.00), dec!(150.00)), ContinuityMode::Strict)
        .await
        .expect("second day");
    assert!(second.warnings.is_empty());

    let duplicate = repo
        .create(&access, input(&agent, employee.id, 2, dec!(150.00), dec!(10)), ContinuityMode::Strict)
        .await;
    assert!(matches!(
        duplicate,
        Err(TransactionError::Ledger(LedgerError::DuplicateDate { .. }))
    ));

    let mismatch = repo
        .create(&access, input(&agent, employee.id, 3, dec!(90.00), dec!(120.00)), ContinuityMode::Strict)
        .await;
    assert!(matches!(
        mismatch,
        Err(TransactionError::Ledger(LedgerError::OpeningBalanceMismatch { .. }))
    ));

    let rows = repo.list(&access, agent_id(&agent)).await.expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, day(2));

    let page = repo
        .list_page(
            &access,
            agent_id(&agent),
            &PageRequest {
                page: 2,
                per_page: 1,
            },
        )
        .await
        .expect("page");
    assert_eq!(page.meta.total, 2);
    assert_eq!(page.meta.total_pages, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].date, day(1));

    let latest = repo
        .latest(&access, agent_id(&agent))
        .await
        .expect("latest")
        .expect("some latest");
    assert_eq!(latest.closing_balance, dec!(150.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_concurrent_same_day_inserts_leave_one_row() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "NMB").await;
    let (_, access) = access_for(&db, admin.id).await;
    let access = Arc::new(access);
    let barrier = Arc::new(Barrier::new(8));

    let attempts = (0..8).map(|i| {
        let repo = TransactionRepository::new(db.clone());
        let access = Arc::clone(&access);
        let barrier = Arc::clone(&barrier);
        let input = input(&agent, admin.id, 5, dec!(0), Decimal::from(i));
        async move {
            barrier.wait().await;
            repo.create(&access, input, ContinuityMode::Strict).await
        }
    });
    let results = join_all(attempts).await;

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(TransactionError::Ledger(LedgerError::DuplicateDate { .. }))
        ));
    }

    let stored = transactions::Entity::find()
        .filter(transactions::Column::AgentId.eq(agent.id))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(stored, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_deleting_creator_keeps_transaction() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let employee = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let agent = create_agent(&db, admin.id, "Tigo").await;
    let (_, access) = access_for(&db, employee.id).await;

    let recorded = TransactionRepository::new(db.clone())
        .create(&access, input(&agent, employee.id, 1, dec!(0), dec!(10)), ContinuityMode::Strict)
        .await
        .expect("record");

    UserRepository::new(db.clone())
        .delete_employee(UserId::from_uuid(admin.id), UserId::from_uuid(employee.id))
        .await
        .expect("delete employee");

    let row = transactions::Entity::find_by_id(recorded.transaction.id)
        .one(&db)
        .await
        .expect("query")
        .expect("transaction survives");
    assert_eq!(row.creator_id, None);
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_agent_ledger_chains_and_cascades() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "Halotel").await;
    let (_, access) = access_for(&db, admin.id).await;
    let ledger = AgentTransactionRepository::new(db.clone());

    let first = ledger
        .create(&access, agent_id(&agent), dec!(250.00))
        .await
        .expect("first entry");
    assert_eq!(first.opening_balance, Decimal::ZERO);

    let second = ledger
        .create(&access, agent_id(&agent), dec!(180.00))
        .await
        .expect("second entry");
    assert_eq!(second.opening_balance, dec!(250.00));

    let agents = AgentRepository::new(db.clone());
    let with_balance = agents.find(&access, agent_id(&agent)).await.expect("find");
    assert_eq!(with_balance.current_balance, dec!(180.00));

    agents.delete(&access, agent_id(&agent)).await.expect("delete");
    let (_, access) = access_for(&db, admin.id).await;
    assert!(!access.contains(agent_id(&agent)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_sub_scale_balance_never_reaches_storage() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "Selcom").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = TransactionRepository::new(db.clone());

    let rejected = repo
        .create(&access, input(&agent, admin.id, 1, dec!(0), dec!(100.00005)), ContinuityMode::Strict)
        .await;
    assert!(matches!(
        rejected,
        Err(TransactionError::Ledger(LedgerError::UnstorableAmount { field: "closing_balance", .. }))
    ));

    repo.create(&access, input(&agent, admin.id, 1, dec!(0), dec!(100.0001)), ContinuityMode::Strict)
        .await
        .expect("four places are stored exactly");
    repo.create(&access, input(&agent, admin.id, 2, dec!(100.0001), dec!(80)), ContinuityMode::Strict)
        .await
        .expect("stored closing continues the chain");
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_missing_agent_is_not_found() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    create_agent(&db, admin.id, "Azam Pesa").await;
    let (_, access) = access_for(&db, admin.id).await;
    let missing = AgentId::new();

    let listed = TransactionRepository::new(db.clone()).list(&access, missing).await;
    assert!(matches!(listed, Err(TransactionError::AgentNotFound(id)) if id == missing));

    let ledger = AgentTransactionRepository::new(db.clone())
        .create(&access, missing, dec!(10))
        .await;
    assert!(matches!(ledger, Err(TransactionError::AgentNotFound(_))));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_own_transactions_lists_only_callers_days() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let employee = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let colleague = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let first = create_agent(&db, admin.id, "CRDB").await;
    let second = create_agent(&db, admin.id, "NMB").await;
    let (_, access) = access_for(&db, employee.id).await;
    let repo = TransactionRepository::new(db.clone());

    repo.create(&access, input(&first, employee.id, 2, dec!(0), dec!(50)), ContinuityMode::Strict)
        .await
        .expect("employee day 2");
    repo.create(&access, input(&second, employee.id, 1, dec!(0), dec!(70)), ContinuityMode::Strict)
        .await
        .expect("employee day 1");
    repo.create(&access, input(&first, colleague.id, 3, dec!(50), dec!(60)), ContinuityMode::Strict)
        .await
        .expect("colleague day 3");

    let page = repo
        .list_by_creator(&access, UserId::from_uuid(employee.id), &PageRequest::default())
        .await
        .expect("own transactions");

    assert_eq!(page.meta.total, 2);
    assert_eq!(page.data[0].date, day(1));
    assert_eq!(page.data[1].date, day(2));
    assert!(page.data.iter().all(|t| t.creator_id == Some(employee.id)));

    let (_, stranger_access) = access_for(&db, create_user(&db, UserRole::Admin, None).await.id).await;
    let none = repo
        .list_by_creator(&stranger_access, UserId::from_uuid(employee.id), &PageRequest::default())
        .await
        .expect("empty scope");
    assert_eq!(none.meta.total, 0);
}
