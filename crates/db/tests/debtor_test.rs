//! Integration tests for debtor payments.
//!
//! Run with `cargo test -p cashbook-db -- --ignored` against a PostgreSQL
//! database at `DATABASE_URL`.

mod common;

use std::sync::Arc;

use cashbook_core::debt::{DebtError, PaymentStatus};
use cashbook_db::entities::sea_orm_active_enums::UserRole;
use cashbook_db::repositories::{CreateDebtorInput, DebtorError, DebtorRepository};
use cashbook_shared::types::{AgentId, DebtorId};
use futures::future::join_all;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use common::{access_for, agent_id, connect, create_agent, create_user};

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_payment_sequence() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "CRDB").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = DebtorRepository::new(db.clone());

    let debtor = repo
        .create(
            &access,
            CreateDebtorInput {
                agent_id: agent_id(&agent),
                name: "Juma".to_string(),
                debt_amount: dec!(500.00),
                phone: None,
                notes: None,
            },
        )
        .await
        .expect("create debtor");
    let id = DebtorId::from_uuid(debtor.id);

    let first = repo.apply_payment(&access, id, dec!(200.00)).await.expect("first");
    assert_eq!(first.debtor.debt_amount, dec!(300.00));
    assert_eq!(first.debtor.total_paid, dec!(200.00));

    let second = repo.apply_payment(&access, id, dec!(300.00)).await.expect("second");
    assert_eq!(second.debtor.debt_amount, dec!(0));
    assert_eq!(second.debtor.total_paid, dec!(500.00));
    assert_eq!(second.settlement.balance.status(), PaymentStatus::PaidOff);

    let third = repo.apply_payment(&access, id, dec!(50.00)).await;
    assert!(matches!(
        third,
        Err(DebtorError::Debt(DebtError::AlreadyPaidOff))
    ));

    let overview = repo.overview(&access).await.expect("overview");
    let line = overview
        .debtors
        .iter()
        .find(|l| l.id == debtor.id)
        .expect("line present");
    assert_eq!(line.original_debt, dec!(500.00));
    assert_eq!(line.payment_status, PaymentStatus::PaidOff);
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_concurrent_payments_conserve_debt() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "NMB").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = DebtorRepository::new(db.clone());

    let debtor = repo
        .create(
            &access,
            CreateDebtorInput {
                agent_id: agent_id(&agent),
                name: "Neema".to_string(),
                debt_amount: dec!(1000.00),
                phone: None,
                notes: None,
            },
        )
        .await
        .expect("create debtor");
    let id = DebtorId::from_uuid(debtor.id);

    let access = Arc::new(access);
    let barrier = Arc::new(Barrier::new(10));
    let payments = (0..10).map(|_| {
        let repo = repo.clone();
        let access = Arc::clone(&access);
        let barrier = Arc::clone(&barrier);
        async move {
            barrier.wait().await;
            repo.apply_payment(&access, id, dec!(150.00)).await
        }
    });
    let results = join_all(payments).await;

    let stored = repo.find(&access, id).await.expect("find");
    assert_eq!(stored.debt_amount + stored.total_paid, dec!(1000.00));
    assert_eq!(stored.debt_amount, dec!(0));

    let applied: rust_decimal::Decimal = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|outcome| outcome.settlement.applied)
        .sum();
    assert_eq!(applied, dec!(1000.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_payment_on_foreign_debtor_is_forbidden() {
    let db = connect().await;
    let owner = create_user(&db, UserRole::Admin, None).await;
    let intruder = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, owner.id, "Vodacom").await;
    let (_, owner_access) = access_for(&db, owner.id).await;
    let (_, intruder_access) = access_for(&db, intruder.id).await;
    let repo = DebtorRepository::new(db.clone());

    let debtor = repo
        .create(
            &owner_access,
            CreateDebtorInput {
                agent_id: agent_id(&agent),
                name: "Baraka".to_string(),
                debt_amount: dec!(40),
                phone: None,
                notes: None,
            },
        )
        .await
        .expect("create debtor");

    let result = repo
        .apply_payment(&intruder_access, DebtorId::from_uuid(debtor.id), dec!(10))
        .await;
    assert!(matches!(result, Err(DebtorError::Access(_))));

    let unchanged = repo
        .find(&owner_access, DebtorId::from_uuid(debtor.id))
        .await
        .expect("find");
    assert_eq!(unchanged.total_paid, dec!(0));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_sub_scale_payment_leaves_debtor_untouched() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "Selcom").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = DebtorRepository::new(db.clone());

    let debtor = repo
        .create(
            &access,
            CreateDebtorInput {
                agent_id: agent_id(&agent),
                name: "Neema".to_string(),
                debt_amount: dec!(100.00),
                phone: None,
                notes: None,
            },
        )
        .await
        .expect("create debtor");
    let id = DebtorId::from_uuid(debtor.id);

    let result = repo.apply_payment(&access, id, dec!(0.00005)).await;
    assert!(matches!(
        result,
        Err(DebtorError::Debt(DebtError::UnstorablePayment(_)))
    ));

    let applied = repo.apply_payment(&access, id, dec!(0.0001)).await.expect("smallest unit");
    assert_eq!(applied.debtor.debt_amount + applied.debtor.total_paid, dec!(100.00));
    assert_eq!(applied.debtor.debt_amount, dec!(99.9999));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_debtor_for_missing_agent_is_not_found() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    create_agent(&db, admin.id, "CRDB").await;
    let (_, access) = access_for(&db, admin.id).await;

    let result = DebtorRepository::new(db.clone())
        .create(
            &access,
            CreateDebtorInput {
                agent_id: AgentId::new(),
                name: "Nobody".to_string(),
                debt_amount: dec!(10),
                phone: None,
                notes: None,
            },
        )
        .await;

    assert!(matches!(result, Err(DebtorError::AgentNotFound(_))));
}
