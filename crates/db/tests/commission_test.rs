//! Integration tests for commission scoping.
//!
//! Run with `cargo test -p cashbook-db -- --ignored` against a PostgreSQL
//! database at `DATABASE_URL`.

mod common;

use cashbook_core::access::AccessError;
use cashbook_core::commission::{CommissionDraft, CommissionFilter};
use cashbook_db::entities::sea_orm_active_enums::UserRole;
use cashbook_db::repositories::{CommissionError, CommissionRepository, UpdateCommissionInput};
use cashbook_shared::types::{AgentId, CommissionId};
use rust_decimal_macros::dec;

use common::{access_for, agent_id, connect, create_agent, create_user};

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_missing_commission_is_not_found() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let (_, access) = access_for(&db, admin.id).await;

    let result = CommissionRepository::new(db.clone())
        .find(&access, CommissionId::new())
        .await;

    assert!(matches!(result, Err(CommissionError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_foreign_commission_is_forbidden() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let other = create_user(&db, UserRole::Admin, None).await;
    let foreign = create_agent(&db, other.id, "Foreign").await;
    let repo = CommissionRepository::new(db.clone());

    let (_, other_access) = access_for(&db, other.id).await;
    let draft = CommissionDraft::new(agent_id(&foreign), dec!(2500.00), 3, 2025).unwrap();
    let theirs = repo.create(&other_access, draft).await.unwrap();

    let (_, access) = access_for(&db, admin.id).await;
    let id = CommissionId::from_uuid(theirs.id);

    assert!(matches!(
        repo.find(&access, id).await,
        Err(CommissionError::Access(AccessError::AgentNotInScope(_)))
    ));
    assert!(matches!(
        repo.delete(&access, id).await,
        Err(CommissionError::Access(_))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_nonexistent_agent_is_not_found() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    create_agent(&db, admin.id, "CRDB").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = CommissionRepository::new(db.clone());
    let missing = AgentId::new();

    let draft = CommissionDraft::new(missing, dec!(10), 1, 2025).unwrap();
    assert!(matches!(
        repo.create(&access, draft).await,
        Err(CommissionError::AgentNotFound(id)) if id == missing
    ));

    let filter = CommissionFilter {
        agent_id: Some(missing),
        ..CommissionFilter::default()
    };
    assert!(matches!(
        repo.list(&access, filter).await,
        Err(CommissionError::AgentNotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_out_of_scope_agent_filter_is_forbidden() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let other = create_user(&db, UserRole::Admin, None).await;
    create_agent(&db, admin.id, "NMB").await;
    let foreign = create_agent(&db, other.id, "Tigo Pesa").await;
    let (_, access) = access_for(&db, admin.id).await;

    let filter = CommissionFilter {
        agent_id: Some(agent_id(&foreign)),
        ..CommissionFilter::default()
    };
    let result = CommissionRepository::new(db.clone())
        .list(&access, filter)
        .await;

    assert!(matches!(
        result,
        Err(CommissionError::Access(AccessError::AgentNotInScope(_)))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_update_keeps_owning_agent() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "M-Pesa").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = CommissionRepository::new(db.clone());

    let draft = CommissionDraft::new(agent_id(&agent), dec!(1200.50), 5, 2025).unwrap();
    let created = repo.create(&access, draft).await.unwrap();

    let updated = repo
        .update(
            &access,
            CommissionId::from_uuid(created.id),
            UpdateCommissionInput {
                amount: Some(dec!(1300)),
                month: Some(6),
                year: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.agent_id, agent.id);
    assert_eq!(updated.amount, dec!(1300));
    assert_eq!(updated.month, 6);
    assert_eq!(updated.year, 2025);
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_update_rejects_invalid_month() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let agent = create_agent(&db, admin.id, "Airtel Money").await;
    let (_, access) = access_for(&db, admin.id).await;
    let repo = CommissionRepository::new(db.clone());

    let draft = CommissionDraft::new(agent_id(&agent), dec!(50), 1, 2025).unwrap();
    let created = repo.create(&access, draft).await.unwrap();

    let result = repo
        .update(
            &access,
            CommissionId::from_uuid(created.id),
            UpdateCommissionInput {
                amount: None,
                month: Some(13),
                year: None,
            },
        )
        .await;

    assert!(matches!(result, Err(CommissionError::Rule(_))));
}
