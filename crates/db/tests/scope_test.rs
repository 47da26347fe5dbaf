//! Integration tests for access scoping.
//!
//! Run with `cargo test -p cashbook-db -- --ignored` against a PostgreSQL
//! database at `DATABASE_URL`.

mod common;

use cashbook_core::access::AccessError;
use cashbook_db::entities::sea_orm_active_enums::UserRole;
use cashbook_db::repositories::{AgentError, AgentRepository, UserRepository};
use cashbook_shared::types::{AgentId, UserId};

use common::{access_for, agent_id, connect, create_agent, create_user};

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_admin_sees_exactly_their_agents() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let other = create_user(&db, UserRole::Admin, None).await;

    let mine = [
        create_agent(&db, admin.id, "CRDB").await,
        create_agent(&db, admin.id, "NMB").await,
        create_agent(&db, admin.id, "M-Pesa").await,
    ];
    create_agent(&db, other.id, "Tigo Pesa").await;

    let (_, access) = access_for(&db, admin.id).await;

    assert_eq!(access.len(), 3);
    for agent in &mine {
        assert!(access.contains(agent_id(agent)));
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_employee_inherits_admin_scope() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let employee = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let agent = create_agent(&db, admin.id, "Airtel Money").await;

    let (principal, access) = access_for(&db, employee.id).await;

    assert!(!principal.is_admin());
    assert!(access.contains(agent_id(&agent)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_employee_without_admin_sees_nothing() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    create_agent(&db, admin.id, "Halopesa").await;
    let orphan = create_user(&db, UserRole::Employee, None).await;

    let (_, access) = access_for(&db, orphan.id).await;
    assert!(access.is_empty());

    let agents = AgentRepository::new(db.clone())
        .list(&access)
        .await
        .expect("list should succeed");
    assert!(agents.is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_foreign_agent_lookup_is_forbidden() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let other = create_user(&db, UserRole::Admin, None).await;
    let foreign = create_agent(&db, other.id, "Foreign").await;

    let (_, access) = access_for(&db, admin.id).await;
    let result = AgentRepository::new(db.clone())
        .find(&access, agent_id(&foreign))
        .await;

    assert!(matches!(
        result,
        Err(AgentError::Access(AccessError::AgentNotInScope(_)))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_missing_agent_is_not_found_for_any_caller() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    create_agent(&db, admin.id, "NMB").await;
    let orphan = create_user(&db, UserRole::Employee, None).await;
    let agents = AgentRepository::new(db.clone());
    let missing = AgentId::new();

    for user in [admin.id, orphan.id] {
        let (_, access) = access_for(&db, user).await;
        assert!(matches!(
            agents.find(&access, missing).await,
            Err(AgentError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            agents.delete(&access, missing).await,
            Err(AgentError::NotFound(_))
        ));
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_deleting_employee_keeps_scope_of_admin() {
    let db = connect().await;
    let admin = create_user(&db, UserRole::Admin, None).await;
    let employee = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let users = UserRepository::new(db.clone());

    let listed = users
        .list_employees(UserId::from_uuid(admin.id))
        .await
        .expect("list employees");
    assert!(listed.iter().any(|u| u.id == employee.id));

    let deleted = users
        .delete_employee(UserId::from_uuid(admin.id), UserId::from_uuid(employee.id))
        .await
        .expect("delete employee");
    assert!(deleted);

    // A second admin cannot delete someone else's employee.
    let other_admin = create_user(&db, UserRole::Admin, None).await;
    let stranger = create_user(&db, UserRole::Employee, Some(admin.id)).await;
    let deleted = users
        .delete_employee(UserId::from_uuid(other_admin.id), UserId::from_uuid(stranger.id))
        .await
        .expect("delete attempt");
    assert!(!deleted);
}
