//! Database seeder for Cashbook development and testing.
//!
//! Seeds one admin, one linked employee, a few agents with a week of daily
//! transactions, commissions and debtors. Re-running is a no-op once the
//! admin exists.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use cashbook_core::access::AccessibleAgents;
use cashbook_core::agent::AgentProfile;
use cashbook_core::auth::hash_password;
use cashbook_core::commission::CommissionDraft;
use cashbook_core::ledger::ContinuityMode;
use cashbook_db::entities::{agents, sea_orm_active_enums::UserRole, users};
use cashbook_db::repositories::{
    AgentRepository, AgentTransactionRepository, CommissionRepository, CreateDebtorInput,
    CreateTransactionInput, CreateUserInput, DebtorRepository, ScopeRepository,
    TransactionRepository, UserRepository, principal_from_model,
};
use cashbook_shared::types::{AgentId, UserId};

const ADMIN_EMAIL: &str = "admin@cashbook.local";
const EMPLOYEE_EMAIL: &str = "employee@cashbook.local";
const SEED_PASSWORD: &str = "password123";

/// (name, type_of_agent, starting balance in whole units)
const AGENTS: [(&str, &str, i64); 3] = [
    ("CRDB Wakala", "Bank", 250_000),
    ("M-Pesa Kariakoo", "Mobile Provider", 120_000),
    ("NMB Wakala", "Bank", 80_000),
];

const DAYS_OF_HISTORY: i64 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("CASHBOOK__DATABASE__URL"))
        .context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = cashbook_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let user_repo = UserRepository::new(db.clone());
    if user_repo.email_exists(ADMIN_EMAIL).await? {
        println!("  Seed admin already exists, skipping...");
        return Ok(());
    }

    println!("Seeding users...");
    let (admin, employee) = seed_users(&user_repo).await?;

    println!("Seeding agents...");
    let agent_rows = seed_agents(&db, &admin).await?;

    let scope = ScopeRepository::new(db.clone());
    let access = scope
        .accessible_agents(&principal_from_model(&employee))
        .await?;

    println!("Seeding daily transactions...");
    seed_transactions(&db, &access, &employee, &agent_rows).await?;

    println!("Seeding commissions and debtors...");
    seed_commissions_and_debtors(&db, &access, &agent_rows).await?;

    println!("Seeding complete!");
    println!("  Admin:    {ADMIN_EMAIL} / {SEED_PASSWORD}");
    println!("  Employee: {EMPLOYEE_EMAIL} / {SEED_PASSWORD}");
    Ok(())
}

async fn seed_users(user_repo: &UserRepository) -> anyhow::Result<(users::Model, users::Model)> {
    let password_hash = hash_password(SEED_PASSWORD)?;

    let admin = user_repo
        .create(CreateUserInput {
            email: ADMIN_EMAIL.to_string(),
            password_hash: password_hash.clone(),
            name: "Seed Admin".to_string(),
            role: UserRole::Admin,
            admin_id: None,
        })
        .await?;
    println!("  Created admin: {ADMIN_EMAIL}");

    let employee = user_repo
        .create(CreateUserInput {
            email: EMPLOYEE_EMAIL.to_string(),
            password_hash,
            name: "Seed Employee".to_string(),
            role: UserRole::Employee,
            admin_id: Some(UserId::from_uuid(admin.id)),
        })
        .await?;
    println!("  Created employee: {EMPLOYEE_EMAIL}");

    Ok((admin, employee))
}

async fn seed_agents(
    db: &DatabaseConnection,
    admin: &users::Model,
) -> anyhow::Result<Vec<(agents::Model, Decimal)>> {
    let repo = AgentRepository::new(db.clone());
    let mut created = Vec::with_capacity(AGENTS.len());

    for (name, kind, start) in AGENTS {
        let profile = AgentProfile::new(name, kind, None, None)?;
        let agent = repo.create(UserId::from_uuid(admin.id), profile).await?;
        println!("  Created agent: {name}");
        created.push((agent, Decimal::from(start)));
    }

    Ok(created)
}

/// Records a continuous chain of days ending yesterday for every agent.
async fn seed_transactions(
    db: &DatabaseConnection,
    access: &AccessibleAgents,
    employee: &users::Model,
    agent_rows: &[(agents::Model, Decimal)],
) -> anyhow::Result<()> {
    let transactions = TransactionRepository::new(db.clone());
    let self_reported = AgentTransactionRepository::new(db.clone());
    let today = Utc::now().date_naive();

    for (agent, start) in agent_rows {
        let agent_id = AgentId::from_uuid(agent.id);
        let mut balance = *start;

        for offset in (1..=DAYS_OF_HISTORY).rev() {
            // Alternate deposits and withdrawals so the chain moves both ways.
            let movement = Decimal::from(offset * 1_500);
            let closing = if offset % 2 == 0 {
                balance + movement
            } else {
                balance - movement
            };

            transactions
                .create(
                    access,
                    CreateTransactionInput {
                        agent_id,
                        creator_id: UserId::from_uuid(employee.id),
                        date: today - Duration::days(offset),
                        opening_balance: balance,
                        closing_balance: closing,
                        notes: None,
                    },
                    ContinuityMode::Strict,
                )
                .await?;
            balance = closing;
        }

        self_reported.create(access, agent_id, balance).await?;
        println!("  {} days recorded for {}", DAYS_OF_HISTORY, agent.name);
    }

    Ok(())
}

async fn seed_commissions_and_debtors(
    db: &DatabaseConnection,
    access: &AccessibleAgents,
    agent_rows: &[(agents::Model, Decimal)],
) -> anyhow::Result<()> {
    let commissions = CommissionRepository::new(db.clone());
    let debtors = DebtorRepository::new(db.clone());
    let today = Utc::now().date_naive();
    let month = i32::try_from(today.month()).context("month out of range")?;

    for (index, (agent, _)) in agent_rows.iter().enumerate() {
        let agent_id = AgentId::from_uuid(agent.id);
        let step = i64::try_from(index).context("too many agents")? + 1;

        let draft = CommissionDraft::new(agent_id, Decimal::from(step * 12_000), month, today.year())?;
        commissions.create(access, draft).await?;

        debtors
            .create(
                access,
                CreateDebtorInput {
                    agent_id,
                    name: format!("Customer {step}"),
                    debt_amount: Decimal::from(step * 5_000),
                    phone: None,
                    notes: Some("Seeded".to_string()),
                },
            )
            .await?;
    }

    println!("  {} commissions, {} debtors", agent_rows.len(), agent_rows.len());
    Ok(())
}
