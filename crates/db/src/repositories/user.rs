//! User repository for database operations.

use cashbook_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Normalized email.
    pub email: String,
    /// Argon2 hash.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: UserRole,
    /// Owning admin for employees.
    pub admin_id: Option<UserId>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// Admins never carry an `admin_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let admin_id = match input.role {
            UserRole::Admin => None,
            UserRole::Employee => input.admin_id.map(UserId::into_inner),
        };

        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            name: Set(input.name),
            role: Set(input.role),
            admin_id: Set(admin_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Lists the employees linked to an admin, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_employees(&self, admin_id: UserId) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::AdminId.eq(admin_id.into_inner()))
            .filter(users::Column::Role.eq(UserRole::Employee))
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes one of an admin's employees.
    ///
    /// Transactions the employee recorded keep their rows; the foreign key
    /// nulls their `creator_id`. Returns `false` if no such employee belongs
    /// to this admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_employee(&self, admin_id: UserId, employee_id: UserId) -> Result<bool, DbErr> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Id.eq(employee_id.into_inner()))
            .filter(users::Column::AdminId.eq(admin_id.into_inner()))
            .filter(users::Column::Role.eq(UserRole::Employee))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
