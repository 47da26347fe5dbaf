//! Employee management routes. Admin only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Caller,
    routes::{
        auth::{user_info, user_insert_error},
        dashboard::invalidate_dashboard,
    },
};
use cashbook_core::auth::{
    check_password_strength, derive_employee_email, hash_password, is_plausible_email,
    normalize_email,
};
use cashbook_db::{
    UserRepository, entities::sea_orm_active_enums::UserRole, repositories::CreateUserInput,
};
use cashbook_shared::{AppError, auth::UserInfo, types::UserId};

/// Creates the employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/employees", get(list_employees).post(create_employee))
        .route("/admin/employees/{id}", delete(delete_employee))
}

/// Request body for creating an employee.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Display name.
    pub name: String,
    /// Login email. Derived from the name when omitted.
    pub email: Option<String>,
    /// Initial password.
    pub password: String,
}

/// Picks the employee's email: the supplied one, or one derived from the name.
fn resolve_email(request: &CreateEmployeeRequest, domain: &str) -> ApiResult<String> {
    match request.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => {
            let email = normalize_email(email);
            if is_plausible_email(&email) {
                Ok(email)
            } else {
                Err(ApiError(AppError::rejected(
                    "INVALID_EMAIL",
                    Some("email"),
                    "Email is not valid",
                )))
            }
        }
        None => derive_employee_email(&request.name, domain).ok_or_else(|| {
            ApiError(AppError::rejected(
                "BLANK_FIELD",
                Some("name"),
                "name can't be blank",
            ))
        }),
    }
}

/// GET /admin/employees - Employees linked to the caller.
async fn list_employees(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<UserInfo>>> {
    let admin_id = caller.principal.require_admin()?;

    let employees = UserRepository::new((*state.db).clone())
        .list_employees(admin_id)
        .await?;

    Ok(Json(employees.iter().map(user_info).collect()))
}

/// POST /admin/employees - Create an employee linked to the caller.
async fn create_employee(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<impl IntoResponse> {
    let admin_id = caller.principal.require_admin()?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError(AppError::rejected(
            "BLANK_FIELD",
            Some("name"),
            "name can't be blank",
        )));
    }
    let email = resolve_email(&payload, &state.employee_email_domain)?;
    check_password_strength(&payload.password)?;

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(&email).await? {
        return Err(ApiError(AppError::Conflict(
            "Email already registered".to_string(),
        )));
    }

    let employee = user_repo
        .create(CreateUserInput {
            email,
            password_hash: hash_password(&payload.password)?,
            name,
            role: UserRole::Employee,
            admin_id: Some(admin_id),
        })
        .await
        .map_err(user_insert_error)?;

    invalidate_dashboard(&state, &caller);
    info!(%admin_id, employee_id = %employee.id, "Employee created");

    Ok((StatusCode::CREATED, Json(user_info(&employee))))
}

/// DELETE /admin/employees/{id} - Remove one of the caller's employees.
async fn delete_employee(
    State(state): State<AppState>,
    caller: Caller,
    Path(employee_id): Path<UserId>,
) -> ApiResult<StatusCode> {
    let admin_id = caller.principal.require_admin()?;

    let deleted = UserRepository::new((*state.db).clone())
        .delete_employee(admin_id, employee_id)
        .await?;
    if !deleted {
        return Err(ApiError(AppError::NotFound(format!(
            "Employee not found: {employee_id}"
        ))));
    }

    invalidate_dashboard(&state, &caller);
    info!(%admin_id, %employee_id, "Employee deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: Option<&str>) -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            name: name.to_string(),
            email: email.map(str::to_string),
            password: "long-enough".to_string(),
        }
    }

    #[test]
    fn test_email_derived_from_name_when_missing() {
        let email = resolve_email(&request("Jane Doe", None), "cashbook.local").unwrap();
        assert_eq!(email, "janedoe@cashbook.local");
    }

    #[test]
    fn test_blank_email_falls_back_to_derived() {
        let email = resolve_email(&request("Amani", Some("  ")), "cashbook.local").unwrap();
        assert_eq!(email, "amani@cashbook.local");
    }

    #[test]
    fn test_supplied_email_is_normalized() {
        let email =
            resolve_email(&request("Jane", Some(" Jane@Example.COM ")), "cashbook.local").unwrap();
        assert_eq!(email, "jane@example.com");
    }

    #[test]
    fn test_supplied_email_must_be_plausible() {
        let err = resolve_email(&request("Jane", Some("not-an-email")), "cashbook.local")
            .unwrap_err();
        assert_eq!(err.inner().error_code(), "INVALID_EMAIL");
    }
}
