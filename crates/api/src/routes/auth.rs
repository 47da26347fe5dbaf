//! Authentication routes for login, register, and token refresh.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use sea_orm::{DbErr, SqlErr};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Caller,
};
use cashbook_core::auth::{
    check_password_strength, hash_password, is_plausible_email, normalize_email, verify_password,
};
use cashbook_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    repositories::CreateUserInput,
};
use cashbook_shared::{
    AppError, TokenKind,
    auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo},
    types::UserId,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// Creates the auth routes that need a valid access token.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/user", get(current_user))
}

fn invalid_credentials() -> ApiError {
    ApiError(AppError::Unauthorized(
        "Invalid email or password".to_string(),
    ))
}

/// Maps a failed user insert, treating a unique violation as a taken email.
pub(crate) fn user_insert_error(e: DbErr) -> ApiError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ApiError(AppError::Conflict("Email already registered".to_string()))
        }
        _ => e.into(),
    }
}

/// Builds the public view of a user row.
pub(crate) fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
        admin_id: user.admin_id,
    }
}

fn issue_for(state: &AppState, user: &users::Model) -> ApiResult<LoginResponse> {
    let tokens = state.jwt_service.issue_pair(user.id, user.role.as_str())?;
    Ok(LoginResponse {
        user: user_info(user),
        tokens,
    })
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new((*state.db).clone());
    let email = normalize_email(&payload.email);

    let Some(user) = user_repo.find_by_email(&email).await? else {
        info!(%email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let response = issue_for(&state, &user)?;
    info!(user_id = %user.id, role = user.role.as_str(), "User logged in successfully");

    Ok((StatusCode::OK, Json(response)))
}

/// POST /auth/register - Register a new admin account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);
    if !is_plausible_email(&email) {
        return Err(ApiError(AppError::rejected(
            "INVALID_EMAIL",
            Some("email"),
            "Email is not valid",
        )));
    }
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError(AppError::rejected(
            "BLANK_FIELD",
            Some("name"),
            "name can't be blank",
        )));
    }
    check_password_strength(&payload.password)?;

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(&email).await? {
        return Err(ApiError(AppError::Conflict(
            "Email already registered".to_string(),
        )));
    }

    let user = user_repo
        .create(CreateUserInput {
            email,
            password_hash: hash_password(&payload.password)?,
            name: name.to_string(),
            role: UserRole::Admin,
            admin_id: None,
        })
        .await
        .map_err(user_insert_error)?;

    let response = issue_for(&state, &user)?;
    info!(user_id = %user.id, "Admin registered");

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
///
/// The role in the new tokens is read from the current user row.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token, TokenKind::Refresh)?;

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_id(UserId::from_uuid(claims.user_id())).await? else {
        return Err(ApiError(AppError::Unauthorized(
            "User no longer exists".to_string(),
        )));
    };

    let response = issue_for(&state, &user)?;
    info!(user_id = %user.id, "Tokens refreshed");

    Ok((StatusCode::OK, Json(response)))
}

/// GET /auth/user - The signed-in user.
async fn current_user(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(caller.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::Unauthorized("User no longer exists".to_string())))?;

    Ok(Json(user_info(&user)))
}
