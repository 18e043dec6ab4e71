use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::domain::SortDir;
use crate::entity::role::ADMIN_ROLE;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::shared::validate_name;
use crate::models::user::*;
use crate::services::UserService;
use crate::state::AppState;
use crate::utils::jwt;

/// Handle user registration.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    operation_id = "registerUser",
    summary = "Register a new user",
    description = "Creates an account with the `USER` role.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid body (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let account = UserService::new(&state.db)
        .register(
            payload.name.trim().to_string(),
            &payload.email,
            &payload.password,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

/// Handle user login.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    operation_id = "login",
    summary = "Exchange credentials for a bearer token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Invalid body (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let account = UserService::new(&state.db)
        .authenticate(&payload.email, &payload.password)
        .await?;

    let auth = &state.config.auth;
    let token = jwt::sign(
        account.id,
        &account.email,
        account.roles.clone(),
        &auth.jwt_secret,
        auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

/// Return the current authenticated user's info.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let account = UserService::new(&state.db).get(auth_user.user_id).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users",
    description = "Requires the `ADMIN` role.",
    params(UserListQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 400, description = "Invalid sortDir (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    auth_user.require_role(ADMIN_ROLE)?;
    let dir = SortDir::parse(query.sort_dir.as_deref())?;

    let users = UserService::new(&state.db)
        .list(dir, query.role.as_deref())
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user by ID",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_user(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let account = UserService::new(&state.db).get(id).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Rename a user",
    description = "Allowed for the account owner and for admins.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid body (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self_or_admin(id)?;
    validate_name("Name", &payload.name)?;

    let account = UserService::new(&state.db)
        .update_name(id, payload.name.trim().to_string())
        .await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    summary = "Delete a user",
    description = "Requires the `ADMIN` role.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_role(ADMIN_ROLE)?;

    UserService::new(&state.db).delete(id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/users/{id}/roles/{role}",
    tag = "Users",
    operation_id = "grantRole",
    summary = "Grant a role to a user",
    description = "Requires the `ADMIN` role. Granting a role the user already holds is a no-op. Takes effect on the user's next login.",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("role" = String, Path, description = "Role name, case-insensitive"),
    ),
    responses(
        (status = 200, description = "Role granted", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User or role not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn grant_role(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, role)): Path<(i32, String)>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_role(ADMIN_ROLE)?;

    let account = UserService::new(&state.db).grant_role(id, &role).await?;
    Ok(Json(account.into()))
}
