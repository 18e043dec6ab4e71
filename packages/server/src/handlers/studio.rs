use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::entity::role::ADMIN_ROLE;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::game::GameResponse;
use crate::models::shared::SortQuery;
use crate::models::studio::*;
use crate::services::StudioService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/studios",
    tag = "Studios",
    operation_id = "createStudio",
    summary = "Create a new studio",
    description = "Creates a studio with an empty game collection. A body that carries an `id` is rejected.",
    request_body = CreateStudioRequest,
    responses(
        (status = 201, description = "Studio created", body = CreateStudioResponse),
        (status = 400, description = "Invalid body (INVALID_ARGUMENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_studio(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStudioRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_studio(&payload)?;

    let studio = StudioService::new(&state.db)
        .insert(payload.into_studio())
        .await?;

    Ok((StatusCode::CREATED, Json(CreateStudioResponse::from(studio))))
}

#[utoipa::path(
    get,
    path = "/studios",
    tag = "Studios",
    operation_id = "listStudios",
    summary = "List studios",
    description = "Returns every studio with its games, ordered by id.",
    params(SortQuery),
    responses(
        (status = 200, description = "List of studios", body = Vec<StudioResponse>),
        (status = 400, description = "Invalid sortDir (INVALID_ARGUMENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_studios(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SortQuery>,
) -> Result<Json<Vec<StudioResponse>>, AppError> {
    let dir = query.sort_dir()?;

    let studios = StudioService::new(&state.db).list(dir).await?;
    Ok(Json(studios.into_iter().map(StudioResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/studios/{id}",
    tag = "Studios",
    operation_id = "getStudio",
    summary = "Get a studio by ID",
    params(("id" = i32, Path, description = "Studio ID")),
    responses(
        (status = 200, description = "Studio details", body = StudioResponse),
        (status = 404, description = "Studio not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_studio(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudioResponse>, AppError> {
    let studio = StudioService::new(&state.db).get(id).await?;
    Ok(Json(studio.into()))
}

#[utoipa::path(
    get,
    path = "/studios/{id}/games",
    tag = "Studios",
    operation_id = "listStudioGames",
    summary = "List the games of a studio",
    params(("id" = i32, Path, description = "Studio ID"), SortQuery),
    responses(
        (status = 200, description = "Games owned by the studio", body = Vec<GameResponse>),
        (status = 400, description = "Invalid sortDir (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 404, description = "Studio not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(id))]
pub async fn list_studio_games(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppQuery(query): AppQuery<SortQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let dir = query.sort_dir()?;

    let games = StudioService::new(&state.db).list_games(id, dir).await?;
    Ok(Json(games.into_iter().map(GameResponse::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/studios/{id}",
    tag = "Studios",
    operation_id = "updateStudio",
    summary = "Update a studio",
    description = "Replaces name, location and creation date. All fields are required; the game collection is not touched.",
    params(("id" = i32, Path, description = "Studio ID")),
    request_body = UpdateStudioRequest,
    responses(
        (status = 200, description = "Studio updated", body = StudioResponse),
        (status = 400, description = "Invalid body (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 404, description = "Studio not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_studio(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateStudioRequest>,
) -> Result<Json<StudioResponse>, AppError> {
    validate_update_studio(&payload)?;

    let studio = StudioService::new(&state.db)
        .update(id, payload.into())
        .await?;
    Ok(Json(studio.into()))
}

#[utoipa::path(
    delete,
    path = "/studios/{id}",
    tag = "Studios",
    operation_id = "deleteStudio",
    summary = "Delete a studio",
    description = "Deletes the studio and every game it owns. Requires the `ADMIN` role.",
    params(("id" = i32, Path, description = "Studio ID")),
    responses(
        (status = 200, description = "Studio deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Studio not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_studio(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_role(ADMIN_ROLE)?;

    StudioService::new(&state.db).delete(id).await?;
    Ok(StatusCode::OK)
}
