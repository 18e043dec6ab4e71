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
use crate::models::game::*;
use crate::models::shared::SortQuery;
use crate::services::GameService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/games",
    tag = "Games",
    operation_id = "createGame",
    summary = "Create a game inside a studio",
    description = "Appends a game to the studio identified by `studioId`. A missing studio is a bad request, not a 404. `launchDate` defaults to today.",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameResponse),
        (status = 400, description = "Invalid body or unknown studio (INVALID_ARGUMENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(studio_id = payload.studio_id, name = %payload.name))]
pub async fn create_game(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_game(&payload)?;

    let studio_id = payload.studio_id;
    let game = GameService::new(&state.db)
        .insert(payload.into_game(), studio_id)
        .await?;

    Ok((StatusCode::CREATED, Json(GameResponse::from(game))))
}

#[utoipa::path(
    get,
    path = "/games",
    tag = "Games",
    operation_id = "listGames",
    summary = "List games",
    params(SortQuery),
    responses(
        (status = 200, description = "List of games", body = Vec<GameResponse>),
        (status = 400, description = "Invalid sortDir (INVALID_ARGUMENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_games(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SortQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let dir = query.sort_dir()?;

    let games = GameService::new(&state.db).list(dir).await?;
    Ok(Json(games.into_iter().map(GameResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/games/name",
    tag = "Games",
    operation_id = "searchGamesByName",
    summary = "Search games by name",
    description = "Case-insensitive substring match on the game name.",
    params(GameSearchQuery),
    responses(
        (status = 200, description = "Matching games", body = Vec<GameResponse>),
        (status = 400, description = "Missing name parameter (INVALID_ARGUMENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(name = %query.name))]
pub async fn search_games(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<GameSearchQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let games = GameService::new(&state.db)
        .search_by_name(&query.name)
        .await?;
    Ok(Json(games.into_iter().map(GameResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "Games",
    operation_id = "getGame",
    summary = "Get a game by ID",
    params(("id" = i32, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Game details", body = GameResponse),
        (status = 404, description = "Game not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GameResponse>, AppError> {
    let game = GameService::new(&state.db).get(id).await?;
    Ok(Json(game.into()))
}

#[utoipa::path(
    patch,
    path = "/games/{id}",
    tag = "Games",
    operation_id = "updateGame",
    summary = "Update a game",
    description = "Replaces name, overview and launch date. The owning studio cannot be changed.",
    params(("id" = i32, Path, description = "Game ID")),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Game updated", body = GameResponse),
        (status = 400, description = "Invalid body (INVALID_ARGUMENT)", body = ErrorBody),
        (status = 404, description = "Game not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    validate_update_game(&payload)?;

    let game = GameService::new(&state.db)
        .update(id, payload.into())
        .await?;
    Ok(Json(game.into()))
}

#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "Games",
    operation_id = "deleteGame",
    summary = "Delete a game",
    description = "Requires the `ADMIN` role.",
    params(("id" = i32, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Game deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Game not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_game(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_role(ADMIN_ROLE)?;

    GameService::new(&state.db).delete(id).await?;
    Ok(StatusCode::OK)
}
