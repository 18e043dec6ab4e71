use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/studios", studio_routes())
        .nest("/games", game_routes())
        .nest("/users", user_routes())
}

fn studio_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::studio::list_studios).post(handlers::studio::create_studio),
        )
        .route(
            "/{id}",
            get(handlers::studio::get_studio)
                .patch(handlers::studio::update_studio)
                .delete(handlers::studio::delete_studio),
        )
        .route("/{id}/games", get(handlers::studio::list_studio_games))
}

fn game_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::game::list_games).post(handlers::game::create_game),
        )
        .route("/name", get(handlers::game::search_games))
        .route(
            "/{id}",
            get(handlers::game::get_game)
                .patch(handlers::game::update_game)
                .delete(handlers::game::delete_game),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::user::list_users).post(handlers::user::register),
        )
        .route("/login", post(handlers::user::login))
        .route("/me", get(handlers::user::me))
        .route(
            "/{id}",
            get(handlers::user::get_user)
                .patch(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
        .route("/{id}/roles/{role}", put(handlers::user::grant_role))
}
