use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games", post(handlers::create_user_game))
        .route("/games/user/:id", get(handlers::list_user_games))
        .route(
            "/games/:id",
            get(handlers::get_user_game)
                .put(handlers::update_user_game)
                .delete(handlers::delete_user_game),
        )
}
