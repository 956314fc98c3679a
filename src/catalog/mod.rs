use axum::{routing::get, Router};

use crate::state::AppState;

pub mod client;
pub mod dto;
pub mod handlers;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games/igdb", get(handlers::list_catalog_games))
        .route("/games/igdb/:id", get(handlers::get_catalog_game))
}
