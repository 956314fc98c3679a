use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::dto::{GameDetails, GamesList, LimitQuery};
use super::services;

#[instrument(skip(state))]
pub async fn list_catalog_games(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Query(q): Query<LimitQuery>,
) -> Result<Json<GamesList>, ApiError> {
    if q.limit < 1 {
        return Err(ApiError::Validation("limit must be positive".into()));
    }
    let list = services::list_games(state.catalog.as_ref(), q.limit)
        .await
        .map_err(ApiError::Upstream)?;
    Ok(Json(list))
}

#[instrument(skip(state))]
pub async fn get_catalog_game(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<GameDetails>, ApiError> {
    if id < 1 {
        return Err(ApiError::Validation(
            "Game id must be a positive integer".into(),
        ));
    }
    let game = services::game_details(state.catalog.as_ref(), id)
        .await
        .map_err(ApiError::Upstream)?
        .ok_or(ApiError::NotFound("Game"))?;
    Ok(Json(game))
}
