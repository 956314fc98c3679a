use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::ApiError, pagination::PageQuery, state::AppState};

use super::dto::{CreateUserGameRequest, UpdateUserGameRequest, UserGamePage};
use super::repo::UserGame;
use super::services;

#[instrument(skip(state, payload))]
pub async fn create_user_game(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(payload): Json<CreateUserGameRequest>,
) -> Result<(StatusCode, Json<UserGame>), ApiError> {
    services::validate_rating(payload.rating)?;
    let record = services::create(&state.db, state.catalog.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn list_user_games(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(p): Query<PageQuery>,
) -> Result<Json<UserGamePage>, ApiError> {
    let page = services::list_by_user(&state.db, user_id, &p).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn get_user_game(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserGame>, ApiError> {
    let record = UserGame::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Record"))?;
    Ok(Json(record))
}

#[instrument(skip(state, payload))]
pub async fn update_user_game(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserGameRequest>,
) -> Result<Json<UserGame>, ApiError> {
    services::validate_rating(payload.rating)?;
    let record = UserGame::update(
        &state.db,
        id,
        payload.finished_at,
        payload.rating,
        payload.comment.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("Record"))?;
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn delete_user_game(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserGame>, ApiError> {
    let record = UserGame::delete(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Record"))?;
    Ok(Json(record))
}
