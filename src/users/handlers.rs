use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::{AuthUser, SessionKeys},
    error::ApiError,
    pagination::{total_pages, PageQuery},
    state::AppState,
};

use super::dto::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserPage};
use super::repo::User;
use super::services;

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = services::register(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = SessionKeys::from_ref(&state);
    let (user, token) =
        services::issue_session(&state.db, &keys, &payload.email, &payload.password).await?;
    Ok(Json(AuthResponse { user, token }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Query(p): Query<PageQuery>,
) -> Result<Json<UserPage>, ApiError> {
    let offset = p.validate()?;
    let total_items = User::count_active(&state.db).await?;
    let users = User::list(&state.db, p.limit, offset).await?;
    Ok(Json(UserPage {
        total_items,
        total_pages: total_pages(total_items, p.limit),
        current_page: p.page,
        users,
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = services::update_profile(&state.db, id, payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = User::deactivate(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user))
}
