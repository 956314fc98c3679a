use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    catalog::{self, client::CatalogApi},
    error::ApiError,
    pagination::{total_pages, PageQuery},
    users::repo::User,
};

use super::dto::{CreateUserGameRequest, UserGamePage};
use super::repo::UserGame;

/// Ratings live on a 0..5 scale, both ends inclusive.
pub(crate) fn validate_rating(rating: Option<f64>) -> Result<(), ApiError> {
    if let Some(r) = rating {
        if !(0.0..=5.0).contains(&r) {
            return Err(ApiError::Validation("Rating must be between 0 and 5".into()));
        }
    }
    Ok(())
}

/// Creates a record after checking both foreign references. The checks are
/// sequential and short-circuit: the user (active) first, then the catalog
/// game.
pub async fn create(
    db: &PgPool,
    catalog_api: &dyn CatalogApi,
    req: CreateUserGameRequest,
) -> Result<UserGame, ApiError> {
    if User::find_by_id(db, req.user_id).await?.is_none() {
        return Err(ApiError::InvalidReference("User not found"));
    }

    let game = catalog::services::game_details(catalog_api, req.game_id)
        .await
        .map_err(ApiError::Upstream)?;
    if game.is_none() {
        return Err(ApiError::InvalidReference("Game not found in catalog"));
    }

    let record = UserGame::create(
        db,
        req.user_id,
        req.game_id,
        req.finished_at,
        req.rating,
        req.comment.as_deref(),
    )
    .await?;
    info!(record_id = %record.id, user_id = %record.user_id, "game record created");
    Ok(record)
}

/// Paginated records for one user, newest first. A user with no records is
/// an empty page with zero totals, not an error; an unknown or soft-deleted
/// user is `NotFound`.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    p: &PageQuery,
) -> Result<UserGamePage, ApiError> {
    let offset = p.validate()?;

    if User::find_by_id(db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User"));
    }

    let total_items = UserGame::count_by_user(db, user_id).await?;
    let games = UserGame::list_by_user(db, user_id, p.limit, offset).await?;
    Ok(UserGamePage {
        total_items,
        total_pages: total_pages(total_items, p.limit),
        current_page: p.page,
        games,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(Some(0.0)).is_ok());
        assert!(validate_rating(Some(5.0)).is_ok());
        assert!(validate_rating(Some(3.7)).is_ok());
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(-0.1)).is_err());
        assert!(validate_rating(Some(5.1)).is_err());
    }
}
