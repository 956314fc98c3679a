use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A finished-game record. Unlike users there is no soft-delete: a record
/// is either present or hard-deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserGame {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: i64,
    pub finished_at: OffsetDateTime,
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl UserGame {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        game_id: i64,
        finished_at: OffsetDateTime,
        rating: Option<f64>,
        comment: Option<&str>,
    ) -> anyhow::Result<UserGame> {
        let record = sqlx::query_as::<_, UserGame>(
            r#"
            INSERT INTO user_games (user_id, game_id, finished_at, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, game_id, finished_at, rating, comment, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(game_id)
        .bind(finished_at)
        .bind(rating)
        .bind(comment)
        .fetch_one(db)
        .await?;
        Ok(record)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<UserGame>> {
        let rows = sqlx::query_as::<_, UserGame>(
            r#"
            SELECT id, user_id, game_id, finished_at, rating, comment, created_at, updated_at
            FROM user_games
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_games WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await?;
        Ok(count.0)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<UserGame>> {
        let record = sqlx::query_as::<_, UserGame>(
            r#"
            SELECT id, user_id, game_id, finished_at, rating, comment, created_at, updated_at
            FROM user_games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }

    /// Full replace of the three mutable fields.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        finished_at: OffsetDateTime,
        rating: Option<f64>,
        comment: Option<&str>,
    ) -> anyhow::Result<Option<UserGame>> {
        let record = sqlx::query_as::<_, UserGame>(
            r#"
            UPDATE user_games
            SET finished_at = $2, rating = $3, comment = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, game_id, finished_at, rating, comment, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(finished_at)
        .bind(rating)
        .bind(comment)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }

    /// Hard delete; returns the removed row for confirmation.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<Option<UserGame>> {
        let record = sqlx::query_as::<_, UserGame>(
            r#"
            DELETE FROM user_games
            WHERE id = $1
            RETURNING id, user_id, game_id, finished_at, rating, comment, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }
}
