use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::UserGame;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserGameRequest {
    pub user_id: Uuid,
    pub game_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// Full replace of the mutable fields; this is not a patch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserGameRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGamePage {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub games: Vec<UserGame>,
}
