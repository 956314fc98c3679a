use serde::{Deserialize, Serialize};

/// Raw catalog record as returned by the IGDB games endpoint. Fields are
/// optional because each query requests a different projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbGame {
    pub id: i64,
    pub name: Option<String>,
    pub cover: Option<IgdbCover>,
    pub first_release_date: Option<i64>,
    pub genres: Option<Vec<IgdbNamed>>,
    pub platforms: Option<Vec<IgdbNamed>>,
    pub total_rating: Option<f64>,
    pub storyline: Option<String>,
    pub summary: Option<String>,
    pub videos: Option<Vec<IgdbVideo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbCover {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbNamed {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbVideo {
    pub video_id: String,
}

/// Single-game view after post-processing: big cover variant, formatted
/// release date, fully-qualified video URLs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    pub id: i64,
    pub name: Option<String>,
    pub cover: Option<String>,
    pub release_date: Option<String>,
    pub genres: Option<Vec<IgdbNamed>>,
    pub platforms: Option<Vec<IgdbNamed>>,
    pub total_rating: Option<f64>,
    pub storyline: Option<String>,
    pub summary: Option<String>,
    pub videos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GamesList {
    pub games: Vec<IgdbGame>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}
