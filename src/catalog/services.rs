use time::{macros::format_description, Duration, OffsetDateTime};

use super::client::CatalogApi;
use super::dto::{GameDetails, GamesList, IgdbGame};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// Upstream release timestamps are midnight UTC; shifting by +3h keeps the
/// calendar day correct for the target locale.
const RELEASE_DATE_OFFSET: Duration = Duration::hours(3);

/// Lists catalog games sorted by rating-count descending, capped at `limit`.
pub async fn list_games(catalog: &dyn CatalogApi, limit: i64) -> anyhow::Result<GamesList> {
    let query = format!(
        "fields id, name, cover.url, platforms.name, summary, total_rating; \
         sort total_rating_count desc; limit {limit};"
    );
    let games = catalog.get_games(&query).await?;
    Ok(GamesList { games })
}

/// Fetches a single catalog record and post-processes it for display.
/// Absence is `Ok(None)`, not an error.
pub async fn game_details(
    catalog: &dyn CatalogApi,
    id: i64,
) -> anyhow::Result<Option<GameDetails>> {
    let query = format!(
        "fields id, name, cover.url, first_release_date, genres.name, platforms.name, \
         total_rating, storyline, summary, videos.video_id; where id = {id};"
    );
    let games = catalog.get_games(&query).await?;
    let Some(game) = games.into_iter().next() else {
        return Ok(None);
    };
    Ok(Some(post_process(game)))
}

fn post_process(game: IgdbGame) -> GameDetails {
    let cover = game
        .cover
        .map(|c| c.url.replace("t_thumb", "t_cover_big"));
    let release_date = game.first_release_date.and_then(format_release_date);
    let videos = game
        .videos
        .unwrap_or_default()
        .into_iter()
        .map(|v| format!("{YOUTUBE_BASE_URL}{}", v.video_id))
        .collect();

    GameDetails {
        id: game.id,
        name: game.name,
        cover,
        release_date,
        genres: game.genres,
        platforms: game.platforms,
        total_rating: game.total_rating,
        storyline: game.storyline,
        summary: game.summary,
        videos,
    }
}

fn format_release_date(ts: i64) -> Option<String> {
    let date = OffsetDateTime::from_unix_timestamp(ts).ok()? + RELEASE_DATE_OFFSET;
    let fmt = format_description!("[day]/[month]/[year]");
    date.format(&fmt).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dto::{IgdbCover, IgdbVideo};
    use async_trait::async_trait;
    use time::macros::datetime;

    struct FakeCatalog {
        games: Vec<IgdbGame>,
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn get_games(&self, _query: &str) -> anyhow::Result<Vec<IgdbGame>> {
            Ok(self.games.clone())
        }
    }

    fn bare_game(id: i64) -> IgdbGame {
        IgdbGame {
            id,
            name: Some("The Witcher 3".into()),
            cover: None,
            first_release_date: None,
            genres: None,
            platforms: None,
            total_rating: None,
            storyline: None,
            summary: None,
            videos: None,
        }
    }

    #[tokio::test]
    async fn absent_game_is_none_not_an_error() {
        let catalog = FakeCatalog { games: vec![] };
        let details = game_details(&catalog, 999).await.unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn cover_url_is_rewritten_to_the_big_variant() {
        let mut game = bare_game(1942);
        game.cover = Some(IgdbCover {
            url: "//images.igdb.com/igdb/image/upload/t_thumb/co1wyy.jpg".into(),
        });
        let catalog = FakeCatalog { games: vec![game] };

        let details = game_details(&catalog, 1942).await.unwrap().unwrap();
        assert_eq!(
            details.cover.as_deref(),
            Some("//images.igdb.com/igdb/image/upload/t_cover_big/co1wyy.jpg")
        );
    }

    #[tokio::test]
    async fn release_date_is_shifted_and_formatted() {
        let mut game = bare_game(1);
        game.first_release_date = Some(datetime!(2017-11-10 23:00 UTC).unix_timestamp());
        let catalog = FakeCatalog { games: vec![game] };

        // +3h pushes 2017-11-10 23:00 UTC into the next calendar day
        let details = game_details(&catalog, 1).await.unwrap().unwrap();
        assert_eq!(details.release_date.as_deref(), Some("11/11/2017"));
    }

    #[tokio::test]
    async fn video_ids_become_full_urls() {
        let mut game = bare_game(1);
        game.videos = Some(vec![
            IgdbVideo {
                video_id: "abc123".into(),
            },
            IgdbVideo {
                video_id: "xyz789".into(),
            },
        ]);
        let catalog = FakeCatalog { games: vec![game] };

        let details = game_details(&catalog, 1).await.unwrap().unwrap();
        assert_eq!(
            details.videos,
            vec![
                "https://www.youtube.com/watch?v=abc123",
                "https://www.youtube.com/watch?v=xyz789"
            ]
        );
    }

    #[tokio::test]
    async fn missing_optional_fields_stay_absent() {
        let catalog = FakeCatalog {
            games: vec![bare_game(7)],
        };
        let details = game_details(&catalog, 7).await.unwrap().unwrap();
        assert!(details.cover.is_none());
        assert!(details.release_date.is_none());
        assert!(details.videos.is_empty());
    }

    #[tokio::test]
    async fn list_games_passes_records_through_unprocessed() {
        let catalog = FakeCatalog {
            games: vec![bare_game(1), bare_game(2)],
        };
        let list = list_games(&catalog, 10).await.unwrap();
        assert_eq!(list.games.len(), 2);
        assert_eq!(list.games[0].id, 1);
    }
}
