use std::sync::Mutex;

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::dto::IgdbGame;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const GAMES_URL: &str = "https://api.igdb.com/v4/games";

/// Tokens are treated as expired this long before their real expiry, so a
/// token can never lapse in the middle of a catalog call.
const EXPIRY_MARGIN: Duration = Duration::seconds(60);

/// Read-only access to the external game catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get_games(&self, query: &str) -> anyhow::Result<Vec<IgdbGame>>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: OffsetDateTime,
}

/// Process-wide cache for the upstream bearer token. The lock is only held
/// for the read-check or the overwrite, never across the token exchange, so
/// concurrent callers hitting an expired token may refresh twice; the
/// exchange is idempotent and the duplicate is harmless.
#[derive(Default)]
pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn get_if_valid(&self, now: OffsetDateTime) -> Option<String> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|t| now < t.expires_at)
            .map(|t| t.token.clone())
    }

    pub fn store(&self, token: &str, expires_in_secs: i64, now: OffsetDateTime) {
        let expires_at = now + Duration::seconds(expires_in_secs) - EXPIRY_MARGIN;
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(CachedToken {
            token: token.to_string(),
            expires_at,
        });
    }
}

/// IGDB client authenticating through the Twitch client-credentials grant.
pub struct CatalogClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    games_url: String,
    cache: TokenCache,
}

impl CatalogClient {
    pub fn new(client_id: &str, client_secret: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("build catalog http client")?;
        Ok(Self {
            http,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: TOKEN_URL.to_string(),
            games_url: GAMES_URL.to_string(),
            cache: TokenCache::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_endpoints(
        client_id: &str,
        client_secret: &str,
        token_url: String,
        games_url: String,
    ) -> anyhow::Result<Self> {
        let mut client = Self::new(client_id, client_secret)?;
        client.token_url = token_url;
        client.games_url = games_url;
        Ok(client)
    }

    /// Returns the cached token while it is still inside its validity
    /// window, otherwise exchanges client credentials for a fresh one and
    /// caches it.
    async fn valid_token(&self) -> anyhow::Result<String> {
        if let Some(token) = self.cache.get_if_valid(OffsetDateTime::now_utc()) {
            return Ok(token);
        }

        let response = self
            .http
            .post(&self.token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .context("catalog token exchange failed")?;

        if !response.status().is_success() {
            bail!("catalog token endpoint returned {}", response.status());
        }

        let body: TokenResponse = response
            .json()
            .await
            .context("parse catalog token response")?;
        self.cache
            .store(&body.access_token, body.expires_in, OffsetDateTime::now_utc());
        debug!(expires_in = body.expires_in, "catalog token refreshed");
        Ok(body.access_token)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    /// Issues an APIcalypse query. Upstream failures are surfaced to the
    /// caller as-is; no retries.
    async fn get_games(&self, query: &str) -> anyhow::Result<Vec<IgdbGame>> {
        let token = self.valid_token().await?;
        let response = self
            .http
            .post(&self.games_url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .body(query.to_string())
            .send()
            .await
            .context("catalog query failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("catalog returned {status}: {body}");
        }

        let games = response
            .json::<Vec<IgdbGame>>()
            .await
            .context("parse catalog response")?;
        Ok(games)
    }
}


#[cfg(test)]
mod exchange_tests {
    use super::*;
    use axum::{
        extract::State,
        routing::post,
        Json, Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    async fn token_endpoint(State(exchanges): State<Arc<AtomicUsize>>) -> Json<serde_json::Value> {
        exchanges.fetch_add(1, Ordering::SeqCst);
        Json(serde_json::json!({"access_token": "tok-stub", "expires_in": 3600}))
    }

    async fn games_endpoint() -> Json<serde_json::Value> {
        Json(serde_json::json!([{"id": 1, "name": "Stub Game"}]))
    }

    async fn spawn_stub(exchanges: Arc<AtomicUsize>) -> String {
        let app = Router::new()
            .route("/oauth2/token", post(token_endpoint))
            .route("/v4/games", post(games_endpoint))
            .with_state(exchanges);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn repeated_queries_within_the_validity_window_exchange_once() {
        let exchanges = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(exchanges.clone()).await;

        let client = CatalogClient::with_endpoints(
            "cid",
            "secret",
            format!("{base}/oauth2/token"),
            format!("{base}/v4/games"),
        )
        .expect("build client");

        let first = client.get_games("fields id; limit 1;").await.expect("first query");
        let second = client.get_games("fields id; limit 1;").await.expect("second query");

        assert_eq!(first.len(), 1);
        assert_eq!(second[0].id, 1);
        assert_eq!(exchanges.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_cache_triggers_exactly_one_new_exchange() {
        let exchanges = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(exchanges.clone()).await;

        let client = CatalogClient::with_endpoints(
            "cid",
            "secret",
            format!("{base}/oauth2/token"),
            format!("{base}/v4/games"),
        )
        .expect("build client");

        client.get_games("fields id; limit 1;").await.expect("first query");
        assert_eq!(exchanges.load(Ordering::SeqCst), 1);

        // Backdate the cached token past its window; the next query must
        // exchange again, and only once.
        client.cache.store(
            "tok-stale",
            3600,
            OffsetDateTime::now_utc() - Duration::hours(2),
        );
        client.get_games("fields id; limit 1;").await.expect("query after expiry");
        client.get_games("fields id; limit 1;").await.expect("query on fresh token");
        assert_eq!(exchanges.load(Ordering::SeqCst), 2);
    }
}
