use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Reads configuration from the environment. Secrets are required:
    /// startup fails rather than falling back to a built-in default.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        let catalog = CatalogConfig {
            client_id: std::env::var("IGDB_CLIENT_ID").context("IGDB_CLIENT_ID must be set")?,
            client_secret: std::env::var("IGDB_CLIENT_SECRET")
                .context("IGDB_CLIENT_SECRET must be set")?,
        };
        Ok(Self {
            database_url,
            jwt,
            catalog,
        })
    }
}
