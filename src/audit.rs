use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{error::AuditEntry, state::AppState};

/// Append-only audit row for unhandled failures. Never mutated or deleted
/// by the application.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub id: Uuid,
    pub level: String,
    pub message: String,
    pub stack: Option<String>,
    pub route: Option<String>,
    pub method: Option<String>,
    pub created_at: OffsetDateTime,
}

impl SystemLog {
    pub async fn record(
        db: &PgPool,
        level: &str,
        message: &str,
        stack: Option<&str>,
        route: &str,
        method: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO system_logs (level, message, stack, route, method)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(level)
        .bind(message)
        .bind(stack)
        .bind(route)
        .bind(method)
        .execute(db)
        .await?;
        Ok(())
    }
}

/// Persists uncategorized failures flagged by the error mapper. The audit
/// write's own failure is only logged, never propagated, so a broken audit
/// table cannot cascade into request failures.
pub async fn record_failures(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = req.uri().path().to_string();

    let res = next.run(req).await;

    if let Some(entry) = res.extensions().get::<AuditEntry>().cloned() {
        if let Err(e) = SystemLog::record(
            &state.db,
            "error",
            &entry.message,
            entry.stack.as_deref(),
            &route,
            &method,
        )
        .await
        {
            tracing::error!(error = %e, %route, %method, "failed to write system log entry");
        }
    }

    res
}
