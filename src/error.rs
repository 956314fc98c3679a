use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure kinds raised by the services. Handlers never pick status codes
/// themselves; the mapping lives in the single `IntoResponse` impl below.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Incorrect password")]
    InvalidCredential,

    #[error("{0}")]
    InvalidReference(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Upstream catalog error: {0}")]
    Upstream(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Body shape for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Carried through the response extensions so the audit middleware can
/// persist unexpected failures with their route and method.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub message: String,
    pub stack: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCredential | ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let audit = match &self {
            ApiError::Upstream(e) | ApiError::Internal(e) => Some(AuditEntry {
                message: self.to_string(),
                stack: Some(format!("{e:?}")),
            }),
            _ => None,
        };

        let mut res = (
            status,
            Json(ErrorBody {
                success: false,
                message: self.to_string(),
            }),
        )
            .into_response();

        if let Some(entry) = audit {
            res.extensions_mut().insert(entry);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status_codes() {
        let cases = [
            (
                ApiError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound("User"), StatusCode::NOT_FOUND),
            (ApiError::InvalidCredential, StatusCode::UNAUTHORIZED),
            (
                ApiError::InvalidReference("Game not found in catalog"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Conflict("Email already registered".into()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Unauthenticated("missing Authorization header"),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Upstream(anyhow::anyhow!("boom")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn internal_error_hides_the_cause_from_the_body() {
        let err = ApiError::Internal(anyhow::anyhow!("connection pool exhausted"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn unexpected_failures_carry_an_audit_entry() {
        let res = ApiError::Internal(anyhow::anyhow!("db down")).into_response();
        let entry = res.extensions().get::<AuditEntry>().expect("audit entry");
        assert_eq!(entry.message, "Internal server error");
        assert!(entry.stack.as_deref().unwrap_or("").contains("db down"));

        let res = ApiError::NotFound("User").into_response();
        assert!(res.extensions().get::<AuditEntry>().is_none());
    }
}
