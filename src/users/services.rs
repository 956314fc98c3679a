use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::SessionKeys,
        password::{hash_password, verify_password},
    },
    error::ApiError,
};

use super::dto::{RegisterRequest, UpdateUserRequest};
use super::repo::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration requires at least a first and a last name.
pub(crate) fn is_full_name(name: &str) -> bool {
    name.split_whitespace().count() >= 2 && name.trim().len() >= 2
}

pub async fn register(db: &PgPool, mut req: RegisterRequest) -> Result<User, ApiError> {
    req.email = req.email.trim().to_lowercase();

    if !is_full_name(&req.name) {
        return Err(ApiError::Validation(
            "Name must include first and last name".into(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if req.password.len() < 6 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(db, &req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&req.password)?;
    let user = User::create(db, req.name.trim(), &req.email, &hash).await?;
    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Verifies credentials and issues a signed session token.
///
/// An unknown (or soft-deleted) email fails with `NotFound` before the
/// password is ever inspected; `InvalidCredential` is only reachable after
/// a successful lookup.
pub async fn issue_session(
    db: &PgPool,
    keys: &SessionKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), ApiError> {
    let email = email.trim().to_lowercase();

    let user = User::find_by_email(db, &email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with incorrect password");
        return Err(ApiError::InvalidCredential);
    }

    let token = keys.sign(user.id, &user.email)?;
    User::touch_last_login(db, user.id).await?;
    info!(user_id = %user.id, "session issued");
    Ok((user, token))
}

pub async fn update_profile(
    db: &PgPool,
    id: Uuid,
    req: UpdateUserRequest,
) -> Result<User, ApiError> {
    if let Some(name) = &req.name {
        if !is_full_name(name) {
            return Err(ApiError::Validation(
                "Name must include first and last name".into(),
            ));
        }
    }
    let email = match &req.email {
        Some(e) => {
            let e = e.trim().to_lowercase();
            if !is_valid_email(&e) {
                return Err(ApiError::Validation("Invalid email".into()));
            }
            Some(e)
        }
        None => None,
    };
    let password_hash = match &req.password {
        Some(p) => {
            if p.len() < 6 {
                return Err(ApiError::Validation("Password too short".into()));
            }
            Some(hash_password(p)?)
        }
        None => None,
    };

    let user = User::update(
        db,
        id,
        req.name.as_deref().map(str::trim),
        email.as_deref(),
        password_hash.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("User"))?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("joao@email.com"));
        assert!(is_valid_email("a.b@c.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn full_name_requires_a_surname() {
        assert!(is_full_name("João Silva"));
        assert!(is_full_name("  Ana Maria Souza "));
        assert!(!is_full_name("João"));
        assert!(!is_full_name("   "));
    }
}
