//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the user's UUID. Handlers opt
//! into authentication by taking an [`AuthUser`] argument; there is no
//! blanket middleware, which keeps the public read endpoints out of the auth
//! path entirely.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use clipshelf_core::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const TOKEN_ISSUER: &str = "clipshelf";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: Uuid,
    pub exp: u64,
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("Authorization header is not a bearer token".to_string())
        })
}

/// Decode and validate a token against `secret`. Expiry and issuer are
/// checked; any failure collapses to a single unauthenticated error.
pub fn verify_token(secret: &str, token: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::Unauthenticated(format!("Invalid token: {}", e)))?;

    Ok(data.claims.sub)
}

/// Mint a token for `user_id`, valid for `ttl`.
pub fn issue_token(secret: &str, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| AppError::Internal(format!("System clock error: {}", e)))?;

    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id,
        exp: (now + ttl).as_secs(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = verify_token(&state.config.jwt_secret, token)?;
        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn round_trips_user_id() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, Duration::from_secs(60)).unwrap();
        assert_eq!(verify_token(SECRET, &token).unwrap(), user_id);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::from_secs(60)).unwrap();
        assert!(verify_token("another-secret-another-secret!!!", &token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: Uuid::new_v4(),
            exp: 1_000, // long past
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn rejects_foreign_issuer() {
        let claims = Claims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4(),
            exp: u64::MAX / 2,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
