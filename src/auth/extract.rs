use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::auth::gate::token_digest;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid admin session.
///
/// The token is taken from the `Authorization: Bearer` header, falling back
/// to the `token` cookie set at login, and must hash-match an unexpired
/// session record. Handlers for mutating endpoints take this as an argument;
/// rejection is a 401 with the usual `{"error": ...}` body.
pub struct CurrentAdmin {
    pub username: String,
    pub token_hash: String,
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_token(&parts.headers))
            .ok_or_else(|| AppError::Auth("Authentication required".into()))?;

        let token_hash = token_digest(&token);
        let session = state
            .sessions
            .find_valid(&token_hash, Utc::now())
            .await?
            .ok_or_else(|| AppError::Auth("Invalid or expired session".into()))?;

        Ok(Self {
            username: session.username,
            token_hash,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get("token")
        .map(|cookie| cookie.value().to_string())
}
