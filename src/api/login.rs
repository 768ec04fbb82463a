use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extract::CurrentAdmin;
use crate::auth::gate::{generate_token, token_digest, verify_credentials, SESSION_TTL_DAYS};
use crate::db::sessions::SessionRecord;
use crate::error::AppError;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body. The token doubles as the `token` cookie value.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub username: String,
}

/// `POST /api/login` — validate admin credentials and issue a session.
///
/// On success the opaque token is returned in the body and set as an
/// HTTP-only, SameSite=Lax cookie expiring with the session record.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    if !verify_credentials(&state.config, &request.username, &request.password) {
        return Err(AppError::Auth("Invalid credentials".into()));
    }

    let token = generate_token();
    let now = Utc::now();
    state
        .sessions
        .insert(SessionRecord {
            id: None,
            token_hash: token_digest(&token),
            username: request.username.clone(),
            created_at: now,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        })
        .await?;

    tracing::info!("Admin '{}' logged in", request.username);

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            token,
            username: request.username,
        }),
    ))
}

/// `POST /api/logout` — invalidate the current session and clear the cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), AppError> {
    state.sessions.delete(&admin.token_hash).await?;

    tracing::info!("Admin '{}' logged out", admin.username);

    let cookie = Cookie::build(("token", "")).path("/").removal().build();

    Ok((
        jar.remove(cookie),
        Json(serde_json::json!({ "success": true })),
    ))
}
