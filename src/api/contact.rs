use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::messages::MessageRepository;
use crate::db::models::{ContactMessage, MessageStatus};
use crate::error::AppError;
use crate::state::AppState;

/// Payload accepted by the public contact form.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

/// Minimal `local@domain.tld` shape check: no whitespace, exactly one `@`,
/// and a dot somewhere inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.chars().any(char::is_whitespace)
                && !domain.chars().any(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

pub async fn process_contact(
    repo: &dyn MessageRepository,
    request: ContactRequest,
) -> Result<ContactResponse, AppError> {
    if request.name.is_empty() || request.email.is_empty() || request.message.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email, and message are required".into(),
        ));
    }

    if !is_valid_email(&request.email) {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    let now = Utc::now();
    let message = repo
        .insert(ContactMessage {
            id: None,
            name: request.name,
            email: request.email,
            message: request.message,
            phone: request.phone,
            subject: request.subject,
            status: MessageStatus::Unread,
            is_archived: false,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ContactResponse {
        success: true,
        message: "Message sent successfully".to_string(),
        id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
    })
}

/// `POST /api/contact` — public contact form submission.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    Ok(Json(process_contact(state.messages.as_ref(), request).await?))
}
