use axum::extract::{Query, State};
use axum::Json;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::pagination::{has_more, page_window};
use crate::auth::extract::CurrentAdmin;
use crate::db::messages::{MessageFilter, MessageRepository};
use crate::db::models::{ContactMessage, MessagePatch, MessageStatus};
use crate::error::AppError;
use crate::state::AppState;

/// Inbox page size.
const MESSAGES_PER_PAGE: u32 = 8;

/// Recognized query parameters for `GET /api/messages`. Unknown keys are
/// dropped rather than rejected.
#[derive(Debug, Deserialize)]
pub struct MessageListParams {
    pub page: Option<u32>,
    pub status: Option<MessageStatus>,
    pub archived: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

/// A contact message as returned by the inbox API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for MessageResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: message.name,
            email: message.email,
            phone: message.phone,
            subject: message.subject,
            message: message.message,
            status: message.status,
            is_archived: message.is_archived,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub has_more: bool,
    pub total: u64,
}

pub async fn process_list(
    repo: &dyn MessageRepository,
    params: MessageListParams,
) -> Result<MessageListResponse, AppError> {
    let window = page_window(params.page.unwrap_or(1), MESSAGES_PER_PAGE);
    let filter = MessageFilter {
        status: params.status,
        archived: params.archived,
    };

    let (messages, total) = repo.list(filter, window.skip, window.limit).await?;

    Ok(MessageListResponse {
        messages: messages.into_iter().map(MessageResponse::from).collect(),
        has_more: has_more(total, window),
        total,
    })
}

pub async fn process_update(
    repo: &dyn MessageRepository,
    id: Option<String>,
    patch: MessagePatch,
) -> Result<(), AppError> {
    let id = parse_id(id)?;

    repo.update(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))?;

    Ok(())
}

pub async fn process_delete(
    repo: &dyn MessageRepository,
    id: Option<String>,
) -> Result<(), AppError> {
    let id = parse_id(id)?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Message not found".into()));
    }

    Ok(())
}

fn parse_id(id: Option<String>) -> Result<ObjectId, AppError> {
    let id = id.ok_or_else(|| AppError::BadRequest("Message ID is required".into()))?;
    ObjectId::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid message id".into()))
}

/// `GET /api/messages?page=&status=&archived=` — inbox list, newest first.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<MessageListParams>,
) -> Result<Json<MessageListResponse>, AppError> {
    Ok(Json(process_list(state.messages.as_ref(), params).await?))
}

/// `PATCH /api/messages?id=` — admin status/archive update.
pub async fn update_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<IdParams>,
    Json(patch): Json<MessagePatch>,
) -> Result<Json<serde_json::Value>, AppError> {
    process_update(state.messages.as_ref(), params.id, patch).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `DELETE /api/messages?id=` — admin delete.
pub async fn delete_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<IdParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    process_delete(state.messages.as_ref(), params.id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
