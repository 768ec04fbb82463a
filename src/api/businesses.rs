use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extract::CurrentAdmin;
use crate::db::businesses::BusinessRepository;
use crate::db::models::{Business, BusinessPatch, BusinessSocials};
use crate::error::AppError;
use crate::state::AppState;

/// Payload accepted by `POST /api/businesses`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub socials: BusinessSocials,
}

/// Payload accepted by `PUT /api/businesses`: the target id plus any subset
/// of the mutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateBusinessRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: BusinessPatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// A business as returned by the API: `_id` as a hex string, socials always
/// fully keyed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub link: String,
    pub socials: BusinessSocials,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Business> for BusinessResponse {
    fn from(business: Business) -> Self {
        Self {
            id: business.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: business.name,
            image: business.image,
            description: business.description,
            link: business.link,
            socials: business.socials,
            created_at: business.created_at,
            updated_at: business.updated_at,
        }
    }
}

pub async fn process_list(
    repo: &dyn BusinessRepository,
) -> Result<Vec<BusinessResponse>, AppError> {
    let businesses = repo.list().await?;
    Ok(businesses.into_iter().map(BusinessResponse::from).collect())
}

pub async fn process_create(
    repo: &dyn BusinessRepository,
    request: CreateBusinessRequest,
) -> Result<BusinessResponse, AppError> {
    if request.name.is_empty() {
        return Err(AppError::BadRequest("Business name is required".into()));
    }

    let now = Utc::now();
    let business = repo
        .insert(Business {
            id: None,
            name: request.name,
            image: request.image,
            description: request.description,
            link: request.link,
            socials: request.socials,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(business.into())
}

pub async fn process_update(
    repo: &dyn BusinessRepository,
    request: UpdateBusinessRequest,
) -> Result<BusinessResponse, AppError> {
    let id = parse_id(&request.id)?;

    let business = repo
        .update(id, request.patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    Ok(business.into())
}

pub async fn process_delete(
    repo: &dyn BusinessRepository,
    id: Option<String>,
) -> Result<(), AppError> {
    let id = id.ok_or_else(|| AppError::BadRequest("Business ID is required".into()))?;
    let id = parse_id(&id)?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Business not found".into()));
    }

    Ok(())
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid business id".into()))
}

/// `GET /api/businesses` — public list.
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<BusinessResponse>>, AppError> {
    Ok(Json(process_list(state.businesses.as_ref()).await?))
}

/// `POST /api/businesses` — admin create.
pub async fn create_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(request): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<BusinessResponse>), AppError> {
    let business = process_create(state.businesses.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(business)))
}

/// `PUT /api/businesses` — admin merge-update, addressed by id in the body.
pub async fn update_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(request): Json<UpdateBusinessRequest>,
) -> Result<Json<BusinessResponse>, AppError> {
    Ok(Json(process_update(state.businesses.as_ref(), request).await?))
}

/// `DELETE /api/businesses?id=` — admin delete.
pub async fn delete_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    process_delete(state.businesses.as_ref(), params.id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
