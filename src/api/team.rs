use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extract::CurrentAdmin;
use crate::db::models::{TeamMember, TeamPatch, TeamSocials};
use crate::db::team::TeamRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Payload accepted by `POST /api/team`. All four text fields are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub socials: TeamSocials,
}

/// Payload accepted by `PUT /api/team`.
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: TeamPatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// A team member as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub socials: TeamSocials,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamMember> for TeamMemberResponse {
    fn from(member: TeamMember) -> Self {
        Self {
            id: member.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: member.name,
            title: member.title,
            image: member.image,
            description: member.description,
            socials: member.socials,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

pub async fn process_list(
    repo: &dyn TeamRepository,
) -> Result<Vec<TeamMemberResponse>, AppError> {
    let members = repo.list().await?;
    Ok(members.into_iter().map(TeamMemberResponse::from).collect())
}

pub async fn process_create(
    repo: &dyn TeamRepository,
    request: CreateTeamRequest,
) -> Result<TeamMemberResponse, AppError> {
    if request.name.is_empty()
        || request.title.is_empty()
        || request.image.is_empty()
        || request.description.is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, title, image, and description are required".into(),
        ));
    }

    let now = Utc::now();
    let member = repo
        .insert(TeamMember {
            id: None,
            name: request.name,
            title: request.title,
            image: request.image,
            description: request.description,
            socials: request.socials,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(member.into())
}

pub async fn process_update(
    repo: &dyn TeamRepository,
    request: UpdateTeamRequest,
) -> Result<TeamMemberResponse, AppError> {
    let id = parse_id(&request.id)?;

    let member = repo
        .update(id, request.patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Team member not found".into()))?;

    Ok(member.into())
}

pub async fn process_delete(
    repo: &dyn TeamRepository,
    id: Option<String>,
) -> Result<(), AppError> {
    let id = id.ok_or_else(|| AppError::BadRequest("Team member ID is required".into()))?;
    let id = parse_id(&id)?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Team member not found".into()));
    }

    Ok(())
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid team member id".into()))
}

/// `GET /api/team` — public list, oldest member first.
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMemberResponse>>, AppError> {
    Ok(Json(process_list(state.team.as_ref()).await?))
}

/// `POST /api/team` — admin create.
pub async fn create_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamMemberResponse>), AppError> {
    let member = process_create(state.team.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// `PUT /api/team` — admin merge-update, addressed by id in the body.
pub async fn update_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(request): Json<UpdateTeamRequest>,
) -> Result<Json<TeamMemberResponse>, AppError> {
    Ok(Json(process_update(state.team.as_ref(), request).await?))
}

/// `DELETE /api/team?id=` — admin delete.
pub async fn delete_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    process_delete(state.team.as_ref(), params.id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
