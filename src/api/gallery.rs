use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::pagination::{has_more, page_window};
use crate::auth::extract::CurrentAdmin;
use crate::db::gallery::GalleryRepository;
use crate::db::models::{
    default_category, GalleryItem, GalleryPatch, GalleryPosition, GallerySize,
};
use crate::error::AppError;
use crate::state::AppState;

/// Gallery page size.
const ITEMS_PER_PAGE: u32 = 5;

/// Recognized query parameters for `GET /api/gallery`. Unknown keys are
/// dropped rather than rejected.
#[derive(Debug, Deserialize)]
pub struct GalleryListParams {
    pub page: Option<u32>,
    pub category: Option<String>,
}

/// Payload accepted by `POST /api/gallery`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: GallerySize,
    #[serde(default)]
    pub position: GalleryPosition,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload accepted by `PUT /api/gallery`.
#[derive(Debug, Deserialize)]
pub struct UpdateGalleryRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: GalleryPatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// A gallery item as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub category: String,
    pub size: GallerySize,
    pub position: GalleryPosition,
    pub featured: bool,
    pub order: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GalleryItem> for GalleryItemResponse {
    fn from(item: GalleryItem) -> Self {
        Self {
            id: item.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: item.title,
            image: item.image,
            description: item.description,
            // Incomplete legacy items surface a placeholder category
            category: if item.category.is_empty() {
                "uncategorized".to_string()
            } else {
                item.category
            },
            size: item.size,
            position: item.position,
            featured: item.featured,
            order: item.order,
            tags: item.tags,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryListResponse {
    pub images: Vec<GalleryItemResponse>,
    pub has_more: bool,
    pub total: u64,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    pub total: usize,
}

pub async fn process_list(
    repo: &dyn GalleryRepository,
    params: GalleryListParams,
) -> Result<GalleryListResponse, AppError> {
    let window = page_window(params.page.unwrap_or(1), ITEMS_PER_PAGE);

    // "all" (the UI's default tab) means no category filter
    let category = params
        .category
        .as_deref()
        .filter(|category| *category != "all");

    let (items, total) = repo.list(category, window.skip, window.limit).await?;
    let categories = repo.distinct_categories().await?;

    Ok(GalleryListResponse {
        images: items.into_iter().map(GalleryItemResponse::from).collect(),
        has_more: has_more(total, window),
        total,
        categories,
    })
}

/// Distinct categories with "all" prepended, sorted alphabetically.
pub async fn process_categories(
    repo: &dyn GalleryRepository,
) -> Result<CategoriesResponse, AppError> {
    let mut categories = repo.distinct_categories().await?;
    categories.retain(|category| category != "all");
    categories.sort();
    categories.insert(0, "all".to_string());

    let total = categories.len();
    Ok(CategoriesResponse { categories, total })
}

pub async fn process_create(
    repo: &dyn GalleryRepository,
    request: CreateGalleryRequest,
) -> Result<GalleryItemResponse, AppError> {
    if request.title.is_empty() || request.image.is_empty() {
        return Err(AppError::BadRequest("Title and image are required".into()));
    }

    let now = Utc::now();
    let item = repo
        .insert(GalleryItem {
            id: None,
            title: request.title,
            image: request.image,
            description: request.description,
            category: if request.category.is_empty() {
                default_category()
            } else {
                request.category
            },
            size: request.size,
            position: request.position,
            featured: request.featured,
            order: request.order,
            tags: request.tags,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(item.into())
}

pub async fn process_update(
    repo: &dyn GalleryRepository,
    request: UpdateGalleryRequest,
) -> Result<GalleryItemResponse, AppError> {
    let id = parse_id(&request.id)?;

    let item = repo
        .update(id, request.patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Gallery item not found".into()))?;

    Ok(item.into())
}

pub async fn process_delete(
    repo: &dyn GalleryRepository,
    id: Option<String>,
) -> Result<(), AppError> {
    let id = id.ok_or_else(|| AppError::BadRequest("Gallery item ID is required".into()))?;
    let id = parse_id(&id)?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Gallery item not found".into()));
    }

    Ok(())
}

pub async fn process_cleanup(repo: &dyn GalleryRepository) -> Result<u64, AppError> {
    repo.delete_incomplete().await
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid gallery item id".into()))
}

/// `GET /api/gallery?page=&category=` — public paginated list.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<GalleryListParams>,
) -> Result<Json<GalleryListResponse>, AppError> {
    Ok(Json(process_list(state.gallery.as_ref(), params).await?))
}

/// `GET /api/gallery/categories` — public category list.
///
/// Degrades to `["all"]` when the store is unavailable instead of returning
/// a bare error body.
pub async fn categories_handler(State(state): State<AppState>) -> Response {
    match process_categories(state.gallery.as_ref()).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            tracing::error!("Failed to fetch categories: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "categories": ["all"],
                    "error": "Failed to fetch categories",
                    "total": 1,
                })),
            )
                .into_response()
        }
    }
}

/// `POST /api/gallery` — admin create.
pub async fn create_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(request): Json<CreateGalleryRequest>,
) -> Result<(StatusCode, Json<GalleryItemResponse>), AppError> {
    let item = process_create(state.gallery.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/gallery` — admin merge-update, addressed by id in the body.
pub async fn update_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(request): Json<UpdateGalleryRequest>,
) -> Result<Json<GalleryItemResponse>, AppError> {
    Ok(Json(process_update(state.gallery.as_ref(), request).await?))
}

/// `DELETE /api/gallery?id=` — admin delete.
pub async fn delete_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    process_delete(state.gallery.as_ref(), params.id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `POST /api/gallery/cleanup` — admin bulk removal of incomplete items.
pub async fn cleanup_handler(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = process_cleanup(state.gallery.as_ref()).await?;
    tracing::info!("Gallery cleanup removed {removed} incomplete items");
    Ok(Json(serde_json::json!({
        "message": format!("Cleaned up {removed} incomplete gallery items"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockRepo {
        items: Mutex<Vec<GalleryItem>>,
    }

    impl MockRepo {
        fn new() -> Self {
            Self {
                items: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl GalleryRepository for MockRepo {
        async fn list(
            &self,
            category: Option<&str>,
            skip: u64,
            limit: i64,
        ) -> Result<(Vec<GalleryItem>, u64), AppError> {
            let items = self.items.lock().unwrap();
            let matching: Vec<GalleryItem> = items
                .iter()
                .filter(|item| category.is_none_or(|c| item.category == c))
                .cloned()
                .collect();
            let total = matching.len() as u64;
            let page = matching
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect();
            Ok((page, total))
        }

        async fn distinct_categories(&self) -> Result<Vec<String>, AppError> {
            let mut categories: Vec<String> = self
                .items
                .lock()
                .unwrap()
                .iter()
                .map(|item| item.category.clone())
                .filter(|category| !category.is_empty())
                .collect();
            categories.dedup();
            Ok(categories)
        }

        async fn insert(&self, mut item: GalleryItem) -> Result<GalleryItem, AppError> {
            item.id = Some(ObjectId::new());
            self.items.lock().unwrap().push(item.clone());
            Ok(item)
        }

        async fn update(
            &self,
            id: ObjectId,
            patch: GalleryPatch,
        ) -> Result<Option<GalleryItem>, AppError> {
            let mut items = self.items.lock().unwrap();
            let Some(item) = items.iter_mut().find(|i| i.id == Some(id)) else {
                return Ok(None);
            };
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(image) = patch.image {
                item.image = image;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(category) = patch.category {
                item.category = category;
            }
            if let Some(size) = patch.size {
                item.size = size;
            }
            if let Some(position) = patch.position {
                item.position = position;
            }
            if let Some(featured) = patch.featured {
                item.featured = featured;
            }
            if let Some(order) = patch.order {
                item.order = order;
            }
            if let Some(tags) = patch.tags {
                item.tags = tags;
            }
            item.updated_at = Utc::now();
            Ok(Some(item.clone()))
        }

        async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|item| item.id != Some(id));
            Ok(items.len() < before)
        }

        async fn delete_incomplete(&self) -> Result<u64, AppError> {
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|item| !item.category.is_empty());
            Ok((before - items.len()) as u64)
        }
    }

    fn make_request(title: &str, category: &str) -> CreateGalleryRequest {
        CreateGalleryRequest {
            title: title.to_string(),
            image: "/img.jpg".to_string(),
            description: String::new(),
            category: category.to_string(),
            size: GallerySize::default(),
            position: GalleryPosition::default(),
            featured: false,
            order: 0,
            tags: vec![],
        }
    }

    async fn seed(repo: &MockRepo, count: usize, category: &str) {
        for i in 0..count {
            process_create(repo, make_request(&format!("item-{i}"), category))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_requires_title_and_image() {
        let repo = MockRepo::new();

        let missing_title = make_request("", "events");
        let result = process_create(&repo, missing_title).await;
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));

        let mut missing_image = make_request("Terrace", "events");
        missing_image.image = String::new();
        let result = process_create(&repo, missing_image).await;
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_create_defaults_category_to_general() {
        let repo = MockRepo::new();

        let item = process_create(&repo, make_request("Terrace", "")).await.unwrap();
        assert_eq!(item.category, "general");
        assert_eq!(item.size, GallerySize::Medium);
        assert_eq!(item.position, GalleryPosition::Center);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let repo = MockRepo::new();
        seed(&repo, 12, "events").await;

        let page1 = process_list(
            &repo,
            GalleryListParams {
                page: Some(1),
                category: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(page1.images.len(), 5);
        assert_eq!(page1.total, 12);
        assert!(page1.has_more);

        let page3 = process_list(
            &repo,
            GalleryListParams {
                page: Some(3),
                category: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(page3.images.len(), 2);
        assert!(!page3.has_more);
    }

    #[tokio::test]
    async fn test_list_category_filter() {
        let repo = MockRepo::new();
        seed(&repo, 3, "events").await;
        seed(&repo, 2, "food").await;

        let events = process_list(
            &repo,
            GalleryListParams {
                page: None,
                category: Some("events".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(events.total, 3);

        // "all" is not a stored category; it means no filter
        let all = process_list(
            &repo,
            GalleryListParams {
                page: None,
                category: Some("all".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(all.total, 5);
    }

    #[tokio::test]
    async fn test_categories_sorted_with_all_first() {
        let repo = MockRepo::new();
        seed(&repo, 1, "food").await;
        seed(&repo, 1, "events").await;

        let response = process_categories(&repo).await.unwrap();
        assert_eq!(response.categories, vec!["all", "events", "food"]);
        assert_eq!(response.total, 3);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_incomplete() {
        let repo = MockRepo::new();
        seed(&repo, 2, "events").await;

        // Legacy items persisted without a category bypass the create path
        for _ in 0..3 {
            let now = Utc::now();
            repo.insert(GalleryItem {
                id: None,
                title: "legacy".to_string(),
                image: "/legacy.jpg".to_string(),
                description: String::new(),
                category: String::new(),
                size: GallerySize::default(),
                position: GalleryPosition::default(),
                featured: false,
                order: 0,
                tags: vec![],
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        }

        assert_eq!(process_cleanup(&repo).await.unwrap(), 3);
        // Second run on a clean collection removes nothing
        assert_eq!(process_cleanup(&repo).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_merge_preserves_other_fields() {
        let repo = MockRepo::new();
        let created = process_create(&repo, make_request("Terrace", "events"))
            .await
            .unwrap();

        let updated = process_update(
            &repo,
            UpdateGalleryRequest {
                id: created.id,
                patch: GalleryPatch {
                    featured: Some(true),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

        assert!(updated.featured);
        assert_eq!(updated.title, "Terrace");
        assert_eq!(updated.category, "events");
        assert_eq!(updated.size, GallerySize::Medium);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let repo = MockRepo::new();

        let result = process_delete(&repo, Some(ObjectId::new().to_hex())).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }
}
