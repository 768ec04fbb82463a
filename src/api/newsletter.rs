use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::models::NewsletterSubscriber;
use crate::db::newsletter::NewsletterRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Payload accepted by the public newsletter signup.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub message: String,
    pub subscriber_id: String,
}

pub async fn process_subscribe(
    repo: &dyn NewsletterRepository,
    request: SubscribeRequest,
) -> Result<SubscribeResponse, AppError> {
    if request.email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }

    if repo.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::Duplicate("Email already subscribed".into()));
    }

    let subscriber = repo
        .insert(NewsletterSubscriber {
            id: None,
            email: request.email,
            subscribed_at: Utc::now(),
        })
        .await?;

    Ok(SubscribeResponse {
        message: "Successfully subscribed to newsletter".to_string(),
        subscriber_id: subscriber.id.map(|id| id.to_hex()).unwrap_or_default(),
    })
}

/// `POST /api/newsletter` — public signup.
pub async fn subscribe_handler(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, AppError> {
    Ok(Json(
        process_subscribe(state.newsletter.as_ref(), request).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::newsletter::MockNewsletterRepository;
    use bson::oid::ObjectId;

    #[tokio::test]
    async fn test_subscribe_success() {
        let mut repo = MockNewsletterRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().returning(|mut subscriber| {
            subscriber.id = Some(ObjectId::new());
            Ok(subscriber)
        });

        let response = process_subscribe(
            &repo,
            SubscribeRequest {
                email: "a@b.com".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.message, "Successfully subscribed to newsletter");
        assert!(!response.subscriber_id.is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_duplicate_rejected() {
        let mut repo = MockNewsletterRepository::new();
        repo.expect_find_by_email().returning(|email| {
            Ok(Some(NewsletterSubscriber {
                id: Some(ObjectId::new()),
                email: email.to_string(),
                subscribed_at: Utc::now(),
            }))
        });
        // insert must never be reached
        repo.expect_insert().times(0);

        let result = process_subscribe(
            &repo,
            SubscribeRequest {
                email: "a@b.com".to_string(),
            },
        )
        .await;

        match result.unwrap_err() {
            AppError::Duplicate(msg) => assert_eq!(msg, "Email already subscribed"),
            other => panic!("Expected Duplicate, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_subscribe_requires_email() {
        let repo = MockNewsletterRepository::new();

        let result = process_subscribe(
            &repo,
            SubscribeRequest {
                email: String::new(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }
}
