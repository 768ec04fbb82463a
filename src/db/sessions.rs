use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// An issued admin session, stored in the `sessions` collection.
///
/// Only the sha256 digest of the token is persisted; the token itself
/// leaves the process exactly once, in the login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub token_hash: String,
    pub username: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,
}

/// Repository trait for admin sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a newly issued session.
    async fn insert(&self, session: SessionRecord) -> Result<(), AppError>;

    /// Find a session by token digest, provided it has not expired at `now`.
    async fn find_valid(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, AppError>;

    /// Remove a session by token digest. Removing an unknown digest is not
    /// an error.
    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;
}

/// MongoDB implementation of the SessionRepository.
pub struct MongoSessionRepository {
    collection: mongodb::Collection<SessionRecord>,
}

impl MongoSessionRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("sessions"),
        }
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn insert(&self, session: SessionRecord) -> Result<(), AppError> {
        self.collection
            .insert_one(&session)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_valid(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! {
                "tokenHash": token_hash,
                "expiresAt": { "$gt": bson::DateTime::from_chrono(now) },
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete(&self, token_hash: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection
            .delete_one(doc! { "tokenHash": token_hash })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
