use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::db::models::{ContactMessage, MessagePatch, MessageStatus};
use crate::error::AppError;

/// Equality filter for the message inbox. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter {
    pub status: Option<MessageStatus>,
    pub archived: Option<bool>,
}

/// Repository trait for contact messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// List messages matching `filter`, newest first, windowed by
    /// skip/limit, together with the total match count.
    async fn list(
        &self,
        filter: MessageFilter,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<ContactMessage>, u64), AppError>;

    /// Persist a new message and return it with its generated id.
    async fn insert(&self, message: ContactMessage) -> Result<ContactMessage, AppError>;

    /// Merge `patch` into the record at `id` and return the updated record,
    /// or `None` if no record exists at that id.
    async fn update(
        &self,
        id: ObjectId,
        patch: MessagePatch,
    ) -> Result<Option<ContactMessage>, AppError>;

    /// Remove the record at `id`. Returns false if nothing was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, AppError>;
}

/// MongoDB implementation of the MessageRepository.
pub struct MongoMessageRepository {
    collection: mongodb::Collection<ContactMessage>,
}

impl MongoMessageRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("contacts"),
        }
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn list(
        &self,
        filter: MessageFilter,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<ContactMessage>, u64), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let mut query = doc! {};
        if let Some(status) = filter.status {
            let status = bson::to_bson(&status)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            query.insert("status", status);
        }
        if let Some(archived) = filter.archived {
            query.insert("isArchived", archived);
        }

        let total = self
            .collection
            .count_documents(query.clone())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .build();

        let mut cursor = self
            .collection
            .find(query)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut messages = Vec::new();
        use futures::TryStreamExt;
        while let Some(message) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            messages.push(message);
        }

        Ok((messages, total))
    }

    async fn insert(&self, mut message: ContactMessage) -> Result<ContactMessage, AppError> {
        let result = self
            .collection
            .insert_one(&message)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        message.id = result.inserted_id.as_object_id();
        Ok(message)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: MessagePatch,
    ) -> Result<Option<ContactMessage>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

        let mut set = bson::to_document(&patch)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        set.insert("updatedAt", bson::DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}
