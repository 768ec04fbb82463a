use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::db::models::{Business, BusinessPatch};
use crate::error::AppError;

/// Repository trait for business records.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// List all businesses, oldest first.
    async fn list(&self) -> Result<Vec<Business>, AppError>;

    /// Persist a new business and return it with its generated id.
    async fn insert(&self, business: Business) -> Result<Business, AppError>;

    /// Merge `patch` into the record at `id` and return the updated record,
    /// or `None` if no record exists at that id.
    async fn update(&self, id: ObjectId, patch: BusinessPatch)
        -> Result<Option<Business>, AppError>;

    /// Remove the record at `id`. Returns false if nothing was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, AppError>;
}

/// MongoDB implementation of the BusinessRepository.
pub struct MongoBusinessRepository {
    collection: mongodb::Collection<Business>,
}

impl MongoBusinessRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("businesses"),
        }
    }
}

#[async_trait]
impl BusinessRepository for MongoBusinessRepository {
    async fn list(&self) -> Result<Vec<Business>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "createdAt": 1 }).build();

        let mut cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut businesses = Vec::new();
        use futures::TryStreamExt;
        while let Some(business) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            businesses.push(business);
        }

        Ok(businesses)
    }

    async fn insert(&self, mut business: Business) -> Result<Business, AppError> {
        let result = self
            .collection
            .insert_one(&business)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        business.id = result.inserted_id.as_object_id();
        Ok(business)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: BusinessPatch,
    ) -> Result<Option<Business>, AppError> {
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
