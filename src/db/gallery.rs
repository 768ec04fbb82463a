use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::db::models::{GalleryItem, GalleryPatch};
use crate::error::AppError;

/// Repository trait for gallery items.
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    /// List items matching `category` (all items when `None`), windowed by
    /// skip/limit, together with the total match count.
    async fn list(
        &self,
        category: Option<&str>,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<GalleryItem>, u64), AppError>;

    /// Distinct category values present in the collection, excluding empty
    /// strings and nulls. Unsorted.
    async fn distinct_categories(&self) -> Result<Vec<String>, AppError>;

    /// Persist a new item and return it with its generated id.
    async fn insert(&self, item: GalleryItem) -> Result<GalleryItem, AppError>;

    /// Merge `patch` into the record at `id` and return the updated record,
    /// or `None` if no record exists at that id.
    async fn update(&self, id: ObjectId, patch: GalleryPatch)
        -> Result<Option<GalleryItem>, AppError>;

    /// Remove the record at `id`. Returns false if nothing was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, AppError>;

    /// Remove every item whose category is missing, null or empty.
    /// Returns the number of items removed.
    async fn delete_incomplete(&self) -> Result<u64, AppError>;
}

/// MongoDB implementation of the GalleryRepository.
pub struct MongoGalleryRepository {
    collection: mongodb::Collection<GalleryItem>,
}

impl MongoGalleryRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("gallery"),
        }
    }
}

#[async_trait]
impl GalleryRepository for MongoGalleryRepository {
    async fn list(
        &self,
        category: Option<&str>,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<GalleryItem>, u64), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let filter = match category {
            Some(category) => doc! { "category": category },
            None => doc! {},
        };

        let total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Stable paging order: explicit ordering first, then insertion order
        let options = FindOptions::builder()
            .sort(doc! { "order": 1, "createdAt": 1 })
            .skip(skip)
            .limit(limit)
            .build();

        let mut cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut items = Vec::new();
        use futures::TryStreamExt;
        while let Some(item) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            items.push(item);
        }

        Ok((items, total))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, AppError> {
        use mongodb::bson::doc;

        let values = self
            .collection
            .distinct("category", doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(values
            .into_iter()
            .filter_map(|value| value.as_str().map(String::from))
            .filter(|category| !category.is_empty())
            .collect())
    }

    async fn insert(&self, mut item: GalleryItem) -> Result<GalleryItem, AppError> {
        let result = self
            .collection
            .insert_one(&item)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        item.id = result.inserted_id.as_object_id();
        Ok(item)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: GalleryPatch,
    ) -> Result<Option<GalleryItem>, AppError> {
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

    async fn delete_incomplete(&self) -> Result<u64, AppError> {
        use mongodb::bson::{doc, Bson};

        let result = self
            .collection
            .delete_many(doc! {
                "$or": [
                    { "category": { "$exists": false } },
                    { "category": "" },
                    { "category": Bson::Null },
                ]
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count)
    }
}
