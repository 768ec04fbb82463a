use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::db::models::{TeamMember, TeamPatch};
use crate::error::AppError;

/// Repository trait for team member profiles.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// List all team members, oldest first.
    async fn list(&self) -> Result<Vec<TeamMember>, AppError>;

    /// Persist a new member and return it with its generated id.
    async fn insert(&self, member: TeamMember) -> Result<TeamMember, AppError>;

    /// Merge `patch` into the record at `id` and return the updated record,
    /// or `None` if no record exists at that id.
    async fn update(&self, id: ObjectId, patch: TeamPatch)
        -> Result<Option<TeamMember>, AppError>;

    /// Remove the record at `id`. Returns false if nothing was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, AppError>;
}

/// MongoDB implementation of the TeamRepository.
pub struct MongoTeamRepository {
    collection: mongodb::Collection<TeamMember>,
}

impl MongoTeamRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("team_members"),
        }
    }
}

#[async_trait]
impl TeamRepository for MongoTeamRepository {
    async fn list(&self) -> Result<Vec<TeamMember>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "createdAt": 1 }).build();

        let mut cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut members = Vec::new();
        use futures::TryStreamExt;
        while let Some(member) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            members.push(member);
        }

        Ok(members)
    }

    async fn insert(&self, mut member: TeamMember) -> Result<TeamMember, AppError> {
        let result = self
            .collection
            .insert_one(&member)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        member.id = result.inserted_id.as_object_id();
        Ok(member)
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: TeamPatch,
    ) -> Result<Option<TeamMember>, AppError> {
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
