use async_trait::async_trait;

use crate::db::models::NewsletterSubscriber;
use crate::error::AppError;

/// Repository trait for newsletter subscribers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Find a subscriber by exact email match.
    async fn find_by_email(&self, email: &str)
        -> Result<Option<NewsletterSubscriber>, AppError>;

    /// Persist a new subscriber and return it with its generated id.
    async fn insert(
        &self,
        subscriber: NewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, AppError>;
}

/// MongoDB implementation of the NewsletterRepository.
pub struct MongoNewsletterRepository {
    collection: mongodb::Collection<NewsletterSubscriber>,
}

impl MongoNewsletterRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("newsletter_subscribers"),
        }
    }
}

#[async_trait]
impl NewsletterRepository for MongoNewsletterRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert(
        &self,
        mut subscriber: NewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, AppError> {
        let result = self
            .collection
            .insert_one(&subscriber)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        subscriber.id = result.inserted_id.as_object_id();
        Ok(subscriber)
    }
}
