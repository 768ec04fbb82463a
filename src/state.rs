use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::businesses::BusinessRepository;
use crate::db::gallery::GalleryRepository;
use crate::db::messages::MessageRepository;
use crate::db::newsletter::NewsletterRepository;
use crate::db::sessions::SessionRepository;
use crate::db::team::TeamRepository;

/// Shared application state, passed to handlers via `axum::extract::State`.
///
/// Repositories are injected as trait objects so tests can swap in mocks
/// without a running database.
#[derive(Clone)]
pub struct AppState {
    pub businesses: Arc<dyn BusinessRepository>,
    pub gallery: Arc<dyn GalleryRepository>,
    pub team: Arc<dyn TeamRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub newsletter: Arc<dyn NewsletterRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub config: Arc<AppConfig>,
}
