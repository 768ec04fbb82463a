use axum::routing::{get, post};
use axum::Router;

use crate::api;
use crate::state::AppState;

/// Assemble the full API surface.
///
/// Mutating handlers authenticate through the `CurrentAdmin` extractor;
/// list/read endpoints and the two public forms are open.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/businesses",
            get(api::businesses::list_handler)
                .post(api::businesses::create_handler)
                .put(api::businesses::update_handler)
                .delete(api::businesses::delete_handler),
        )
        .route(
            "/api/gallery",
            get(api::gallery::list_handler)
                .post(api::gallery::create_handler)
                .put(api::gallery::update_handler)
                .delete(api::gallery::delete_handler),
        )
        .route("/api/gallery/categories", get(api::gallery::categories_handler))
        .route("/api/gallery/cleanup", post(api::gallery::cleanup_handler))
        .route(
            "/api/team",
            get(api::team::list_handler)
                .post(api::team::create_handler)
                .put(api::team::update_handler)
                .delete(api::team::delete_handler),
        )
        .route("/api/contact", post(api::contact::create_handler))
        .route(
            "/api/messages",
            get(api::messages::list_handler)
                .patch(api::messages::update_handler)
                .delete(api::messages::delete_handler),
        )
        .route("/api/newsletter", post(api::newsletter::subscribe_handler))
        .route("/api/login", post(api::login::login_handler))
        .route("/api/logout", post(api::login::logout_handler))
        .with_state(state)
}
