use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use concierge::api::routes::api_router;
use concierge::config::AppConfig;
use concierge::db::businesses::MongoBusinessRepository;
use concierge::db::gallery::MongoGalleryRepository;
use concierge::db::messages::MongoMessageRepository;
use concierge::db::newsletter::MongoNewsletterRepository;
use concierge::db::sessions::MongoSessionRepository;
use concierge::db::team::MongoTeamRepository;
use concierge::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concierge=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting content API server...");

    let config = AppConfig::from_env();

    // Connect to MongoDB; the client is created once and shared by all
    // repositories.
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = mongo_client.database(&config.mongodb_database);

    tracing::info!("Connected to MongoDB at {}", config.mongodb_uri);

    let state = AppState {
        businesses: Arc::new(MongoBusinessRepository::new(&db)),
        gallery: Arc::new(MongoGalleryRepository::new(&db)),
        team: Arc::new(MongoTeamRepository::new(&db)),
        messages: Arc::new(MongoMessageRepository::new(&db)),
        newsletter: Arc::new(MongoNewsletterRepository::new(&db)),
        sessions: Arc::new(MongoSessionRepository::new(&db)),
        config: Arc::new(config.clone()),
    };

    let app = api_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    tracing::info!("Listening on http://{}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
