use std::sync::Arc;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use concierge::api::routes::api_router;
use concierge::config::AppConfig;
use concierge::db::businesses::MongoBusinessRepository;
use concierge::db::gallery::MongoGalleryRepository;
use concierge::db::messages::MongoMessageRepository;
use concierge::db::newsletter::MongoNewsletterRepository;
use concierge::db::sessions::MongoSessionRepository;
use concierge::db::team::MongoTeamRepository;
use concierge::state::AppState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Holds the running MongoDB container and provides the Axum router for
/// integration tests.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: axum::Router,
    pub db: mongodb::Database,
}

impl TestEnv {
    /// Spin up MongoDB and build a router wired to real repositories.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);

        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = mongo_client.database("hospitality_test");

        let config = AppConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            mongodb_uri: mongo_uri,
            mongodb_database: "hospitality_test".to_string(),
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };

        let state = AppState {
            businesses: Arc::new(MongoBusinessRepository::new(&db)),
            gallery: Arc::new(MongoGalleryRepository::new(&db)),
            team: Arc::new(MongoTeamRepository::new(&db)),
            messages: Arc::new(MongoMessageRepository::new(&db)),
            newsletter: Arc::new(MongoNewsletterRepository::new(&db)),
            sessions: Arc::new(MongoSessionRepository::new(&db)),
            config: Arc::new(config),
        };

        Self {
            _mongo: mongo_container,
            router: api_router(state),
            db,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for
    /// error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
    }

    /// Helper: log in as the configured admin and return the bearer token.
    pub async fn login(&self, server: &axum_test::TestServer) -> String {
        let response = server
            .post("/api/login")
            .json(&serde_json::json!({
                "username": ADMIN_USERNAME,
                "password": ADMIN_PASSWORD,
            }))
            .await;

        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .expect("Login response missing token")
            .to_string()
    }
}
