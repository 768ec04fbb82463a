use std::env;

/// Runtime configuration, read from environment variables at startup.
///
/// `MONGODB_URI`, `MONGODB_DATABASE` and `LISTEN_ADDR` fall back to local
/// development defaults; the admin credentials must always be provided.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let mongodb_uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let mongodb_database =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| "hospitality".to_string());
        let admin_username = env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME not set");
        let admin_password = env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD not set");

        Self {
            listen_addr,
            mongodb_uri,
            mongodb_database,
            admin_username,
            admin_password,
        }
    }
}
