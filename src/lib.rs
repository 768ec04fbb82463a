pub mod config;
pub mod error;
pub mod state;
pub mod db {
    pub mod businesses;
    pub mod gallery;
    pub mod messages;
    pub mod models;
    pub mod newsletter;
    pub mod sessions;
    pub mod team;
}
pub mod auth {
    pub mod extract;
    pub mod gate;
}
pub mod api {
    pub mod businesses;
    pub mod contact;
    pub mod errors;
    pub mod gallery;
    pub mod login;
    pub mod messages;
    pub mod newsletter;
    pub mod pagination;
    pub mod routes;
    pub mod team;
}
