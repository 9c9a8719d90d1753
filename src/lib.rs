pub mod error;
pub mod models;
pub mod routes;
pub mod storage;
pub mod user_models;
