// Library modules for the blog document-store API
pub mod config;
pub mod models;
pub mod db;
pub mod routes;
pub mod error;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use config::{AppConfig, StorageMode};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: db::DatabaseClient,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let db = db::DatabaseClient::new(&config).await?;
        Ok(Self { config, db })
    }
}
