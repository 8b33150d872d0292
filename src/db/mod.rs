pub mod client;
pub mod store;
pub mod memory;
pub mod file;
pub mod repository;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::Result;

use client::{ConnectionProvider, StoreManager};
use repository::{
    CommentRepository, DocumentCommentRepository, DocumentPostRepository, PostRepository,
};

// Database connection and repository wiring shared across handlers
#[derive(Clone)]
pub struct DatabaseClient {
    pub post_repo: Arc<dyn PostRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
}

impl DatabaseClient {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let provider: Arc<dyn ConnectionProvider> = Arc::new(StoreManager::new(config.clone()));

        let post_repo: Arc<dyn PostRepository> =
            Arc::new(DocumentPostRepository::new(provider.clone()));
        let comment_repo: Arc<dyn CommentRepository> = Arc::new(DocumentCommentRepository::new(
            provider,
            post_repo.clone(),
        ));

        Ok(Self {
            post_repo,
            comment_repo,
        })
    }
}
