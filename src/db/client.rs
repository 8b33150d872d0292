// Lazy, process-wide handle to the configured document collection
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::{AppConfig, StorageMode};
use crate::Result;

use super::file::FileCollection;
use super::memory::MemoryCollection;
use super::store::DocumentCollection;

/// Capability handing out the shared collection handle.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn collection(&self) -> Result<Arc<dyn DocumentCollection>>;
}

/// Opens the configured backend on first use and reuses the handle for the
/// process lifetime. Initialization failures propagate to the caller; there
/// is no reconnection or health-check logic here.
pub struct StoreManager {
    config: AppConfig,
    handle: OnceCell<Arc<dyn DocumentCollection>>,
}

impl StoreManager {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            handle: OnceCell::new(),
        }
    }

    async fn initialize(&self) -> Result<Arc<dyn DocumentCollection>> {
        info!(
            "Opening document collection '{}' in database '{}'",
            self.config.collection, self.config.database
        );
        if !self.config.store_endpoint.is_empty() {
            tracing::debug!(
                "Store endpoint configured: {} (access key {})",
                self.config.store_endpoint,
                if self.config.store_key.is_empty() {
                    "absent"
                } else {
                    "present"
                }
            );
        }

        match self.config.storage_mode {
            StorageMode::Memory => Ok(Arc::new(MemoryCollection::new()) as Arc<dyn DocumentCollection>),
            StorageMode::File => {
                let path = self.config.collection_file();
                let collection = FileCollection::open(&path)?;
                info!("File-backed collection at {}", path);
                Ok(Arc::new(collection) as Arc<dyn DocumentCollection>)
            }
        }
    }
}

#[async_trait]
impl ConnectionProvider for StoreManager {
    async fn collection(&self) -> Result<Arc<dyn DocumentCollection>> {
        self.handle
            .get_or_try_init(|| self.initialize())
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn repeated_calls_reuse_the_same_handle() {
        let manager = StoreManager::new(AppConfig::in_memory());

        let first = manager.collection().await.unwrap();
        let second = manager.collection().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }
}
