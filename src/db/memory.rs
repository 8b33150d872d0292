// In-memory document collection, the default backend for local runs and tests
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{AppError, Result};

use super::store::{DocumentCollection, DocumentFeed, DocumentPredicate, PagedFeed, QueryOptions};

const DEFAULT_BATCH_SIZE: usize = 100;

pub struct MemoryCollection {
    documents: Arc<Mutex<HashMap<String, Value>>>, // id -> raw document
    batch_size: usize,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
            batch_size,
        }
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert(&self, id: &str, document: Value) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        if documents.contains_key(id) {
            return Err(AppError::StoreError(format!(
                "Document {} already exists",
                id
            )));
        }
        documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<Value>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.get(id).cloned())
    }

    async fn replace(&self, id: &str, document: Value) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        if !documents.contains_key(id) {
            return Err(AppError::StoreError(format!("Document {} not found", id)));
        }
        documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        if documents.remove(id).is_none() {
            return Err(AppError::StoreError(format!("Document {} not found", id)));
        }
        Ok(())
    }

    async fn query(
        &self,
        predicate: DocumentPredicate,
        options: QueryOptions,
    ) -> Result<Box<dyn DocumentFeed>> {
        let documents = self.documents.lock().unwrap();
        let matches: Vec<Value> = documents
            .values()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect();

        let batch_size = options.max_item_count.unwrap_or(self.batch_size);
        Ok(Box::new(PagedFeed::new(matches, batch_size)))
    }
}
