// File-backed document collection for durable local storage
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::{AppError, Result};

use super::store::{DocumentCollection, DocumentFeed, DocumentPredicate, PagedFeed, QueryOptions};

const DEFAULT_BATCH_SIZE: usize = 100;

/// Persists the whole collection as one JSON object (id -> document) and
/// keeps an in-memory cache for reads and scans.
pub struct FileCollection {
    file_path: String,
    documents: Arc<Mutex<HashMap<String, Value>>>,
    batch_size: usize,
}

impl FileCollection {
    /// Open an existing collection file, or start an empty one if the file
    /// does not exist yet. A corrupt file is an error, not a silent reset.
    pub fn open(file_path: &str) -> Result<Self> {
        let documents = if Path::new(file_path).exists() {
            let file = File::open(file_path).map_err(|e| {
                AppError::StoreError(format!("Failed to open collection file: {}", e))
            })?;
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                AppError::StoreError(format!("Failed to parse collection file: {}", e))
            })?
        } else {
            HashMap::new()
        };

        Ok(Self {
            file_path: file_path.to_string(),
            documents: Arc::new(Mutex::new(documents)),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    fn save_to_disk(&self) -> Result<()> {
        // Snapshot under the lock, write outside it
        let snapshot = self.documents.lock().unwrap().clone();

        // Write to a temporary file and rename so a crash mid-write never
        // leaves a truncated collection behind
        let temp_path = format!("{}.tmp", self.file_path);
        let file = File::create(&temp_path).map_err(|e| {
            AppError::StoreError(format!("Failed to create temporary collection file: {}", e))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &snapshot).map_err(|e| {
            AppError::StoreError(format!("Failed to write collection file: {}", e))
        })?;
        writer.flush().map_err(|e| {
            AppError::StoreError(format!("Failed to flush collection file: {}", e))
        })?;

        std::fs::rename(&temp_path, &self.file_path).map_err(|e| {
            AppError::StoreError(format!("Failed to replace collection file: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl DocumentCollection for FileCollection {
    async fn insert(&self, id: &str, document: Value) -> Result<()> {
        {
            let mut documents = self.documents.lock().unwrap();
            if documents.contains_key(id) {
                return Err(AppError::StoreError(format!(
                    "Document {} already exists",
                    id
                )));
            }
            documents.insert(id.to_string(), document);
        }
        self.save_to_disk()
    }

    async fn read(&self, id: &str) -> Result<Option<Value>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.get(id).cloned())
    }

    async fn replace(&self, id: &str, document: Value) -> Result<()> {
        {
            let mut documents = self.documents.lock().unwrap();
            if !documents.contains_key(id) {
                return Err(AppError::StoreError(format!("Document {} not found", id)));
            }
            documents.insert(id.to_string(), document);
        }
        self.save_to_disk()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        {
            let mut documents = self.documents.lock().unwrap();
            if documents.remove(id).is_none() {
                return Err(AppError::StoreError(format!("Document {} not found", id)));
            }
        }
        self.save_to_disk()
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_collection_path() -> String {
        std::env::temp_dir()
            .join(format!("blogstore-test-{}.json", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    #[tokio::test]
    async fn documents_survive_a_reopen() {
        let path = temp_collection_path();

        {
            let collection = FileCollection::open(&path).expect("open fresh collection");
            collection
                .insert("a", json!({ "id": "a", "title": "persisted" }))
                .await
                .expect("insert should persist");
        }

        let reopened = FileCollection::open(&path).expect("reopen collection");
        let document = reopened.read("a").await.unwrap().expect("document");
        assert_eq!(document["title"], "persisted");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn delete_is_persisted() {
        let path = temp_collection_path();

        let collection = FileCollection::open(&path).expect("open fresh collection");
        collection.insert("a", json!({ "id": "a" })).await.unwrap();
        collection.delete("a").await.unwrap();
        drop(collection);

        let reopened = FileCollection::open(&path).expect("reopen collection");
        assert!(reopened.read("a").await.unwrap().is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn writes_leave_no_temporary_file_behind() {
        let path = temp_collection_path();

        let collection = FileCollection::open(&path).expect("open fresh collection");
        collection.insert("a", json!({ "id": "a" })).await.unwrap();

        assert!(!Path::new(&format!("{}.tmp", path)).exists());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = temp_collection_path();
        std::fs::write(&path, "not json").unwrap();

        assert!(FileCollection::open(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
