// Document collection abstraction shared by every storage backend
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::Result;

/// Predicate evaluated against each raw document during a query scan.
pub type DocumentPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Matches every document in the collection.
pub fn match_all() -> DocumentPredicate {
    Arc::new(|_| true)
}

/// Query knobs. `max_item_count: None` lets the backend pick its own batch
/// size, mirroring an unbounded page request.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    pub max_item_count: Option<usize>,
}

/// One collection of JSON documents addressed by id.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    async fn insert(&self, id: &str, document: Value) -> Result<()>;
    async fn read(&self, id: &str) -> Result<Option<Value>>;
    async fn replace(&self, id: &str, document: Value) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn query(
        &self,
        predicate: DocumentPredicate,
        options: QueryOptions,
    ) -> Result<Box<dyn DocumentFeed>>;
}

/// Paged query results. Callers keep requesting batches until
/// `has_more_results` turns false; nothing is returned twice.
#[async_trait]
pub trait DocumentFeed: Send {
    fn has_more_results(&self) -> bool;
    async fn next_batch(&mut self) -> Result<Vec<Value>>;
}

/// Drain a feed to completion, accumulating every batch in order.
pub async fn drain_feed(mut feed: Box<dyn DocumentFeed>) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    while feed.has_more_results() {
        documents.extend(feed.next_batch().await?);
    }
    Ok(documents)
}

/// Feed over an already-materialized result set, handed out in fixed-size
/// batches.
pub struct PagedFeed {
    batches: VecDeque<Vec<Value>>,
}

impl PagedFeed {
    pub fn new(documents: Vec<Value>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        let mut batches = VecDeque::new();
        let mut documents = documents;
        while !documents.is_empty() {
            let rest = documents.split_off(batch_size.min(documents.len()));
            batches.push_back(documents);
            documents = rest;
        }
        Self { batches }
    }
}

#[async_trait]
impl DocumentFeed for PagedFeed {
    fn has_more_results(&self) -> bool {
        !self.batches.is_empty()
    }

    async fn next_batch(&mut self) -> Result<Vec<Value>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
