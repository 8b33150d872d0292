// Repository trait abstractions over the document collection
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::models::{Comment, Post};
use crate::{AppError, Result};

use super::client::ConnectionProvider;
use super::store::{drain_feed, match_all, DocumentPredicate, QueryOptions};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &Post) -> Result<()>;
    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>>;
    async fn get_posts(&self) -> Result<Vec<Post>>;
    async fn get_posts_by_title(&self, title: &str) -> Result<Vec<Post>>;
    async fn get_posts_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Post>>;
    async fn update_post(&self, post: Post, id: &str) -> Result<()>;
    async fn delete_post(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, comment: Comment, post_id: &str) -> Result<()>;
    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>>;
    async fn get_comments_by_post(&self, post_id: &str) -> Result<Vec<Comment>>;
    async fn get_comments_by_publisher(&self, publisher: &str) -> Result<Vec<Comment>>;
    async fn get_comments_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Comment>>;
    async fn delete_comment(&self, id: &str, post_id: &str) -> Result<()>;
}

fn encode_post(post: &Post) -> Result<Value> {
    serde_json::to_value(post)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize post: {}", e)))
}

fn decode_post(document: Value) -> Result<Post> {
    serde_json::from_value(document)
        .map_err(|e| AppError::StoreError(format!("Malformed post document: {}", e)))
}

fn decode_posts(documents: Vec<Value>) -> Result<Vec<Post>> {
    documents.into_iter().map(decode_post).collect()
}

/// Reads a document's publish date; unparseable dates never match a filter.
fn publish_date_of(document: &Value) -> Option<DateTime<Utc>> {
    document
        .get("publish_date")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

pub struct DocumentPostRepository {
    provider: Arc<dyn ConnectionProvider>,
}

impl DocumentPostRepository {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PostRepository for DocumentPostRepository {
    async fn create_post(&self, post: &Post) -> Result<()> {
        let collection = self.provider.collection().await?;
        collection.insert(&post.id, encode_post(post)?).await
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>> {
        let collection = self.provider.collection().await?;
        match collection.read(id).await? {
            Some(document) => Ok(Some(decode_post(document)?)),
            None => Ok(None),
        }
    }

    async fn get_posts(&self) -> Result<Vec<Post>> {
        let collection = self.provider.collection().await?;
        let feed = collection
            .query(match_all(), QueryOptions::default())
            .await?;
        decode_posts(drain_feed(feed).await?)
    }

    async fn get_posts_by_title(&self, title: &str) -> Result<Vec<Post>> {
        let needle = title.to_string();
        let predicate: DocumentPredicate = Arc::new(move |doc| {
            doc.get("title")
                .and_then(Value::as_str)
                .map(|t| t.contains(needle.as_str()))
                .unwrap_or(false)
        });

        let collection = self.provider.collection().await?;
        let feed = collection.query(predicate, QueryOptions::default()).await?;
        decode_posts(drain_feed(feed).await?)
    }

    async fn get_posts_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Post>> {
        // Both bounds are inclusive
        let predicate: DocumentPredicate = Arc::new(move |doc| {
            publish_date_of(doc)
                .map(|date| date >= start && date <= end)
                .unwrap_or(false)
        });

        let collection = self.provider.collection().await?;
        let feed = collection.query(predicate, QueryOptions::default()).await?;
        decode_posts(drain_feed(feed).await?)
    }

    async fn update_post(&self, post: Post, id: &str) -> Result<()> {
        let collection = self.provider.collection().await?;
        if collection.read(id).await?.is_none() {
            debug!("Skipping update of missing post {}", id);
            return Ok(());
        }

        let mut post = post;
        post.id = id.to_string();
        collection.replace(id, encode_post(&post)?).await
    }

    async fn delete_post(&self, id: &str) -> Result<()> {
        let collection = self.provider.collection().await?;
        if collection.read(id).await?.is_none() {
            debug!("Skipping delete of missing post {}", id);
            return Ok(());
        }
        collection.delete(id).await
    }
}

/// Comments are never persisted on their own; every operation loads the
/// owning post, mutates its embedded comment sequence and writes the whole
/// post back.
pub struct DocumentCommentRepository {
    provider: Arc<dyn ConnectionProvider>,
    post_repo: Arc<dyn PostRepository>,
}

impl DocumentCommentRepository {
    pub fn new(provider: Arc<dyn ConnectionProvider>, post_repo: Arc<dyn PostRepository>) -> Self {
        Self {
            provider,
            post_repo,
        }
    }

    /// Fetches every post in the collection. Publisher and date-range
    /// lookups filter client-side afterwards, an O(total documents) scan
    /// that is the accepted ceiling of the embedded-comment model.
    async fn fetch_all_posts(&self) -> Result<Vec<Post>> {
        let collection = self.provider.collection().await?;
        let feed = collection
            .query(match_all(), QueryOptions::default())
            .await?;
        decode_posts(drain_feed(feed).await?)
    }
}

#[async_trait]
impl CommentRepository for DocumentCommentRepository {
    async fn create_comment(&self, comment: Comment, post_id: &str) -> Result<()> {
        match self.post_repo.get_post_by_id(post_id).await? {
            Some(mut post) => {
                post.comments.push(comment);
                self.post_repo.update_post(post, post_id).await
            }
            None => {
                debug!("Skipping comment on missing post {}", post_id);
                Ok(())
            }
        }
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>> {
        let comment_id = id.to_string();
        let predicate: DocumentPredicate = Arc::new(move |doc| {
            doc.get("comments")
                .and_then(Value::as_array)
                .map(|comments| comments.iter().any(|c| c["id"] == comment_id.as_str()))
                .unwrap_or(false)
        });

        let collection = self.provider.collection().await?;
        let feed = collection.query(predicate, QueryOptions::default()).await?;
        let posts = decode_posts(drain_feed(feed).await?)?;

        Ok(posts
            .into_iter()
            .flat_map(|post| post.comments)
            .find(|comment| comment.id == id))
    }

    async fn get_comments_by_post(&self, post_id: &str) -> Result<Vec<Comment>> {
        let wanted = post_id.to_string();
        let predicate: DocumentPredicate = Arc::new(move |doc| doc["id"] == wanted.as_str());

        let collection = self.provider.collection().await?;
        let feed = collection.query(predicate, QueryOptions::default()).await?;
        let posts = decode_posts(drain_feed(feed).await?)?;

        Ok(posts.into_iter().flat_map(|post| post.comments).collect())
    }

    /// Returns the full comment sequence of every post containing at least
    /// one comment by `publisher`.
    async fn get_comments_by_publisher(&self, publisher: &str) -> Result<Vec<Comment>> {
        let posts = self.fetch_all_posts().await?;

        Ok(posts
            .into_iter()
            .filter(|post| post.comments.iter().any(|c| c.publisher == publisher))
            .flat_map(|post| post.comments)
            .collect())
    }

    /// Returns the full comment sequence of every post containing at least
    /// one comment published inside the inclusive `[start, end]` window.
    async fn get_comments_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Comment>> {
        let posts = self.fetch_all_posts().await?;

        Ok(posts
            .into_iter()
            .filter(|post| {
                post.comments
                    .iter()
                    .any(|c| c.publish_date >= start && c.publish_date <= end)
            })
            .flat_map(|post| post.comments)
            .collect())
    }

    async fn delete_comment(&self, id: &str, post_id: &str) -> Result<()> {
        match self.post_repo.get_post_by_id(post_id).await? {
            Some(mut post) => {
                post.comments.retain(|comment| comment.id != id);
                let id = post.id.clone();
                self.post_repo.update_post(post, &id).await
            }
            None => {
                debug!("Skipping comment delete on missing post {}", post_id);
                Ok(())
            }
        }
    }
}
