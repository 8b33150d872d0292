use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

use super::post::required;

/// A comment embedded in its parent post's comment sequence. The id is
/// unique within that sequence only, never globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub publisher: String,
    pub content: String,
    pub publish_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(fields: CommentFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            publisher: fields.publisher,
            content: fields.content,
            publish_date: Utc::now(),
        }
    }
}

/// Validated body payload for comment creation.
#[derive(Debug)]
pub struct CommentFields {
    pub publisher: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub publisher: Option<String>,
    pub content: Option<String>,
}

impl CreateCommentRequest {
    pub fn validated(self) -> Result<CommentFields> {
        Ok(CommentFields {
            publisher: required("Publisher", self.publisher)?,
            content: required("Content", self.content)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_comments_get_distinct_ids() {
        let a = Comment::new(CommentFields {
            publisher: "alice".to_string(),
            content: "first".to_string(),
        });
        let b = Comment::new(CommentFields {
            publisher: "alice".to_string(),
            content: "second".to_string(),
        });

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_publisher_is_rejected() {
        let request = CreateCommentRequest {
            publisher: None,
            content: Some("hi".to_string()),
        };

        assert!(request.validated().is_err());
    }
}
