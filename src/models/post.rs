use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

use super::Comment;

/// A blog post. The sole persisted document; comments live and die with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub content: String,
    pub publish_date: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

impl Post {
    /// Build a new post with a server-generated id, the current publish
    /// timestamp and an empty comment sequence.
    pub fn new(fields: PostFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            summary: fields.summary,
            content: fields.content,
            publish_date: Utc::now(),
            comments: Vec::new(),
        }
    }
}

/// Validated body payload for post creation and replacement.
#[derive(Debug)]
pub struct PostFields {
    pub title: String,
    pub summary: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl CreatePostRequest {
    /// All three fields are required; blank values count as missing.
    pub fn validated(self) -> Result<PostFields> {
        Ok(PostFields {
            title: required("Title", self.title)?,
            summary: required("Abstract", self.summary)?,
            content: required("Content", self.content)?,
        })
    }
}

pub(crate) fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(format!(
            "{} has invalid value",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_starts_with_empty_comments() {
        let post = Post::new(PostFields {
            title: "A".to_string(),
            summary: "B".to_string(),
            content: "C".to_string(),
        });

        assert!(!post.id.is_empty());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn abstract_keeps_its_wire_name() {
        let post = Post::new(PostFields {
            title: "A".to_string(),
            summary: "B".to_string(),
            content: "C".to_string(),
        });

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["abstract"], "B");
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn blank_title_is_rejected() {
        let request = CreatePostRequest {
            title: Some("   ".to_string()),
            summary: Some("B".to_string()),
            content: Some("C".to_string()),
        };

        assert!(request.validated().is_err());
    }

    #[test]
    fn missing_content_is_rejected() {
        let request = CreatePostRequest {
            title: Some("A".to_string()),
            summary: Some("B".to_string()),
            content: None,
        };

        assert!(request.validated().is_err());
    }
}
