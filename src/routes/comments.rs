use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::models::comment::{Comment, CreateCommentRequest};
use crate::models::filter::DateRangeParams;
use crate::models::post::required;
use crate::{AppState, Result};

use super::list_response;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts/:post_id/comments",
            get(get_post_comments).post(create_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            get(get_comment_by_id).delete(delete_comment),
        )
        .route("/comments/byPublisher", get(get_comments_by_publisher))
        // `byDateRage` is the spelling deployed clients rely on
        .route("/comments/byDateRage", get(get_comments_by_date_range))
}

#[derive(Debug, Deserialize)]
pub struct PublisherParams {
    pub publisher: Option<String>,
}

/// GET /api/posts/{postId}/comments
async fn get_post_comments(
    State(app_state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Response> {
    let comments = app_state
        .db
        .comment_repo
        .get_comments_by_post(&post_id)
        .await?;

    tracing::debug!("Listed {} comments for post {}", comments.len(), post_id);
    Ok(list_response(comments))
}

/// GET /api/posts/{postId}/comments/{id}
///
/// The comment id alone identifies the comment; the post segment of the
/// path is not consulted by the lookup.
async fn get_comment_by_id(
    State(app_state): State<AppState>,
    Path((_post_id, id)): Path<(String, String)>,
) -> Result<Response> {
    match app_state.db.comment_repo.get_comment_by_id(&id).await? {
        Some(comment) => Ok(Json(comment).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /api/posts/{postId}/comments
///
/// The server assigns the id and publish timestamp. A comment posted to a
/// missing post is accepted but not stored.
async fn create_comment(
    State(app_state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Response> {
    let fields = request.validated()?;

    let comment = Comment::new(fields);
    app_state
        .db
        .comment_repo
        .create_comment(comment.clone(), &post_id)
        .await?;

    tracing::info!("Created comment {} on post {}", comment.id, post_id);

    let location = format!("/api/posts/{}/comments/{}", post_id, comment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(comment),
    )
        .into_response())
}

/// DELETE /api/posts/{postId}/comments/{id}
///
/// Removes only the named comment from its parent post's sequence; a
/// missing post or comment is a silent no-op.
async fn delete_comment(
    State(app_state): State<AppState>,
    Path((post_id, id)): Path<(String, String)>,
) -> Result<Response> {
    app_state
        .db
        .comment_repo
        .delete_comment(&id, &post_id)
        .await?;

    tracing::info!("Deleted comment {} from post {}", id, post_id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /api/comments/byPublisher?publisher=
async fn get_comments_by_publisher(
    State(app_state): State<AppState>,
    Query(params): Query<PublisherParams>,
) -> Result<Response> {
    let publisher = required("Publisher", params.publisher)?;

    let comments = app_state
        .db
        .comment_repo
        .get_comments_by_publisher(&publisher)
        .await?;
    Ok(list_response(comments))
}

/// GET /api/comments/byDateRage?start=&end=
async fn get_comments_by_date_range(
    State(app_state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Result<Response> {
    let (start, end) = params.validated()?;

    let comments = app_state
        .db
        .comment_repo
        .get_comments_by_date_range(start, end)
        .await?;
    Ok(list_response(comments))
}
