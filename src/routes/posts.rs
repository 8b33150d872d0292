use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::models::filter::DateRangeParams;
use crate::models::post::{required, CreatePostRequest, Post};
use crate::{AppState, Result};

use super::list_response;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(get_posts).post(create_post))
        .route("/posts/byTitle", get(get_posts_by_title))
        .route("/posts/byDateRange", get(get_posts_by_date_range))
        // Parameter name matches the nested comment routes; axum rejects
        // conflicting names at the same position
        .route(
            "/posts/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
}

#[derive(Debug, Deserialize)]
pub struct TitleParams {
    pub title: Option<String>,
}

/// GET /api/posts
async fn get_posts(State(app_state): State<AppState>) -> Result<Response> {
    let posts = app_state.db.post_repo.get_posts().await?;

    tracing::debug!("Listed {} posts", posts.len());
    Ok(list_response(posts))
}

/// GET /api/posts/{id}
async fn get_post(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    match app_state.db.post_repo.get_post_by_id(&id).await? {
        Some(post) => Ok(Json(post).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET /api/posts/byTitle?title=
///
/// Substring match against post titles.
async fn get_posts_by_title(
    State(app_state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Response> {
    let title = required("Title", params.title)?;

    let posts = app_state.db.post_repo.get_posts_by_title(&title).await?;
    Ok(list_response(posts))
}

/// GET /api/posts/byDateRange?start=&end=
async fn get_posts_by_date_range(
    State(app_state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Result<Response> {
    let (start, end) = params.validated()?;

    let posts = app_state
        .db
        .post_repo
        .get_posts_by_date_range(start, end)
        .await?;
    Ok(list_response(posts))
}

/// POST /api/posts
///
/// The server assigns the id and publish timestamp; the new post starts
/// with no comments.
async fn create_post(
    State(app_state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Response> {
    let fields = request.validated()?;

    let post = Post::new(fields);
    app_state.db.post_repo.create_post(&post).await?;

    tracing::info!("Created post {}", post.id);

    let location = format!("/api/posts/{}", post.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(post),
    )
        .into_response())
}

/// PUT /api/posts/{id}
///
/// Replaces title, abstract and content; comments and publish date are kept.
/// A missing id is a silent no-op.
async fn update_post(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Response> {
    let fields = request.validated()?;

    if let Some(mut post) = app_state.db.post_repo.get_post_by_id(&id).await? {
        post.title = fields.title;
        post.summary = fields.summary;
        post.content = fields.content;
        app_state.db.post_repo.update_post(post, &id).await?;
        tracing::info!("Updated post {}", id);
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// DELETE /api/posts/{id}
///
/// A missing id is a silent no-op.
async fn delete_post(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    app_state.db.post_repo.delete_post(&id).await?;

    tracing::info!("Deleted post {}", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}
