//! Blog API endpoints.
//!
//! Published posts are public; drafts and every write require AdminSession.

use crate::auth::middleware::{AdminSession, AppState};
use crate::content::prepare_post;
use crate::error::AppError;
use crate::filter::filter_posts;
use crate::models::{
    unix_now, BlogInput, BlogQuery, BlogUpdate, DataResponse, MessageResponse, PaginatedResponse,
};
use crate::storage;
use crate::storage::blog::UpdateOutcome;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

fn not_found() -> AppError {
    AppError::NotFound("Blog not found".to_string())
}

fn slug_taken() -> AppError {
    AppError::Conflict("A blog with this slug already exists".to_string())
}

/// GET /api/blogs: List posts (admins also see drafts)
pub async fn list_posts(
    admin: Option<AdminSession>,
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    let posts = storage::blog::list_posts(&mut con).await?;
    let (data, pagination) = filter_posts(posts, &query, admin.is_some())
        .map_err(|e| AppError::BadRequest(format!("Invalid search term: {}", e)))?;

    Ok(Json(PaginatedResponse {
        success: true,
        data,
        pagination,
    }))
}

/// GET /api/blogs/:idOrSlug: Get one post by ID or slug
///
/// Drafts are reported as missing to non-admins.
pub async fn get_post(
    admin: Option<AdminSession>,
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id_or_slug, "blog ID")?;

    let mut con = state.redis_connection().await?;
    let post = storage::blog::find_post(&mut con, &id_or_slug)
        .await?
        .filter(|p| p.published || admin.is_some())
        .ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(post)))
}

/// POST /api/blogs: Create a post, deriving slug and excerpt when absent
pub async fn create_post(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Json(input): Json<BlogInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut post = input.into_post(storage::blog::new_post_id(), unix_now());
    prepare_post(&mut post);
    post.validate()?;

    let mut con = state.redis_connection().await?;
    if !storage::blog::create_post(&mut con, &post).await? {
        return Err(slug_taken());
    }

    tracing::info!(action = "blog_created", blog_id = %post.id, slug = %post.slug, admin = %session.username, "Blog post created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(post))))
}

/// PUT /api/blogs/:id: Merge an update into a post and re-derive
pub async fn update_post(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BlogUpdate>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "blog ID")?;

    let mut con = state.redis_connection().await?;
    let stored = storage::blog::get_post(&mut con, &id)
        .await?
        .ok_or_else(not_found)?;

    let mut post = stored.clone();
    update.apply(&mut post, unix_now());
    prepare_post(&mut post);
    post.validate()?;

    match storage::blog::update_post(&mut con, &post, &stored.slug).await? {
        UpdateOutcome::Updated => {}
        UpdateOutcome::SlugTaken => return Err(slug_taken()),
        UpdateOutcome::Missing => return Err(not_found()),
    }

    tracing::info!(action = "blog_updated", blog_id = %post.id, slug = %post.slug, admin = %session.username, "Blog post updated");

    Ok(Json(DataResponse::new(post)))
}

/// DELETE /api/blogs/:id: Delete a post and release its slug
pub async fn delete_post(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "blog ID")?;

    let mut con = state.redis_connection().await?;
    if !storage::blog::delete_post(&mut con, &id).await? {
        return Err(not_found());
    }

    tracing::info!(action = "blog_deleted", blog_id = %id, admin = %session.username, "Blog post deleted");

    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}
