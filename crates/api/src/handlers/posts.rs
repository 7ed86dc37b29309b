//! Handlers for community posts: listing, drafts, publishing, pin/solve
//! flags and archival.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use agora_core::content::{ArchiveFilter, ContentRef};
use agora_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use agora_core::types::DbId;
use agora_events::{event_types, CommunityEvent};
use agora_service::PostEdit;

use crate::error::AppResult;
use crate::auth::AuthUser;
use crate::query::{IncludeArchivedParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Request bodies
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub is_pinned: bool,
}

#[derive(Debug, Deserialize)]
pub struct SolvedRequest {
    pub is_solved: bool,
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// GET /communities/{id}/posts
///
/// Pinned posts first, then newest first.
pub async fn list_posts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
    Query(archived): Query<IncludeArchivedParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(page.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(page.offset);

    let posts = state
        .services
        .posts
        .list_by_community(community_id, archived.filter(), limit, offset)
        .await?;

    Ok(Json(DataResponse { data: posts }))
}

/// POST /communities/{id}/posts
///
/// Create a draft post.
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .services
        .posts
        .create(community_id, auth.user_id, &input.title, &input.content)
        .await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::POST_CREATED)
            .with_content(ContentRef::Post(post.id))
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "community_id": community_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /posts/{id}
///
/// A default read counts as a view. `?include_archived=true` is an audit
/// read: it can see archived posts and does not count.
pub async fn get_post(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Query(archived): Query<IncludeArchivedParams>,
) -> AppResult<impl IntoResponse> {
    let post = match archived.filter() {
        ArchiveFilter::ExcludeArchived => state.services.posts.view(post_id).await?,
        ArchiveFilter::IncludeArchived => {
            state
                .services
                .posts
                .get(post_id, ArchiveFilter::IncludeArchived)
                .await?
        }
    };
    Ok(Json(DataResponse { data: post }))
}

/// PUT /posts/{id}
///
/// Update title and/or content. A content change records a new version.
pub async fn update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<UpdatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let content_changed = input.content.is_some();
    let post = state
        .services
        .posts
        .update(
            post_id,
            auth.user_id,
            PostEdit {
                title: input.title,
                content: input.content,
            },
        )
        .await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::POST_UPDATED)
            .with_content(ContentRef::Post(post_id))
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "content_changed": content_changed })),
    );

    Ok(Json(DataResponse { data: post }))
}

/// DELETE /posts/{id}
///
/// Archive (soft-delete) a post.
pub async fn archive_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.services.posts.archive(post_id).await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::POST_ARCHIVED)
            .with_content(ContentRef::Post(post_id))
            .with_actor(auth.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/{id}/publish
pub async fn publish_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = state.services.posts.publish(post_id).await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::POST_PUBLISHED)
            .with_content(ContentRef::Post(post_id))
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: post }))
}

/// PUT /posts/{id}/pin
pub async fn set_pinned(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<PinRequest>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .services
        .posts
        .set_pinned(post_id, input.is_pinned)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        post_id,
        is_pinned = input.is_pinned,
        "Post pin toggled"
    );

    Ok(Json(DataResponse { data: post }))
}

/// PUT /posts/{id}/solved
pub async fn set_solved(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<SolvedRequest>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .services
        .posts
        .set_solved(post_id, input.is_solved)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        post_id,
        is_solved = input.is_solved,
        "Post solved flag set"
    );

    Ok(Json(DataResponse { data: post }))
}
