//! Handlers for threaded comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use agora_core::content::ContentRef;
use agora_core::types::DbId;
use agora_events::{event_types, CommunityEvent};

use crate::error::AppResult;
use crate::auth::AuthUser;
use crate::query::IncludeArchivedParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    /// Set to reply to a top-level comment.
    pub parent_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// GET /posts/{id}/comments
///
/// The post's comments as a two-level tree.
pub async fn list_comments(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Query(archived): Query<IncludeArchivedParams>,
) -> AppResult<impl IntoResponse> {
    let tree = state
        .services
        .comments
        .list_for_post(post_id, archived.filter())
        .await?;
    Ok(Json(DataResponse { data: tree }))
}

/// POST /posts/{id}/comments
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let comment = state
        .services
        .comments
        .create(post_id, auth.user_id, &input.content, input.parent_id)
        .await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::COMMENT_CREATED)
            .with_content(ContentRef::Comment(comment.id))
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "post_id": post_id,
                "parent_id": input.parent_id,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PUT /comments/{id}
pub async fn update_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
    Json(input): Json<UpdateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let comment = state
        .services
        .comments
        .update(comment_id, auth.user_id, &input.content)
        .await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::COMMENT_UPDATED)
            .with_content(ContentRef::Comment(comment_id))
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /comments/{id}
///
/// Archive a comment. Its replies stay in place.
pub async fn archive_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.services.comments.archive(comment_id).await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::COMMENT_ARCHIVED)
            .with_content(ContentRef::Comment(comment_id))
            .with_actor(auth.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
