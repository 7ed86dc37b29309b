//! Handlers for content version history, comparison and restore.
//!
//! Posts and comments share one history model keyed by [`ContentRef`], so
//! each endpoint has a thin post and comment entry point over a common body.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use agora_core::content::ContentRef;
use agora_core::diff::{diff_lines, diff_stats, DiffLine, DiffStats};
use agora_core::types::DbId;
use agora_core::version::ContentVersion;
use agora_events::{event_types, CommunityEvent};

use crate::error::{AppError, AppResult};
use crate::auth::AuthUser;
use crate::query::CompareParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Two versions plus a line diff from `old_version` to `new_version`.
///
/// `diff` and `stats` are `null` when the changed region is too large to
/// align (see [`agora_core::diff::MAX_DIFF_LINES`]).
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub old_version: ContentVersion,
    pub new_version: ContentVersion,
    pub diff: Option<Vec<DiffLine>>,
    pub stats: Option<DiffStats>,
}

/* --------------------------------------------------------------------------
Shared bodies
-------------------------------------------------------------------------- */

async fn history(state: &AppState, content: ContentRef) -> AppResult<Vec<ContentVersion>> {
    Ok(state.services.versioning.history(content).await?)
}

async fn version(state: &AppState, content: ContentRef, n: i32) -> AppResult<ContentVersion> {
    Ok(state.services.versioning.get_version(content, n).await?)
}

async fn compare(
    state: &AppState,
    content: ContentRef,
    params: CompareParams,
) -> AppResult<CompareResponse> {
    let comparison = state
        .services
        .versioning
        .compare(content, params.old, params.new)
        .await?;

    let old_body = comparison.old_version.body.clone();
    let new_body = comparison.new_version.body.clone();
    let diff = tokio::task::spawn_blocking(move || diff_lines(&old_body, &new_body))
        .await
        .map_err(|e| AppError::InternalError(format!("Diff task failed: {e}")))?;
    let stats = diff.as_deref().map(diff_stats);

    Ok(CompareResponse {
        old_version: comparison.old_version,
        new_version: comparison.new_version,
        diff,
        stats,
    })
}

fn publish_restored(state: &AppState, content: ContentRef, actor: DbId, from: i32) {
    state.event_bus.publish(
        CommunityEvent::new(event_types::CONTENT_RESTORED)
            .with_content(content)
            .with_actor(actor)
            .with_payload(serde_json::json!({ "restored_from": from })),
    );
}

/* --------------------------------------------------------------------------
Posts
-------------------------------------------------------------------------- */

/// GET /posts/{id}/versions
pub async fn list_post_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = history(&state, ContentRef::Post(post_id)).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /posts/{id}/versions/{n}
pub async fn get_post_version(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((post_id, n)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let found = version(&state, ContentRef::Post(post_id), n).await?;
    Ok(Json(DataResponse { data: found }))
}

/// GET /posts/{id}/compare?old=&new=
pub async fn compare_post_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let result = compare(&state, ContentRef::Post(post_id), params).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /posts/{id}/restore/{n}
pub async fn restore_post_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((post_id, n)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .services
        .versioning
        .restore_post(post_id, n, auth.user_id)
        .await?;

    publish_restored(&state, ContentRef::Post(post_id), auth.user_id, n);

    Ok(Json(DataResponse { data: post }))
}

/* --------------------------------------------------------------------------
Comments
-------------------------------------------------------------------------- */

/// GET /comments/{id}/versions
pub async fn list_comment_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = history(&state, ContentRef::Comment(comment_id)).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /comments/{id}/versions/{n}
pub async fn get_comment_version(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((comment_id, n)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let found = version(&state, ContentRef::Comment(comment_id), n).await?;
    Ok(Json(DataResponse { data: found }))
}

/// GET /comments/{id}/compare?old=&new=
pub async fn compare_comment_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let result = compare(&state, ContentRef::Comment(comment_id), params).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /comments/{id}/restore/{n}
pub async fn restore_comment_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((comment_id, n)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let comment = state
        .services
        .versioning
        .restore_comment(comment_id, n, auth.user_id)
        .await?;

    publish_restored(&state, ContentRef::Comment(comment_id), auth.user_id, n);

    Ok(Json(DataResponse { data: comment }))
}
