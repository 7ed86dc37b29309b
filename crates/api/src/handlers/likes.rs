//! Handlers for like toggling and the community leaderboard.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use agora_core::like::{LikeTarget, LikeToggle};
use agora_core::types::DbId;
use agora_events::{event_types, CommunityEvent};

use crate::error::AppResult;
use crate::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn toggle(state: &AppState, user_id: DbId, target: LikeTarget) -> AppResult<LikeToggle> {
    let toggle = state.services.likes.toggle(user_id, target).await?;

    state.event_bus.publish(
        CommunityEvent::new(event_types::LIKE_TOGGLED)
            .with_content(target.as_content_ref())
            .with_actor(user_id)
            .with_payload(serde_json::json!({
                "liked": toggle.liked,
                "like_count": toggle.like_count,
            })),
    );

    Ok(toggle)
}

/// POST /posts/{id}/like
pub async fn toggle_post_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = toggle(&state, auth.user_id, LikeTarget::Post(post_id)).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /comments/{id}/like
pub async fn toggle_comment_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = toggle(&state, auth.user_id, LikeTarget::Comment(comment_id)).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /communities/{id}/leaderboard
pub async fn leaderboard(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let entries = state
        .services
        .likes
        .leaderboard(community_id, params.limit)
        .await?;
    Ok(Json(DataResponse { data: entries }))
}
