//! Community-scoped routes mounted at `/communities`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{likes, posts};
use crate::state::AppState;

/// ```text
/// GET    /{id}/posts         -> list_posts
/// POST   /{id}/posts         -> create_post
/// GET    /{id}/leaderboard   -> leaderboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route("/{id}/leaderboard", get(likes::leaderboard))
}
