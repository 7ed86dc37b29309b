//! Comment routes mounted at `/comments`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{comments, likes, versions};
use crate::state::AppState;

/// ```text
/// PUT    /{id}                 -> update_comment
/// DELETE /{id}                 -> archive_comment
/// POST   /{id}/like            -> toggle_comment_like
/// GET    /{id}/versions        -> list_comment_versions
/// GET    /{id}/versions/{n}    -> get_comment_version
/// GET    /{id}/compare         -> compare_comment_versions
/// POST   /{id}/restore/{n}     -> restore_comment_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(comments::update_comment).delete(comments::archive_comment),
        )
        .route("/{id}/like", post(likes::toggle_comment_like))
        .route("/{id}/versions", get(versions::list_comment_versions))
        .route("/{id}/versions/{n}", get(versions::get_comment_version))
        .route("/{id}/compare", get(versions::compare_comment_versions))
        .route("/{id}/restore/{n}", post(versions::restore_comment_version))
}
