//! Post routes mounted at `/posts`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{comments, likes, posts, versions};
use crate::state::AppState;

/// ```text
/// GET    /{id}                 -> get_post
/// PUT    /{id}                 -> update_post
/// DELETE /{id}                 -> archive_post
/// POST   /{id}/publish         -> publish_post
/// PUT    /{id}/pin             -> set_pinned
/// PUT    /{id}/solved          -> set_solved
/// POST   /{id}/like            -> toggle_post_like
/// GET    /{id}/versions        -> list_post_versions
/// GET    /{id}/versions/{n}    -> get_post_version
/// GET    /{id}/compare         -> compare_post_versions
/// POST   /{id}/restore/{n}     -> restore_post_version
/// GET    /{id}/comments        -> list_comments
/// POST   /{id}/comments        -> create_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::archive_post),
        )
        .route("/{id}/publish", post(posts::publish_post))
        .route("/{id}/pin", put(posts::set_pinned))
        .route("/{id}/solved", put(posts::set_solved))
        .route("/{id}/like", post(likes::toggle_post_like))
        .route("/{id}/versions", get(versions::list_post_versions))
        .route("/{id}/versions/{n}", get(versions::get_post_version))
        .route("/{id}/compare", get(versions::compare_post_versions))
        .route("/{id}/restore/{n}", post(versions::restore_post_version))
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
}
