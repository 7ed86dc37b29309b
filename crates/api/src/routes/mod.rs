pub mod comments;
pub mod communities;
pub mod health;
pub mod posts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /communities/{id}/posts                          list, create draft
/// /communities/{id}/leaderboard                    top authors by likes
///
/// /posts/{id}                                      get, update, archive
/// /posts/{id}/publish                              publish (POST)
/// /posts/{id}/pin                                  pin / unpin (PUT)
/// /posts/{id}/solved                               solve / unsolve (PUT)
/// /posts/{id}/like                                 toggle like (POST)
/// /posts/{id}/versions                             history
/// /posts/{id}/versions/{n}                         single version
/// /posts/{id}/compare                              compare two versions
/// /posts/{id}/restore/{n}                          restore (POST)
/// /posts/{id}/comments                             comment tree, create
///
/// /comments/{id}                                   update, archive
/// /comments/{id}/like                              toggle like (POST)
/// /comments/{id}/versions                          history
/// /comments/{id}/versions/{n}                      single version
/// /comments/{id}/compare                           compare two versions
/// /comments/{id}/restore/{n}                       restore (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/communities", communities::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
}
