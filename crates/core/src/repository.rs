//! Persistence contracts consumed by the service layer.
//!
//! Implemented by `agora-db` (PostgreSQL) and by the in-memory store in
//! `agora-service`. All reads that can see archived rows take an explicit
//! [`ArchiveFilter`].

use async_trait::async_trait;

use crate::comment::{Comment, NewComment};
use crate::content::{ArchiveFilter, ContentRef};
use crate::error::RepoError;
use crate::leaderboard::AuthorPoints;
use crate::like::{Like, LikeTarget};
use crate::post::{NewPost, Post};
use crate::types::DbId;
use crate::version::{ContentVersion, NewContentVersion};

pub type RepoResult<T> = Result<T, RepoError>;

/// Append-only store of content snapshots.
#[async_trait]
pub trait ContentVersionRepository: Send + Sync {
    /// All versions of `content`, ascending by version number.
    async fn find_by_content(&self, content: ContentRef) -> RepoResult<Vec<ContentVersion>>;

    async fn find_by_content_and_version(
        &self,
        content: ContentRef,
        version_number: i32,
    ) -> RepoResult<Option<ContentVersion>>;

    /// The snapshot with the highest version number, if any.
    async fn get_latest(&self, content: ContentRef) -> RepoResult<Option<ContentVersion>>;

    /// Insert a snapshot. Must fail with [`RepoError::UniqueViolation`] when
    /// `(content, version_number)` already exists.
    async fn create(&self, version: &NewContentVersion) -> RepoResult<ContentVersion>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Comment>>;

    /// Every comment of a post at all nesting levels, oldest first.
    async fn find_by_post_id(
        &self,
        post_id: DbId,
        filter: ArchiveFilter,
    ) -> RepoResult<Vec<Comment>>;

    async fn create(&self, input: &NewComment) -> RepoResult<Comment>;

    /// Persist the comment's content and bump `updated_at`.
    async fn update(&self, comment: &Comment) -> RepoResult<Comment>;

    /// Set `deleted_at` to now on a live comment. Returns `false` when the
    /// comment was already archived, so no row changed.
    async fn archive(&self, id: DbId) -> RepoResult<bool>;

    /// Add `delta` to `like_count`, returning the new count.
    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Post>>;

    /// Posts in a community, pinned first then newest first.
    async fn list_by_community(
        &self,
        community_id: DbId,
        filter: ArchiveFilter,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Post>>;

    async fn create(&self, input: &NewPost) -> RepoResult<Post>;

    /// Persist title, content, pin/solve flags and `published_at`; bump
    /// `updated_at`.
    async fn update(&self, post: &Post) -> RepoResult<Post>;

    /// Set `deleted_at` to now on a live post. Returns `false` when the post
    /// was already archived.
    async fn archive(&self, id: DbId) -> RepoResult<bool>;

    async fn adjust_comment_count(&self, id: DbId, delta: i32) -> RepoResult<()>;

    /// Add `delta` to `like_count`, returning the new count.
    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32>;

    async fn increment_view_count(&self, id: DbId) -> RepoResult<()>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn find(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Option<Like>>;

    /// Must fail with [`RepoError::UniqueViolation`] on a duplicate
    /// `(user, target)` pair.
    async fn create(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Like>;

    /// Returns `false` when the like was already gone.
    async fn delete(&self, id: DbId) -> RepoResult<bool>;

    /// Likes received per author on non-archived posts and comments of a
    /// community. Order is unspecified.
    async fn points_by_community(&self, community_id: DbId) -> RepoResult<Vec<AuthorPoints>>;
}
