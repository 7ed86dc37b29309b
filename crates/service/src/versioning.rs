//! Versioning service: snapshot history, compare, restore, reconcile.
//!
//! Every body mutation persists the live content first and then appends a
//! snapshot via [`VersioningService::record_snapshot`]. If the snapshot step
//! fails, [`VersioningService::reconcile`] regenerates it from live state.

use std::sync::Arc;

use agora_core::comment::{self, Comment};
use agora_core::content::{ArchiveFilter, ContentRef};
use agora_core::error::{CoreError, RepoError};
use agora_core::post::{self, Post};
use agora_core::repository::{CommentRepository, ContentVersionRepository, PostRepository};
use agora_core::types::DbId;
use agora_core::version::{
    ensure_not_current, next_version_number, validate_comparison, validate_version_number,
    ContentVersion, NewContentVersion, VersionComparison, MAX_SNAPSHOT_ATTEMPTS,
};

use crate::error::{internal, RepoResultExt};

#[derive(Clone)]
pub struct VersioningService {
    versions: Arc<dyn ContentVersionRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl VersioningService {
    pub fn new(
        versions: Arc<dyn ContentVersionRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            versions,
            posts,
            comments,
        }
    }

    /// All snapshots of `content`, oldest first. Empty for content that has
    /// never been snapshotted.
    pub async fn history(&self, content: ContentRef) -> Result<Vec<ContentVersion>, CoreError> {
        self.versions
            .find_by_content(content)
            .await
            .or_internal("list content versions")
    }

    pub async fn get_version(
        &self,
        content: ContentRef,
        version_number: i32,
    ) -> Result<ContentVersion, CoreError> {
        validate_version_number(version_number)?;
        self.find_version(content, version_number).await
    }

    pub async fn compare(
        &self,
        content: ContentRef,
        old_version: i32,
        new_version: i32,
    ) -> Result<VersionComparison, CoreError> {
        validate_comparison(old_version, new_version)?;
        let old_version = self.find_version(content, old_version).await?;
        let new_version = self.find_version(content, new_version).await?;
        Ok(VersionComparison {
            old_version,
            new_version,
        })
    }

    /// Overwrite a post's body with an earlier snapshot and record the
    /// result as a new version.
    pub async fn restore_post(
        &self,
        post_id: DbId,
        version_number: i32,
        restored_by: DbId,
    ) -> Result<Post, CoreError> {
        validate_version_number(version_number)?;
        let content = ContentRef::Post(post_id);

        let mut live = self
            .posts
            .find_by_id(post_id, ArchiveFilter::IncludeArchived)
            .await
            .or_internal("load post")?
            .ok_or(CoreError::PostNotFound(post_id))?;
        let target = self.find_version(content, version_number).await?;

        post::ensure_mutable(&live)?;
        ensure_not_current(content, version_number, self.latest_number(content).await?)?;

        live.content = target.body;
        let updated = self.posts.update(&live).await.or_internal("update post")?;
        let snapshot = self
            .record_snapshot(content, &updated.content, restored_by)
            .await?;

        tracing::info!(
            post_id,
            restored_from = version_number,
            new_version = snapshot.version_number,
            user_id = restored_by,
            "Post restored"
        );
        Ok(updated)
    }

    /// Overwrite a comment's body with an earlier snapshot and record the
    /// result as a new version.
    pub async fn restore_comment(
        &self,
        comment_id: DbId,
        version_number: i32,
        restored_by: DbId,
    ) -> Result<Comment, CoreError> {
        validate_version_number(version_number)?;
        let content = ContentRef::Comment(comment_id);

        let mut live = self
            .comments
            .find_by_id(comment_id, ArchiveFilter::IncludeArchived)
            .await
            .or_internal("load comment")?
            .ok_or(CoreError::CommentNotFound(comment_id))?;
        let target = self.find_version(content, version_number).await?;

        comment::ensure_mutable(&live)?;
        ensure_not_current(content, version_number, self.latest_number(content).await?)?;

        live.content = target.body;
        let updated = self
            .comments
            .update(&live)
            .await
            .or_internal("update comment")?;
        let snapshot = self
            .record_snapshot(content, &updated.content, restored_by)
            .await?;

        tracing::info!(
            comment_id,
            restored_from = version_number,
            new_version = snapshot.version_number,
            user_id = restored_by,
            "Comment restored"
        );
        Ok(updated)
    }

    /// Append a snapshot of `body` at `latest + 1`.
    ///
    /// The latest number is re-read on every attempt. A uniqueness violation
    /// means a concurrent writer took the number; the insert is retried up
    /// to [`MAX_SNAPSHOT_ATTEMPTS`] times in total.
    pub async fn record_snapshot(
        &self,
        content: ContentRef,
        body: &str,
        created_by: DbId,
    ) -> Result<ContentVersion, CoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let version_number = next_version_number(self.latest_number(content).await?);
            let input = NewContentVersion {
                content,
                version_number,
                body: body.to_string(),
                created_by,
            };

            match self.versions.create(&input).await {
                Ok(version) => {
                    tracing::debug!(%content, version_number, "Snapshot recorded");
                    return Ok(version);
                }
                Err(RepoError::UniqueViolation(constraint)) if attempt < MAX_SNAPSHOT_ATTEMPTS => {
                    tracing::warn!(
                        %content,
                        version_number,
                        attempt,
                        %constraint,
                        "Version number taken by a concurrent writer, retrying"
                    );
                }
                Err(err) => return Err(internal(err, "record content snapshot")),
            }
        }
    }

    /// Record a snapshot of the live body when the history has fallen behind
    /// it. Returns the new snapshot, or `None` if history was already in
    /// step.
    pub async fn reconcile(
        &self,
        content: ContentRef,
        created_by: DbId,
    ) -> Result<Option<ContentVersion>, CoreError> {
        let live_body = match content {
            ContentRef::Post(id) => {
                self.posts
                    .find_by_id(id, ArchiveFilter::IncludeArchived)
                    .await
                    .or_internal("load post")?
                    .ok_or(CoreError::PostNotFound(id))?
                    .content
            }
            ContentRef::Comment(id) => {
                self.comments
                    .find_by_id(id, ArchiveFilter::IncludeArchived)
                    .await
                    .or_internal("load comment")?
                    .ok_or(CoreError::CommentNotFound(id))?
                    .content
            }
        };

        let latest = self
            .versions
            .get_latest(content)
            .await
            .or_internal("load latest version")?;
        let behind = match (&latest, content) {
            (Some(version), _) => version.body != live_body,
            // Comments are snapshotted on creation; posts only on first edit.
            (None, ContentRef::Comment(_)) => true,
            (None, ContentRef::Post(_)) => false,
        };
        if !behind {
            return Ok(None);
        }

        let snapshot = self.record_snapshot(content, &live_body, created_by).await?;
        tracing::info!(
            %content,
            version_number = snapshot.version_number,
            "Reconciled missing snapshot"
        );
        Ok(Some(snapshot))
    }

    async fn find_version(
        &self,
        content: ContentRef,
        version_number: i32,
    ) -> Result<ContentVersion, CoreError> {
        self.versions
            .find_by_content_and_version(content, version_number)
            .await
            .or_internal("load content version")?
            .ok_or(CoreError::VersionNotFound {
                content,
                version_number,
            })
    }

    async fn latest_number(&self, content: ContentRef) -> Result<Option<i32>, CoreError> {
        Ok(self
            .versions
            .get_latest(content)
            .await
            .or_internal("load latest version")?
            .map(|v| v.version_number))
    }
}
