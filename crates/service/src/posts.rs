//! Post service: the draft/published/archived lifecycle and versioned edits.

use std::sync::Arc;

use chrono::Utc;

use agora_core::content::{validate_body, ArchiveFilter, ContentRef, MAX_POST_CONTENT_LENGTH};
use agora_core::error::CoreError;
use agora_core::post::{self, validate_title, NewPost, Post};
use agora_core::repository::PostRepository;
use agora_core::types::DbId;

use crate::error::RepoResultExt;
use crate::versioning::VersioningService;

/// Fields a post edit may change. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    versioning: VersioningService,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, versioning: VersioningService) -> Self {
        Self { posts, versioning }
    }

    /// Create a draft. No snapshot is taken until the body is first edited.
    pub async fn create(
        &self,
        community_id: DbId,
        author_id: DbId,
        title: &str,
        content: &str,
    ) -> Result<Post, CoreError> {
        validate_title(title)?;
        validate_body(content, MAX_POST_CONTENT_LENGTH)?;

        let created = self
            .posts
            .create(&NewPost {
                community_id,
                author_id,
                title: title.to_string(),
                content: content.to_string(),
            })
            .await
            .or_internal("create post")?;

        tracing::info!(
            post_id = created.id,
            community_id,
            user_id = author_id,
            "Post created"
        );
        Ok(created)
    }

    pub async fn get(&self, post_id: DbId, filter: ArchiveFilter) -> Result<Post, CoreError> {
        self.posts
            .find_by_id(post_id, filter)
            .await
            .or_internal("load post")?
            .ok_or(CoreError::PostNotFound(post_id))
    }

    /// Fetch a live post and count the view.
    pub async fn view(&self, post_id: DbId) -> Result<Post, CoreError> {
        let mut found = self.get(post_id, ArchiveFilter::ExcludeArchived).await?;
        self.posts
            .increment_view_count(post_id)
            .await
            .or_internal("increment view count")?;
        found.view_count += 1;
        Ok(found)
    }

    pub async fn list_by_community(
        &self,
        community_id: DbId,
        filter: ArchiveFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, CoreError> {
        self.posts
            .list_by_community(community_id, filter, limit, offset)
            .await
            .or_internal("list posts")
    }

    /// Edit title and/or body. A body change is persisted and then
    /// snapshotted; a title-only edit creates no version.
    pub async fn update(
        &self,
        post_id: DbId,
        editor_id: DbId,
        edit: PostEdit,
    ) -> Result<Post, CoreError> {
        if edit.title.is_none() && edit.content.is_none() {
            return Err(CoreError::InvalidInput(
                "At least one of title or content must be provided".into(),
            ));
        }
        if let Some(title) = &edit.title {
            validate_title(title)?;
        }
        if let Some(content) = &edit.content {
            validate_body(content, MAX_POST_CONTENT_LENGTH)?;
        }

        let mut existing = self.get(post_id, ArchiveFilter::IncludeArchived).await?;
        post::ensure_mutable(&existing)?;

        let body_changed = edit.content.is_some();
        if let Some(title) = edit.title {
            existing.title = title;
        }
        if let Some(content) = edit.content {
            existing.content = content;
        }

        let updated = self.posts.update(&existing).await.or_internal("update post")?;
        if body_changed {
            self.versioning
                .record_snapshot(ContentRef::Post(post_id), &updated.content, editor_id)
                .await?;
        }

        tracing::info!(post_id, user_id = editor_id, body_changed, "Post updated");
        Ok(updated)
    }

    pub async fn publish(&self, post_id: DbId) -> Result<Post, CoreError> {
        let mut existing = self.get(post_id, ArchiveFilter::IncludeArchived).await?;
        post::ensure_publishable(&existing)?;

        existing.published_at = Some(Utc::now());
        let updated = self.posts.update(&existing).await.or_internal("publish post")?;

        tracing::info!(post_id, "Post published");
        Ok(updated)
    }

    pub async fn set_pinned(&self, post_id: DbId, pinned: bool) -> Result<Post, CoreError> {
        let mut existing = self.get(post_id, ArchiveFilter::IncludeArchived).await?;
        post::ensure_mutable(&existing)?;

        existing.is_pinned = pinned;
        let updated = self.posts.update(&existing).await.or_internal("pin post")?;

        tracing::info!(post_id, pinned, "Post pin state changed");
        Ok(updated)
    }

    pub async fn set_solved(&self, post_id: DbId, solved: bool) -> Result<Post, CoreError> {
        let mut existing = self.get(post_id, ArchiveFilter::IncludeArchived).await?;
        post::ensure_solvable(&existing, solved)?;

        existing.is_solved = solved;
        let updated = self.posts.update(&existing).await.or_internal("solve post")?;

        tracing::info!(post_id, solved, "Post solved state changed");
        Ok(updated)
    }

    /// Soft-delete a post. Terminal; its version history is retained.
    pub async fn archive(&self, post_id: DbId) -> Result<(), CoreError> {
        let existing = self.get(post_id, ArchiveFilter::IncludeArchived).await?;
        post::ensure_archivable(&existing)?;

        let archived = self.posts.archive(post_id).await.or_internal("archive post")?;
        if !archived {
            return Err(CoreError::PostAlreadyArchived(post_id));
        }

        tracing::info!(post_id, "Post archived");
        Ok(())
    }
}
