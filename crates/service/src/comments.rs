//! Comment tree service: creation under the two-level rule, edits,
//! archival and threaded listing.

use std::sync::Arc;

use agora_core::comment::{
    self, build_tree, count_nodes, prune_archived, Comment, CommentNode, NewComment,
};
use agora_core::content::{validate_body, ArchiveFilter, ContentRef, MAX_COMMENT_CONTENT_LENGTH};
use agora_core::error::CoreError;
use agora_core::post;
use agora_core::repository::{CommentRepository, PostRepository};
use agora_core::types::DbId;

use crate::error::RepoResultExt;
use crate::versioning::VersioningService;

#[derive(Clone)]
pub struct CommentTreeService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    versioning: VersioningService,
}

impl CommentTreeService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        versioning: VersioningService,
    ) -> Self {
        Self {
            comments,
            posts,
            versioning,
        }
    }

    /// Create a top-level comment, or a reply when `parent_id` is given.
    /// The new comment's body becomes version 1.
    pub async fn create(
        &self,
        post_id: DbId,
        author_id: DbId,
        content: &str,
        parent_id: Option<DbId>,
    ) -> Result<Comment, CoreError> {
        validate_body(content, MAX_COMMENT_CONTENT_LENGTH)?;

        let post = self
            .posts
            .find_by_id(post_id, ArchiveFilter::IncludeArchived)
            .await
            .or_internal("load post")?
            .ok_or(CoreError::PostNotFound(post_id))?;

        let parent = match parent_id {
            Some(parent_id) => {
                let parent = self
                    .comments
                    .find_by_id(parent_id, ArchiveFilter::IncludeArchived)
                    .await
                    .or_internal("load parent comment")?
                    .ok_or(CoreError::ParentCommentNotFound(parent_id))?;
                comment::ensure_parent_in_post(&parent, post_id)?;
                Some(parent)
            }
            None => None,
        };

        post::ensure_commentable(&post)?;
        if let Some(parent) = &parent {
            comment::ensure_can_reply(parent)?;
        }

        let created = self
            .comments
            .create(&NewComment {
                post_id,
                author_id,
                parent_id,
                content: content.to_string(),
            })
            .await
            .or_internal("create comment")?;
        self.posts
            .adjust_comment_count(post_id, 1)
            .await
            .or_internal("adjust comment count")?;
        self.versioning
            .record_snapshot(ContentRef::Comment(created.id), &created.content, author_id)
            .await?;

        tracing::info!(
            comment_id = created.id,
            post_id,
            parent_id = ?parent_id,
            user_id = author_id,
            "Comment created"
        );
        Ok(created)
    }

    /// Replace a comment's body and snapshot the new text.
    pub async fn update(
        &self,
        comment_id: DbId,
        editor_id: DbId,
        content: &str,
    ) -> Result<Comment, CoreError> {
        validate_body(content, MAX_COMMENT_CONTENT_LENGTH)?;

        let mut existing = self
            .comments
            .find_by_id(comment_id, ArchiveFilter::IncludeArchived)
            .await
            .or_internal("load comment")?
            .ok_or(CoreError::CommentNotFound(comment_id))?;
        comment::ensure_mutable(&existing)?;

        existing.content = content.to_string();
        let updated = self
            .comments
            .update(&existing)
            .await
            .or_internal("update comment")?;
        self.versioning
            .record_snapshot(ContentRef::Comment(comment_id), &updated.content, editor_id)
            .await?;

        tracing::info!(comment_id, user_id = editor_id, "Comment updated");
        Ok(updated)
    }

    /// Soft-delete a comment. Replies are left in place.
    pub async fn archive(&self, comment_id: DbId) -> Result<(), CoreError> {
        let existing = self
            .comments
            .find_by_id(comment_id, ArchiveFilter::IncludeArchived)
            .await
            .or_internal("load comment")?
            .ok_or(CoreError::CommentNotFound(comment_id))?;
        comment::ensure_archivable(&existing)?;

        let archived = self
            .comments
            .archive(comment_id)
            .await
            .or_internal("archive comment")?;
        if !archived {
            // Lost a race with a concurrent archive of the same comment.
            return Err(CoreError::CommentAlreadyArchived(comment_id));
        }
        self.posts
            .adjust_comment_count(existing.post_id, -1)
            .await
            .or_internal("adjust comment count")?;

        tracing::info!(comment_id, post_id = existing.post_id, "Comment archived");
        Ok(())
    }

    pub async fn find(&self, comment_id: DbId, filter: ArchiveFilter) -> Result<Comment, CoreError> {
        self.comments
            .find_by_id(comment_id, filter)
            .await
            .or_internal("load comment")?
            .ok_or(CoreError::CommentNotFound(comment_id))
    }

    /// The comments of a post arranged into threads.
    ///
    /// With [`ArchiveFilter::ExcludeArchived`], archived comments are left
    /// out except as bodiless tombstones above live replies.
    pub async fn list_for_post(
        &self,
        post_id: DbId,
        filter: ArchiveFilter,
    ) -> Result<Vec<CommentNode>, CoreError> {
        self.posts
            .find_by_id(post_id, filter)
            .await
            .or_internal("load post")?
            .ok_or(CoreError::PostNotFound(post_id))?;

        // Archived parents are needed to place their live replies.
        let flat = self
            .comments
            .find_by_post_id(post_id, ArchiveFilter::IncludeArchived)
            .await
            .or_internal("list comments")?;
        let total = flat.len();
        let tree = Self::build_tree(flat);

        let dropped = total - count_nodes(&tree);
        if dropped > 0 {
            tracing::debug!(post_id, dropped, "Comments with missing parents left out of tree");
        }

        Ok(match filter {
            ArchiveFilter::IncludeArchived => tree,
            ArchiveFilter::ExcludeArchived => prune_archived(tree),
        })
    }

    /// Arrange a flat comment list into threads. Pure; see
    /// [`agora_core::comment::build_tree`].
    pub fn build_tree(flat: Vec<Comment>) -> Vec<CommentNode> {
        build_tree(flat)
    }
}
