//! Post entity and its lifecycle rules.
//!
//! A post is a draft until published, and archived once `deleted_at` is set.
//! Archived wins over published when both timestamps are present.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum post title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: DbId,
    pub community_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_solved: bool,
    pub like_count: i32,
    pub helpful_count: i32,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

/// Input for inserting a draft post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub community_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl Post {
    pub fn status(&self) -> PostStatus {
        if self.deleted_at.is_some() {
            PostStatus::Archived
        } else if self.published_at.is_some() {
            PostStatus::Published
        } else {
            PostStatus::Draft
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status() == PostStatus::Archived
    }
}

/// Validate a post title (non-blank, at most 200 characters).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::InvalidInput("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::InvalidInput(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Edits, pinning and solving all require a non-archived post.
pub fn ensure_mutable(post: &Post) -> Result<(), CoreError> {
    if post.is_archived() {
        return Err(CoreError::CannotModifyArchivedPost(post.id));
    }
    Ok(())
}

/// Comments may only be added to non-archived posts.
pub fn ensure_commentable(post: &Post) -> Result<(), CoreError> {
    if post.is_archived() {
        return Err(CoreError::CannotCommentOnArchivedPost(post.id));
    }
    Ok(())
}

pub fn ensure_publishable(post: &Post) -> Result<(), CoreError> {
    match post.status() {
        PostStatus::Draft => Ok(()),
        PostStatus::Published => Err(CoreError::PostAlreadyPublished(post.id)),
        PostStatus::Archived => Err(CoreError::CannotModifyArchivedPost(post.id)),
    }
}

/// Marking solved needs a published post; clearing the flag only needs a
/// non-archived one.
pub fn ensure_solvable(post: &Post, solved: bool) -> Result<(), CoreError> {
    ensure_mutable(post)?;
    if solved && post.status() != PostStatus::Published {
        return Err(CoreError::PostNotPublished(post.id));
    }
    Ok(())
}

pub fn ensure_archivable(post: &Post) -> Result<(), CoreError> {
    if post.is_archived() {
        return Err(CoreError::PostAlreadyArchived(post.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn draft() -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            community_id: 1,
            author_id: 1,
            title: "Hello".into(),
            content: "Body".into(),
            is_pinned: false,
            is_solved: false,
            like_count: 0,
            helpful_count: 0,
            comment_count: 0,
            view_count: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
            deleted_at: None,
        }
    }

    fn published() -> Post {
        Post {
            published_at: Some(Utc::now()),
            ..draft()
        }
    }

    fn archived() -> Post {
        Post {
            deleted_at: Some(Utc::now()),
            ..published()
        }
    }

    #[test]
    fn status_is_derived_from_timestamps() {
        assert_eq!(draft().status(), PostStatus::Draft);
        assert_eq!(published().status(), PostStatus::Published);
        assert_eq!(archived().status(), PostStatus::Archived);
    }

    #[test]
    fn publish_transitions() {
        assert!(ensure_publishable(&draft()).is_ok());
        assert_matches!(
            ensure_publishable(&published()),
            Err(CoreError::PostAlreadyPublished(1))
        );
        assert_matches!(
            ensure_publishable(&archived()),
            Err(CoreError::CannotModifyArchivedPost(1))
        );
    }

    #[test]
    fn only_published_posts_can_be_solved() {
        assert_matches!(
            ensure_solvable(&draft(), true),
            Err(CoreError::PostNotPublished(1))
        );
        assert!(ensure_solvable(&draft(), false).is_ok());
        assert!(ensure_solvable(&published(), true).is_ok());
        assert_matches!(
            ensure_solvable(&archived(), true),
            Err(CoreError::CannotModifyArchivedPost(1))
        );
    }

    #[test]
    fn archive_is_terminal() {
        assert!(ensure_archivable(&draft()).is_ok());
        assert_matches!(
            ensure_archivable(&archived()),
            Err(CoreError::PostAlreadyArchived(1))
        );
        assert_matches!(
            ensure_mutable(&archived()),
            Err(CoreError::CannotModifyArchivedPost(1))
        );
        assert_matches!(
            ensure_commentable(&archived()),
            Err(CoreError::CannotCommentOnArchivedPost(1))
        );
    }

    #[test]
    fn title_validation() {
        assert_matches!(validate_title("  "), Err(CoreError::InvalidInput(_)));
        assert_matches!(
            validate_title(&"x".repeat(201)),
            Err(CoreError::InvalidInput(_))
        );
        assert!(validate_title(&"x".repeat(200)).is_ok());
    }
}
