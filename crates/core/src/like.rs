//! Likes on posts and comments.

use serde::Serialize;

use crate::content::ContentRef;
use crate::types::{DbId, Timestamp};

/// What a like points at. Stored as two nullable columns of which exactly
/// one is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Post(DbId),
    Comment(DbId),
}

impl LikeTarget {
    /// Build a target from the stored `(post_id, comment_id)` pair.
    ///
    /// Returns `None` unless exactly one side is present.
    pub fn from_columns(post_id: Option<DbId>, comment_id: Option<DbId>) -> Option<Self> {
        match (post_id, comment_id) {
            (Some(id), None) => Some(LikeTarget::Post(id)),
            (None, Some(id)) => Some(LikeTarget::Comment(id)),
            _ => None,
        }
    }

    pub fn post_id(&self) -> Option<DbId> {
        match self {
            LikeTarget::Post(id) => Some(*id),
            LikeTarget::Comment(_) => None,
        }
    }

    pub fn comment_id(&self) -> Option<DbId> {
        match self {
            LikeTarget::Comment(id) => Some(*id),
            LikeTarget::Post(_) => None,
        }
    }

    pub fn as_content_ref(&self) -> ContentRef {
        match self {
            LikeTarget::Post(id) => ContentRef::Post(*id),
            LikeTarget::Comment(id) => ContentRef::Comment(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Like {
    pub id: DbId,
    pub user_id: DbId,
    pub target: LikeTarget,
    pub created_at: Timestamp,
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    /// Whether the user likes the target after the toggle.
    pub liked: bool,
    /// The target's like count after the toggle.
    pub like_count: i32,
}
