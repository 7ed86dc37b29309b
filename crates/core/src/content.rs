//! Versionable content references and body validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum post body length in characters.
pub const MAX_POST_CONTENT_LENGTH: usize = 50_000;

/// Maximum comment body length in characters.
pub const MAX_COMMENT_CONTENT_LENGTH: usize = 10_000;

pub const CONTENT_TYPE_POST: &str = "post";
pub const CONTENT_TYPE_COMMENT: &str = "comment";

/// The piece of content a version snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ContentRef {
    Post(DbId),
    Comment(DbId),
}

impl ContentRef {
    /// The database id of the referenced post or comment.
    pub fn id(&self) -> DbId {
        match self {
            ContentRef::Post(id) | ContentRef::Comment(id) => *id,
        }
    }

    /// Discriminator stored in the `content_type` column.
    pub fn content_type(&self) -> &'static str {
        match self {
            ContentRef::Post(_) => CONTENT_TYPE_POST,
            ContentRef::Comment(_) => CONTENT_TYPE_COMMENT,
        }
    }

    /// Rebuild a reference from its stored `(content_type, content_id)` pair.
    pub fn from_parts(content_type: &str, id: DbId) -> Option<Self> {
        match content_type {
            CONTENT_TYPE_POST => Some(ContentRef::Post(id)),
            CONTENT_TYPE_COMMENT => Some(ContentRef::Comment(id)),
            _ => None,
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.content_type(), self.id())
    }
}

/// Whether a read should return soft-deleted (archived) rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFilter {
    #[default]
    ExcludeArchived,
    IncludeArchived,
}

impl ArchiveFilter {
    pub fn from_flag(include_archived: bool) -> Self {
        if include_archived {
            ArchiveFilter::IncludeArchived
        } else {
            ArchiveFilter::ExcludeArchived
        }
    }

    /// Whether a row with the given `deleted_at` state passes this filter.
    pub fn admits(&self, archived: bool) -> bool {
        match self {
            ArchiveFilter::ExcludeArchived => !archived,
            ArchiveFilter::IncludeArchived => true,
        }
    }
}

/// Validate a post or comment body: non-blank and at most `max` characters.
pub fn validate_body(body: &str, max: usize) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::ContentTooShort);
    }
    if body.chars().count() > max {
        return Err(CoreError::ContentTooLong { max });
    }
    Ok(())
}
