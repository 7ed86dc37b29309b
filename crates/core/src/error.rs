//! Domain error taxonomy.
//!
//! Every service operation fails with exactly one [`CoreError`]. Each variant
//! carries a stable machine-readable [`code`](CoreError::code) and belongs to
//! one [`ErrorKind`], which the HTTP layer maps to a status class.

use crate::content::ContentRef;
use crate::types::DbId;

/// The class of a [`CoreError`].
///
/// Operations check conditions in the order `Validation` -> `NotFound` ->
/// `Conflict` and report the first one violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    // -- Validation --------------------------------------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Content must not be empty")]
    ContentTooShort,

    #[error("Content must be at most {max} characters")]
    ContentTooLong { max: usize },

    // -- Not found ---------------------------------------------------------
    #[error("Post with id {0} not found")]
    PostNotFound(DbId),

    #[error("Comment with id {0} not found")]
    CommentNotFound(DbId),

    #[error("Parent comment with id {0} not found")]
    ParentCommentNotFound(DbId),

    #[error("Version {version_number} not found for {content}")]
    VersionNotFound {
        content: ContentRef,
        version_number: i32,
    },

    // -- Conflict ----------------------------------------------------------
    #[error("Version {version_number} is already the current version of {content}")]
    CannotRestoreCurrentVersion {
        content: ContentRef,
        version_number: i32,
    },

    #[error("Replies can only be added to top-level comments")]
    MaxNestingDepthExceeded,

    #[error("Cannot comment on archived post {0}")]
    CannotCommentOnArchivedPost(DbId),

    #[error("Cannot reply to archived comment {0}")]
    CannotReplyToArchivedComment(DbId),

    #[error("Cannot modify archived comment {0}")]
    CannotModifyArchivedComment(DbId),

    #[error("Comment {0} is already archived")]
    CommentAlreadyArchived(DbId),

    #[error("Cannot modify archived post {0}")]
    CannotModifyArchivedPost(DbId),

    #[error("Post {0} is already archived")]
    PostAlreadyArchived(DbId),

    #[error("Post {0} is already published")]
    PostAlreadyPublished(DbId),

    #[error("Post {0} is not published")]
    PostNotPublished(DbId),

    #[error("Cannot like archived {0}")]
    CannotLikeArchivedContent(ContentRef),

    // -- Auth / infrastructure --------------------------------------------
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable error code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::ContentTooShort => "CONTENT_TOO_SHORT",
            CoreError::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            CoreError::PostNotFound(_) => "POST_NOT_FOUND",
            CoreError::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            CoreError::ParentCommentNotFound(_) => "PARENT_COMMENT_NOT_FOUND",
            CoreError::VersionNotFound { .. } => "VERSION_NOT_FOUND",
            CoreError::CannotRestoreCurrentVersion { .. } => "CANNOT_RESTORE_CURRENT_VERSION",
            CoreError::MaxNestingDepthExceeded => "MAX_NESTING_DEPTH_EXCEEDED",
            CoreError::CannotCommentOnArchivedPost(_) => "CANNOT_COMMENT_ON_ARCHIVED_POST",
            CoreError::CannotReplyToArchivedComment(_) => "CANNOT_REPLY_TO_ARCHIVED_COMMENT",
            CoreError::CannotModifyArchivedComment(_) => "CANNOT_MODIFY_ARCHIVED_COMMENT",
            CoreError::CommentAlreadyArchived(_) => "COMMENT_ALREADY_ARCHIVED",
            CoreError::CannotModifyArchivedPost(_) => "CANNOT_MODIFY_ARCHIVED_POST",
            CoreError::PostAlreadyArchived(_) => "POST_ALREADY_ARCHIVED",
            CoreError::PostAlreadyPublished(_) => "POST_ALREADY_PUBLISHED",
            CoreError::PostNotPublished(_) => "POST_NOT_PUBLISHED",
            CoreError::CannotLikeArchivedContent(_) => "CANNOT_LIKE_ARCHIVED_CONTENT",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_)
            | CoreError::ContentTooShort
            | CoreError::ContentTooLong { .. } => ErrorKind::Validation,

            CoreError::PostNotFound(_)
            | CoreError::CommentNotFound(_)
            | CoreError::ParentCommentNotFound(_)
            | CoreError::VersionNotFound { .. } => ErrorKind::NotFound,

            CoreError::CannotRestoreCurrentVersion { .. }
            | CoreError::MaxNestingDepthExceeded
            | CoreError::CannotCommentOnArchivedPost(_)
            | CoreError::CannotReplyToArchivedComment(_)
            | CoreError::CannotModifyArchivedComment(_)
            | CoreError::CommentAlreadyArchived(_)
            | CoreError::CannotModifyArchivedPost(_)
            | CoreError::PostAlreadyArchived(_)
            | CoreError::PostAlreadyPublished(_)
            | CoreError::PostNotPublished(_)
            | CoreError::CannotLikeArchivedContent(_) => ErrorKind::Conflict,

            CoreError::Unauthorized(_) => ErrorKind::Unauthorized,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Failure reported by a repository implementation.
///
/// Services never surface this directly: a [`RepoError`] becomes
/// [`CoreError::Internal`] at the service boundary, except where a
/// uniqueness violation is an expected signal (snapshot numbering).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_have_validation_kind() {
        assert_eq!(CoreError::ContentTooShort.kind(), ErrorKind::Validation);
        assert_eq!(
            CoreError::InvalidInput("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CoreError::ContentTooLong { max: 10 }.kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn version_not_found_code_and_message() {
        let err = CoreError::VersionNotFound {
            content: ContentRef::Post(7),
            version_number: 3,
        };
        assert_eq!(err.code(), "VERSION_NOT_FOUND");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Version 3 not found for post 7");
    }

    #[test]
    fn state_transition_errors_are_conflicts() {
        let conflicts = [
            CoreError::MaxNestingDepthExceeded,
            CoreError::CommentAlreadyArchived(1),
            CoreError::CannotRestoreCurrentVersion {
                content: ContentRef::Comment(2),
                version_number: 4,
            },
            CoreError::PostNotPublished(3),
        ];
        for err in conflicts {
            assert_eq!(err.kind(), ErrorKind::Conflict, "{}", err.code());
        }
    }

    #[test]
    fn internal_error_code() {
        let err = CoreError::Internal("boom".into());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
