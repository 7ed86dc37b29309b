//! Content version snapshots and version-number arithmetic.
//!
//! Versions are immutable full-text snapshots, numbered contiguously from 1
//! per [`ContentRef`]. Restoring an old version appends a new snapshot rather
//! than rewinding the counter.

use serde::Serialize;

use crate::content::ContentRef;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Number of times a snapshot insert is attempted when a concurrent writer
/// claims the same version number first.
pub const MAX_SNAPSHOT_ATTEMPTS: u32 = 3;

/// An immutable snapshot of a post or comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentVersion {
    pub id: DbId,
    pub content: ContentRef,
    pub version_number: i32,
    pub body: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

/// Input for inserting a snapshot. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContentVersion {
    pub content: ContentRef,
    pub version_number: i32,
    pub body: String,
    pub created_by: DbId,
}

/// Two snapshots of the same content, oldest first as requested by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct VersionComparison {
    pub old_version: ContentVersion,
    pub new_version: ContentVersion,
}

/// Reject version numbers below 1.
pub fn validate_version_number(version_number: i32) -> Result<(), CoreError> {
    if version_number < 1 {
        return Err(CoreError::InvalidInput(format!(
            "Version number must be at least 1, got {version_number}"
        )));
    }
    Ok(())
}

/// Validate a compare request: both numbers valid and distinct.
pub fn validate_comparison(old_version: i32, new_version: i32) -> Result<(), CoreError> {
    validate_version_number(old_version)?;
    validate_version_number(new_version)?;
    if old_version == new_version {
        return Err(CoreError::InvalidInput(
            "Cannot compare a version with itself".into(),
        ));
    }
    Ok(())
}

/// The number the next snapshot receives, given the current latest (if any).
pub fn next_version_number(latest: Option<i32>) -> i32 {
    latest.map_or(1, |v| v + 1)
}

/// Reject restoring to the version that is already current.
pub fn ensure_not_current(
    content: ContentRef,
    target: i32,
    latest: Option<i32>,
) -> Result<(), CoreError> {
    if latest == Some(target) {
        return Err(CoreError::CannotRestoreCurrentVersion {
            content,
            version_number: target,
        });
    }
    Ok(())
}

/// Check that a version history is contiguous from 1 in ascending order.
pub fn is_contiguous(versions: &[ContentVersion]) -> bool {
    versions
        .iter()
        .enumerate()
        .all(|(i, v)| v.version_number == i as i32 + 1)
}
