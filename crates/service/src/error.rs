//! Conversion of storage failures at the service boundary.

use agora_core::error::{CoreError, RepoError};

/// Log a repository failure and replace it with an opaque internal error.
pub(crate) fn internal(err: RepoError, operation: &'static str) -> CoreError {
    tracing::error!(error = %err, operation, "Repository call failed");
    CoreError::Internal(format!("{operation} failed"))
}

/// `?`-friendly adapter from repository results to service results.
pub(crate) trait RepoResultExt<T> {
    fn or_internal(self, operation: &'static str) -> Result<T, CoreError>;
}

impl<T> RepoResultExt<T> for Result<T, RepoError> {
    fn or_internal(self, operation: &'static str) -> Result<T, CoreError> {
        self.map_err(|err| internal(err, operation))
    }
}
