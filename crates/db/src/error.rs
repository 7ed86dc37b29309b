use agora_core::error::RepoError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a driver error onto the repository error taxonomy.
///
/// Unique violations keep their constraint name so callers can tell a lost
/// numbering race from a real failure.
pub(crate) fn classify(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            tracing::debug!(constraint, "Unique constraint violation");
            return RepoError::UniqueViolation(constraint.to_string());
        }
    }
    RepoError::Storage(err.to_string())
}
