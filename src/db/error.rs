use thiserror::Error;

/// Failures surfaced by store operations.
///
/// A missing model, part, or comment is not an error: reads return `None` and
/// writes return `false`. Only conflicts, malformed documents, and faults from
/// the storage engine end up here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Storage engine error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// True when the engine rejected a write because of a UNIQUE (or CHECK) constraint.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
