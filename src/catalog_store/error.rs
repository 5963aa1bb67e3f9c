use rusqlite::ErrorCode;
use thiserror::Error;

use super::validation::ValidationError;

/// Errors surfaced by catalog store write and read operations.
///
/// Lookup misses are not errors: they come back as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CatalogStoreError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type CatalogStoreResult<T> = Result<T, CatalogStoreError>;

/// Returns the extended SQLite result code if `err` is a constraint failure.
pub(super) fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

/// Maps a failed insert into the error taxonomy of the store.
pub(super) fn map_insert_error(
    err: rusqlite::Error,
    category_name: Option<&str>,
) -> CatalogStoreError {
    match (constraint_code(&err), category_name) {
        (Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE), Some(name)) => {
            CatalogStoreError::DuplicateName(name.to_string())
        }
        (Some(_), _) => CatalogStoreError::ConstraintViolation(err.to_string()),
        (None, _) => CatalogStoreError::Storage(err),
    }
}
