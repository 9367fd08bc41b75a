//! Error types for the user store.
//!
//! The store distinguishes two fatal classes: provisioning failures (the
//! bundled schema script could not be applied, so no operation can succeed)
//! and database faults on read paths. Mutation paths (`create`, `update`,
//! `delete`, `delete_many`) do not surface these; they log the underlying
//! fault and report `None`/`false`/`0` to the caller instead.

use thiserror::Error;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the user store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The bundled schema script failed to apply.
    ///
    /// This is fatal: without the users table no further operation can
    /// succeed, so construction of the store fails.
    #[error("schema provisioning failed: {0}")]
    Provisioning(#[source] sqlx::Error),

    /// A store-level fault on a read path (list, lookup, stats).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Database(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("database error:"));

        let err = StoreError::Provisioning(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("schema provisioning failed:"));
    }
}
