use thiserror::Error;

/// Store-level failures, classified from the driver error structure.
///
/// Classification never inspects error message text: connection-class
/// failures are recognized from the `sqlx::Error` variant and constraint
/// violations from `DatabaseError::kind()`.
#[derive(Clone, Error, Debug)]
pub enum StorageError {
    /// The store could not be reached or the pool gave up.
    #[error("Database connection was refused: {0}")]
    Unavailable(String),

    /// A unique constraint rejected the write. Carries the constraint
    /// name when the backend reports one (PostgreSQL does, SQLite does not).
    #[error("Unique constraint violation")]
    UniqueViolation(Option<String>),

    /// A transaction could not begin or commit.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Anything else the driver reported. The message is diagnostic only
    /// and is never parsed by callers.
    #[error("Database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Classify an error raised while beginning or committing a transaction.
    ///
    /// Connection refusal and constraint violations keep their usual
    /// classification; everything else becomes `Transaction`.
    pub(crate) fn from_tx(err: sqlx::Error) -> Self {
        match Self::from(err) {
            StorageError::Database(msg) => StorageError::Transaction(msg),
            other => other,
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Tls(_) => StorageError::Unavailable(err.to_string()),
            sqlx::Error::Database(db) => {
                if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
                    StorageError::UniqueViolation(db.constraint().map(str::to_string))
                } else {
                    StorageError::Database(db.to_string())
                }
            }
            _ => StorageError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classifies_as_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = StorageError::from(sqlx::Error::Io(io));

        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn test_pool_timeout_classifies_as_unavailable() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);

        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_classifies_as_database() {
        let err = StorageError::from(sqlx::Error::RowNotFound);

        assert!(matches!(err, StorageError::Database(_)));
    }

    #[test]
    fn test_from_tx_rewrites_database_to_transaction() {
        let err = StorageError::from_tx(sqlx::Error::RowNotFound);

        assert!(matches!(err, StorageError::Transaction(_)));
    }

    #[test]
    fn test_from_tx_keeps_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = StorageError::from_tx(sqlx::Error::Io(io));

        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<StorageError>();
    }
}
