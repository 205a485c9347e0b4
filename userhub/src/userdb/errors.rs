use thiserror::Error;

use crate::storage::StorageError;

/// Failures of user store operations.
///
/// The uniqueness variants come from in-transaction pre-checks and exist to
/// give callers a friendly outcome; the store-level unique constraints are
/// the real guarantee and surface as `Storage(UniqueViolation)` when a
/// concurrent writer wins the race.
#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Storage(StorageError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sqlx_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        let err = UserError::from(sqlx::Error::Io(io));

        match err {
            UserError::Storage(StorageError::Unavailable(msg)) => {
                assert!(
                    msg.contains("Connection refused"),
                    "Error message should contain the original error"
                );
            }
            _ => panic!("Expected Storage(Unavailable) variant"),
        }
    }

    #[test]
    fn test_error_propagation() {
        fn check_user_exists(found: bool) -> Result<(), UserError> {
            if !found {
                return Err(UserError::NotFound);
            }
            Ok(())
        }

        fn fetch_user(found: bool) -> Result<String, UserError> {
            check_user_exists(found)?;
            Ok("user".to_string())
        }

        assert!(fetch_user(true).is_ok());
        assert!(matches!(fetch_user(false), Err(UserError::NotFound)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(UserError::NotFound.to_string(), "User not found");
        assert_eq!(UserError::EmailExists.to_string(), "Email already exists");
        assert_eq!(
            UserError::UsernameExists.to_string(),
            "Username already exists"
        );
    }
}
