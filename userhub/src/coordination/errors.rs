use thiserror::Error;

use crate::countrydb::CountryError;
use crate::profiledb::ProfileError;
use crate::storage::StorageError;
use crate::userdb::UserError;
use crate::validation::Violation;

/// The closed set of failures a service call can surface.
///
/// Store errors never cross this boundary raw; the `From` impls below
/// classify them, so callers can map each variant to a response
/// without inspecting strings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinationError {
    #[error("Validation failed")]
    ValidationFailed(Vec<Violation>),

    #[error("Invalid country")]
    InvalidCountry,

    #[error("Email already exists")]
    EmailExists,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Username or email already exists")]
    UniquenessConflict,

    #[error("Profile already exists for this user")]
    ProfileExists,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Country not found")]
    CountryNotFound,

    /// A list endpoint that treats an empty result as an error; the
    /// payload is the client-facing message.
    #[error("{0}")]
    EmptyResult(String),

    #[error("Database connection was refused")]
    Unavailable,

    #[error("Transaction error occurred")]
    TransactionFailed,

    #[error("{0}")]
    Internal(String),
}

impl CoordinationError {
    /// Log the error and return self, allowing method chaining at the
    /// point of classification.
    pub fn log(self) -> Self {
        match &self {
            Self::ValidationFailed(violations) => {
                tracing::debug!(count = violations.len(), "Validation failed")
            }
            Self::Unavailable => tracing::error!("Database connection was refused"),
            Self::TransactionFailed => tracing::error!("Transaction error occurred"),
            Self::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!("Request failed: {}", other),
        }
        self
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(_) => Self::Unavailable,
            StorageError::Transaction(_) => Self::TransactionFailed,
            StorageError::UniqueViolation(_) => Self::UniquenessConflict,
            StorageError::Database(msg) => Self::Internal(msg),
        }
        .log()
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => Self::UserNotFound.log(),
            UserError::EmailExists => Self::EmailExists.log(),
            UserError::UsernameExists => Self::UsernameExists.log(),
            UserError::Storage(StorageError::UniqueViolation(_)) => Self::UniquenessConflict.log(),
            UserError::Storage(e) => Self::from(e),
        }
    }
}

impl From<ProfileError> for CoordinationError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::UserNotFound => Self::UserNotFound.log(),
            ProfileError::ProfileNotFound => Self::ProfileNotFound.log(),
            ProfileError::CountryNotFound => Self::CountryNotFound.log(),
            // The only unique constraint on profiles is one-per-user
            ProfileError::Storage(StorageError::UniqueViolation(_)) => Self::ProfileExists.log(),
            ProfileError::Storage(e) => Self::from(e),
        }
    }
}

impl From<CountryError> for CoordinationError {
    fn from(err: CountryError) -> Self {
        match err {
            CountryError::Empty => Self::Internal("No countries found".to_string()).log(),
            CountryError::Storage(e) => Self::from(e),
        }
    }
}
