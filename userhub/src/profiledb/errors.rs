use thiserror::Error;

use crate::storage::StorageError;

/// Failures of profile store operations.
///
/// The checks behind `UserNotFound`, `ProfileNotFound` and
/// `CountryNotFound` run in a fixed order inside the write
/// transaction, so a request with several problems always reports
/// the same one.
#[derive(Clone, Error, Debug)]
pub enum ProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Country not found")]
    CountryNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for ProfileError {
    fn from(err: sqlx::Error) -> Self {
        ProfileError::Storage(StorageError::from(err))
    }
}
