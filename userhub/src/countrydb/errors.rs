use thiserror::Error;

use crate::storage::StorageError;

#[derive(Clone, Error, Debug)]
pub enum CountryError {
    /// The reference table has no rows; the deployment is missing its
    /// seed data.
    #[error("No countries found")]
    Empty,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for CountryError {
    fn from(err: sqlx::Error) -> Self {
        CountryError::Storage(StorageError::from(err))
    }
}
