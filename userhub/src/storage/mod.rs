mod data_store;
mod errors;
mod schema_validation;

pub use errors::StorageError;

pub(crate) use data_store::{
    DB_TABLE_COUNTRIES, DB_TABLE_PROFILES, DB_TABLE_ROLES, DB_TABLE_USER_ROLES,
    DB_TABLE_USER_SECRETS, DB_TABLE_USERS, GENERIC_DATA_STORE,
};

// Re-export schema validation function for internal use
pub(crate) use schema_validation::validate_postgres_table_schema;

pub async fn init() -> Result<(), StorageError> {
    let _ = *data_store::GENERIC_DATA_STORE;

    Ok(())
}

/// Run a trivial query against the active store, for health checks.
pub async fn ping() -> Result<(), StorageError> {
    let store = GENERIC_DATA_STORE.lock().await;

    if let Some(pool) = store.as_sqlite() {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    } else if let Some(pool) = store.as_postgres() {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    } else {
        Err(StorageError::Database(
            "Unsupported database type".to_string(),
        ))
    }
}
