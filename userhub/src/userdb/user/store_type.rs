use crate::storage::{GENERIC_DATA_STORE, StorageError};
use crate::userdb::errors::UserError;
use crate::userdb::types::{UserCredentials, UserWithRole};

use super::postgres::*;
use super::sqlite::*;

fn unsupported() -> UserError {
    UserError::Storage(StorageError::Database(
        "Unsupported database type".to_string(),
    ))
}

pub struct UserStore;

impl UserStore {
    /// Initialize the user, secret and role tables
    pub(crate) async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(unsupported()),
        }
    }

    /// Create a user and its password secret in one transaction
    #[tracing::instrument(skip(password), fields(username = %username))]
    pub async fn create_user(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserWithRole, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_user_sqlite(pool, username, email, password).await
        } else if let Some(pool) = store.as_postgres() {
            create_user_postgres(pool, username, email, password).await
        } else {
            Err(unsupported())
        }
    }

    /// Update a user's username and email
    #[tracing::instrument(fields(user_id = %id))]
    pub async fn update_user(id: i64, username: &str, email: &str) -> Result<UserWithRole, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            update_user_sqlite(pool, id, username, email).await
        } else if let Some(pool) = store.as_postgres() {
            update_user_postgres(pool, id, username, email).await
        } else {
            Err(unsupported())
        }
    }

    /// Replace a user's stored password, returning the resolved role
    #[tracing::instrument(skip(password), fields(user_id = %id))]
    pub async fn patch_password(id: i64, password: &str) -> Result<String, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            patch_password_sqlite(pool, id, password).await
        } else if let Some(pool) = store.as_postgres() {
            patch_password_postgres(pool, id, password).await
        } else {
            Err(unsupported())
        }
    }

    /// Delete a user along with its secret, profile and role links
    #[tracing::instrument(fields(user_id = %id))]
    pub async fn delete_user(id: i64) -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            delete_user_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            delete_user_postgres(pool, id).await
        } else {
            Err(unsupported())
        }
    }

    pub async fn get_users() -> Result<Vec<UserWithRole>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_users_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            get_users_postgres(pool).await
        } else {
            Err(unsupported())
        }
    }

    #[tracing::instrument(fields(user_id = %id))]
    pub async fn get_user_by_id(id: i64) -> Result<Option<UserWithRole>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            get_user_by_id_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_id_postgres(pool, id).await
        } else {
            Err(unsupported())
        };

        match &result {
            Ok(Some(_)) => tracing::debug!(found = true, "User lookup completed"),
            Ok(None) => tracing::debug!(found = false, "User lookup completed"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    /// Fetch a user's credentials view for login
    #[tracing::instrument(fields(username = %username))]
    pub async fn get_user_by_username(username: &str) -> Result<Option<UserCredentials>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_by_username_sqlite(pool, username).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_username_postgres(pool, username).await
        } else {
            Err(unsupported())
        }
    }

    pub async fn count_users() -> Result<i64, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            count_users_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            count_users_postgres(pool).await
        } else {
            Err(unsupported())
        }
    }
}
