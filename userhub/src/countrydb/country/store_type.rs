use crate::countrydb::errors::CountryError;
use crate::countrydb::types::Country;
use crate::storage::{GENERIC_DATA_STORE, StorageError};

use super::postgres::*;
use super::sqlite::*;

fn unsupported() -> CountryError {
    CountryError::Storage(StorageError::Database(
        "Unsupported database type".to_string(),
    ))
}

pub struct CountryStore;

impl CountryStore {
    pub(crate) async fn init() -> Result<(), CountryError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(unsupported()),
        }
    }

    /// The reference country list; `Empty` when the seed data is
    /// missing.
    pub async fn get_countries() -> Result<Vec<Country>, CountryError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let rows = if let Some(pool) = store.as_sqlite() {
            get_countries_sqlite(pool).await?
        } else if let Some(pool) = store.as_postgres() {
            get_countries_postgres(pool).await?
        } else {
            return Err(unsupported());
        };

        if rows.is_empty() {
            return Err(CountryError::Empty);
        }

        Ok(rows)
    }

    /// Idempotent insert used by deployments to seed the reference set
    pub async fn upsert_country(country_name: &str) -> Result<(), CountryError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            upsert_country_sqlite(pool, country_name).await
        } else if let Some(pool) = store.as_postgres() {
            upsert_country_postgres(pool, country_name).await
        } else {
            Err(unsupported())
        }
    }
}
