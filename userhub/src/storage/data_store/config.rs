//! Database store and table configuration

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

// Configuration
static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").expect("GENERIC_DATA_STORE_TYPE must be set")
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL must be set")
});

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();
    let store_url = GENERIC_DATA_STORE_URL.as_str();

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            }) as Box<dyn DataStore>
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }) as Box<dyn DataStore>,
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    };

    Mutex::new(store)
});

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "uh_".to_string()));

pub(crate) static DB_TABLE_USERS: LazyLock<String> =
    LazyLock::new(|| format!("{}users", DB_TABLE_PREFIX.as_str()));

pub(crate) static DB_TABLE_USER_SECRETS: LazyLock<String> =
    LazyLock::new(|| format!("{}user_secrets", DB_TABLE_PREFIX.as_str()));

pub(crate) static DB_TABLE_PROFILES: LazyLock<String> =
    LazyLock::new(|| format!("{}profiles", DB_TABLE_PREFIX.as_str()));

pub(crate) static DB_TABLE_COUNTRIES: LazyLock<String> =
    LazyLock::new(|| format!("{}countries", DB_TABLE_PREFIX.as_str()));

pub(crate) static DB_TABLE_ROLES: LazyLock<String> =
    LazyLock::new(|| format!("{}roles", DB_TABLE_PREFIX.as_str()));

pub(crate) static DB_TABLE_USER_ROLES: LazyLock<String> =
    LazyLock::new(|| format!("{}user_roles", DB_TABLE_PREFIX.as_str()));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_share_prefix() {
        let prefix = DB_TABLE_PREFIX.as_str();

        assert_eq!(DB_TABLE_USERS.as_str(), format!("{prefix}users"));
        assert_eq!(
            DB_TABLE_USER_SECRETS.as_str(),
            format!("{prefix}user_secrets")
        );
        assert_eq!(DB_TABLE_PROFILES.as_str(), format!("{prefix}profiles"));
        assert_eq!(DB_TABLE_COUNTRIES.as_str(), format!("{prefix}countries"));
        assert_eq!(DB_TABLE_ROLES.as_str(), format!("{prefix}roles"));
        assert_eq!(DB_TABLE_USER_ROLES.as_str(), format!("{prefix}user_roles"));
    }

    #[test]
    fn test_db_table_prefix_default() {
        // The default only applies when the variable is absent; the static
        // may already be initialized from .env_test, so test the same logic.
        let prefix = env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "uh_".to_string());
        assert!(!prefix.is_empty());
    }
}
