//! Shared test initialization.
//!
//! Loads `.env_test` once, removes any stale SQLite test database, and
//! brings the stores up with the country reference data seeded. Table
//! creation and seeding are idempotent, so every test can call
//! [`init_test_environment`] without coordination beyond `#[serial]`.

use std::sync::Once;

pub const TEST_COUNTRIES: &[&str] = &["United Kingdom", "France", "Japan", "Brazil", "Canada"];

pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        // Unit tests must never touch a real deployment database
        if std::env::var("GENERIC_DATA_STORE_TYPE").is_err() {
            unsafe {
                std::env::set_var("GENERIC_DATA_STORE_TYPE", "sqlite");
                std::env::set_var("GENERIC_DATA_STORE_URL", "sqlite:/tmp/userhub_core_test.db");
            }
        }

        if let Some(db_path) = extract_sqlite_file_path() {
            let _ = std::fs::remove_file(&db_path);
        }
    });

    ensure_database_initialized().await;
}

async fn ensure_database_initialized() {
    if let Err(e) = crate::init().await {
        eprintln!("Warning: Failed to initialize stores: {e}");
    }

    for country in TEST_COUNTRIES {
        if let Err(e) = crate::countrydb::CountryStore::upsert_country(country).await {
            eprintln!("Warning: Failed to seed country {country}: {e}");
        }
    }
}

/// File path of the SQLite test database named by
/// `GENERIC_DATA_STORE_URL`, if any.
fn extract_sqlite_file_path() -> Option<String> {
    let url = std::env::var("GENERIC_DATA_STORE_URL").ok()?;
    let path = url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("//").unwrap_or(path);
    if path.contains(":memory:") {
        return None;
    }
    Some(path.to_string())
}
