//! Shared test initialization for the handler tests.

use std::sync::Once;

use crate::auth::AuthUser;

const TEST_COUNTRIES: &[&str] = &["United Kingdom", "France", "Japan", "Brazil", "Canada"];

pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        if std::env::var("GENERIC_DATA_STORE_TYPE").is_err() {
            unsafe {
                std::env::set_var("GENERIC_DATA_STORE_TYPE", "sqlite");
                std::env::set_var("GENERIC_DATA_STORE_URL", "sqlite:/tmp/userhub_axum_test.db");
            }
        }

        if let Ok(url) = std::env::var("GENERIC_DATA_STORE_URL") {
            if let Some(path) = url.strip_prefix("sqlite:") {
                let _ = std::fs::remove_file(path.strip_prefix("//").unwrap_or(path));
            }
        }
    });

    if let Err(e) = userhub::init().await {
        eprintln!("Warning: Failed to initialize stores: {e}");
    }

    for country in TEST_COUNTRIES {
        if let Err(e) = userhub::CountryStore::upsert_country(country).await {
            eprintln!("Warning: Failed to seed country {country}: {e}");
        }
    }
}

/// A pre-authenticated caller for handler tests, bypassing token
/// extraction.
pub fn test_auth_user() -> AuthUser {
    AuthUser {
        id: 1,
        role: "user".to_string(),
    }
}

pub fn unique(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{prefix}{nanos}")
}
