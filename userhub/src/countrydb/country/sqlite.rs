use sqlx::{Pool, Sqlite};

use crate::countrydb::errors::CountryError;
use crate::countrydb::types::Country;
use crate::storage::DB_TABLE_COUNTRIES;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), CountryError> {
    let countries = DB_TABLE_COUNTRIES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {countries} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            country_name TEXT NOT NULL UNIQUE
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn get_countries_sqlite(
    pool: &Pool<Sqlite>,
) -> Result<Vec<Country>, CountryError> {
    let countries = DB_TABLE_COUNTRIES.as_str();

    let rows: Vec<Country> = sqlx::query_as(&format!(
        "SELECT id, country_name FROM {countries} ORDER BY country_name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub(super) async fn upsert_country_sqlite(
    pool: &Pool<Sqlite>,
    country_name: &str,
) -> Result<(), CountryError> {
    let countries = DB_TABLE_COUNTRIES.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {countries} (country_name)
        VALUES (?)
        ON CONFLICT (country_name) DO NOTHING
        "#
    ))
    .bind(country_name)
    .execute(pool)
    .await?;

    Ok(())
}
