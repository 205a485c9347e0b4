use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::profiledb::errors::ProfileError;
use crate::profiledb::types::{
    CountryUserCount, Profile, ProfileFields, SortBy, SortOrder, UserProfileRecord, UserProfileRow,
};
use crate::storage::{
    DB_TABLE_COUNTRIES, DB_TABLE_PROFILES, DB_TABLE_ROLES, DB_TABLE_USER_ROLES, DB_TABLE_USERS,
    StorageError, validate_postgres_table_schema,
};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), ProfileError> {
    let profiles = DB_TABLE_PROFILES.as_str();
    let users = DB_TABLE_USERS.as_str();
    let countries = DB_TABLE_COUNTRIES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {profiles} (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL UNIQUE REFERENCES {users}(id),
            first_name TEXT,
            last_name TEXT,
            bio TEXT,
            profile_picture TEXT,
            age BIGINT,
            country_id BIGINT NOT NULL REFERENCES {countries}(id),
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_profile_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), ProfileError> {
    let profiles = DB_TABLE_PROFILES.as_str();

    let expected_columns = vec![
        ("id", "bigint"),
        ("user_id", "bigint"),
        ("first_name", "text"),
        ("last_name", "text"),
        ("bio", "text"),
        ("profile_picture", "text"),
        ("age", "bigint"),
        ("country_id", "bigint"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, profiles, &expected_columns, |msg| {
        ProfileError::Storage(StorageError::Database(msg))
    })
    .await
}

fn joined_select(where_clause: &str, tail: &str) -> String {
    let users = DB_TABLE_USERS.as_str();
    let profiles = DB_TABLE_PROFILES.as_str();
    let countries = DB_TABLE_COUNTRIES.as_str();
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    format!(
        r#"
        SELECT
            u.id AS user_id,
            u.username,
            u.email,
            p.id AS profile_id,
            p.first_name,
            p.last_name,
            p.bio,
            p.profile_picture,
            p.age,
            c.country_name AS country,
            r.role_name AS role
        FROM {users} u
        LEFT JOIN {profiles} p ON u.id = p.user_id
        LEFT JOIN {countries} c ON p.country_id = c.id
        LEFT JOIN {user_roles} ur ON u.id = ur.user_id
        LEFT JOIN {roles} r ON ur.role_id = r.id
        {where_clause}
        {tail}
        "#
    )
}

pub(super) async fn create_profile_postgres(
    pool: &Pool<Postgres>,
    user_id: i64,
    fields: &ProfileFields,
    country: &str,
) -> Result<Profile, ProfileError> {
    let users = DB_TABLE_USERS.as_str();
    let profiles = DB_TABLE_PROFILES.as_str();
    let countries = DB_TABLE_COUNTRIES.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ProfileError::Storage(StorageError::from_tx(e)))?;

    let user_exists: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if user_exists.is_none() {
        return Err(ProfileError::UserNotFound);
    }

    let country_id: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {countries} WHERE country_name = $1"))
            .bind(country)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(country_id) = country_id else {
        return Err(ProfileError::CountryNotFound);
    };

    let now = Utc::now();
    let profile: Profile = sqlx::query_as(&format!(
        r#"
        INSERT INTO {profiles}
            (user_id, first_name, last_name, bio, profile_picture, age, country_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, first_name, last_name, bio, profile_picture, age, country_id, created_at, updated_at
        "#
    ))
    .bind(user_id)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.bio)
    .bind(&fields.profile_picture)
    .bind(fields.age)
    .bind(country_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit()
        .await
        .map_err(|e| ProfileError::Storage(StorageError::from_tx(e)))?;

    Ok(profile)
}

pub(super) async fn update_profile_postgres(
    pool: &Pool<Postgres>,
    user_id: i64,
    fields: &ProfileFields,
    country: Option<&str>,
) -> Result<Profile, ProfileError> {
    let users = DB_TABLE_USERS.as_str();
    let profiles = DB_TABLE_PROFILES.as_str();
    let countries = DB_TABLE_COUNTRIES.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ProfileError::Storage(StorageError::from_tx(e)))?;

    let user_exists: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if user_exists.is_none() {
        return Err(ProfileError::UserNotFound);
    }

    let current_country_id: Option<i64> =
        sqlx::query_scalar(&format!("SELECT country_id FROM {profiles} WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(current_country_id) = current_country_id else {
        return Err(ProfileError::ProfileNotFound);
    };

    // Without a new country name the stored one stays
    let country_id = match country {
        Some(name) => {
            let resolved: Option<i64> = sqlx::query_scalar(&format!(
                "SELECT id FROM {countries} WHERE country_name = $1"
            ))
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(resolved) = resolved else {
                return Err(ProfileError::CountryNotFound);
            };
            resolved
        }
        None => current_country_id,
    };

    let profile: Profile = sqlx::query_as(&format!(
        r#"
        UPDATE {profiles}
        SET
            first_name = $1,
            last_name = $2,
            bio = $3,
            profile_picture = $4,
            age = $5,
            country_id = $6,
            updated_at = $7
        WHERE user_id = $8
        RETURNING id, user_id, first_name, last_name, bio, profile_picture, age, country_id, created_at, updated_at
        "#
    ))
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.bio)
    .bind(&fields.profile_picture)
    .bind(fields.age)
    .bind(country_id)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit()
        .await
        .map_err(|e| ProfileError::Storage(StorageError::from_tx(e)))?;

    Ok(profile)
}

pub(super) async fn get_users_profile_postgres(
    pool: &Pool<Postgres>,
) -> Result<Vec<UserProfileRecord>, ProfileError> {
    let rows: Vec<UserProfileRow> = sqlx::query_as(&joined_select("", "ORDER BY u.id"))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(UserProfileRecord::from).collect())
}

pub(super) async fn get_user_profile_by_id_postgres(
    pool: &Pool<Postgres>,
    user_id: i64,
) -> Result<Option<UserProfileRecord>, ProfileError> {
    let row: Option<UserProfileRow> = sqlx::query_as(&joined_select("WHERE u.id = $1", ""))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(UserProfileRecord::from))
}

pub(super) async fn get_paginated_users_profile_postgres(
    pool: &Pool<Postgres>,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserProfileRecord>, ProfileError> {
    let rows: Vec<UserProfileRow> =
        sqlx::query_as(&joined_select("", "ORDER BY u.id LIMIT $1 OFFSET $2"))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(UserProfileRecord::from).collect())
}

pub(super) async fn search_user_profiles_postgres(
    pool: &Pool<Postgres>,
    term: &str,
) -> Result<Vec<UserProfileRecord>, ProfileError> {
    let pattern = format!("%{term}%");
    let rows: Vec<UserProfileRow> = sqlx::query_as(&joined_select(
        r#"
        WHERE
            u.username ILIKE $1 OR
            u.email ILIKE $1 OR
            p.first_name ILIKE $1 OR
            p.last_name ILIKE $1
        "#,
        "ORDER BY u.id",
    ))
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(UserProfileRecord::from).collect())
}

pub(super) async fn sort_user_profiles_postgres(
    pool: &Pool<Postgres>,
    sort_by: SortBy,
    sort_order: SortOrder,
) -> Result<Vec<UserProfileRecord>, ProfileError> {
    let tail = format!("ORDER BY {} {}", sort_by.column(), sort_order.keyword());
    let rows: Vec<UserProfileRow> = sqlx::query_as(&joined_select("", &tail))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(UserProfileRecord::from).collect())
}

pub(super) async fn count_users_by_country_postgres(
    pool: &Pool<Postgres>,
) -> Result<Vec<CountryUserCount>, ProfileError> {
    let users = DB_TABLE_USERS.as_str();
    let profiles = DB_TABLE_PROFILES.as_str();
    let countries = DB_TABLE_COUNTRIES.as_str();

    let counts: Vec<CountryUserCount> = sqlx::query_as(&format!(
        r#"
        SELECT
            c.country_name AS country,
            COUNT(u.id) AS user_count
        FROM {users} u
        LEFT JOIN {profiles} p ON u.id = p.user_id
        LEFT JOIN {countries} c ON p.country_id = c.id
        GROUP BY c.country_name
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(counts)
}
