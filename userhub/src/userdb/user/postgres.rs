use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::storage::{
    DB_TABLE_PROFILES, DB_TABLE_ROLES, DB_TABLE_USER_ROLES, DB_TABLE_USER_SECRETS, DB_TABLE_USERS,
    StorageError, validate_postgres_table_schema,
};
use crate::userdb::errors::UserError;
use crate::userdb::types::{
    User, UserCredentials, UserCredentialsRow, UserRoleRow, UserWithRole, role_or_default,
};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {users} (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {secrets} (
            user_id BIGINT PRIMARY KEY REFERENCES {users}(id),
            password TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {roles} (
            id BIGSERIAL PRIMARY KEY,
            role_name TEXT NOT NULL UNIQUE
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {user_roles} (
            user_id BIGINT NOT NULL REFERENCES {users}(id),
            role_id BIGINT NOT NULL REFERENCES {roles}(id),
            PRIMARY KEY (user_id, role_id)
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("id", "bigint"),
        ("username", "text"),
        ("email", "text"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, users, &expected_columns, |msg| {
        UserError::Storage(StorageError::Database(msg))
    })
    .await
}

async fn fetch_role_postgres(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    user_id: i64,
) -> Result<Option<String>, UserError> {
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let role: Option<String> = sqlx::query_scalar(&format!(
        r#"
        SELECT r.role_name
        FROM {roles} r
        JOIN {user_roles} ur ON ur.role_id = r.id
        WHERE ur.user_id = $1
        "#
    ))
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(role)
}

pub(super) async fn create_user_postgres(
    pool: &Pool<Postgres>,
    username: &str,
    email: &str,
    password: &str,
) -> Result<UserWithRole, UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    // Uniqueness pre-checks run inside the transaction; the unique
    // constraints remain the final arbiter for concurrent writers.
    let email_taken: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;
    if email_taken.is_some() {
        return Err(UserError::EmailExists);
    }

    let username_taken: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE username = $1"))
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?;
    if username_taken.is_some() {
        return Err(UserError::UsernameExists);
    }

    let now = Utc::now();
    let user: User = sqlx::query_as(&format!(
        r#"
        INSERT INTO {users} (username, email, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, created_at, updated_at
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(&format!(
        "INSERT INTO {secrets} (user_id, password, updated_at) VALUES ($1, $2, $3)"
    ))
    .bind(user.id)
    .bind(password)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let role = fetch_role_postgres(&mut tx, user.id).await?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    Ok(UserWithRole {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
        updated_at: user.updated_at,
        role: role_or_default(role),
    })
}

pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    id: i64,
    username: &str,
    email: &str,
) -> Result<UserWithRole, UserError> {
    let users = DB_TABLE_USERS.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(UserError::NotFound);
    }

    let user: User = sqlx::query_as(&format!(
        r#"
        UPDATE {users}
        SET username = $1, email = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, username, email, created_at, updated_at
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let role = fetch_role_postgres(&mut tx, id).await?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    Ok(UserWithRole {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
        updated_at: user.updated_at,
        role: role_or_default(role),
    })
}

pub(super) async fn patch_password_postgres(
    pool: &Pool<Postgres>,
    id: i64,
    password: &str,
) -> Result<String, UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(UserError::NotFound);
    }

    sqlx::query(&format!(
        "UPDATE {secrets} SET password = $1, updated_at = $2 WHERE user_id = $3"
    ))
    .bind(password)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let role = fetch_role_postgres(&mut tx, id).await?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    Ok(role_or_default(role))
}

pub(super) async fn delete_user_postgres(pool: &Pool<Postgres>, id: i64) -> Result<(), UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();
    let profiles = DB_TABLE_PROFILES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(UserError::NotFound);
    }

    // A user row never outlives its secret, profile or role links.
    sqlx::query(&format!("DELETE FROM {user_roles} WHERE user_id = $1"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM {profiles} WHERE user_id = $1"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM {secrets} WHERE user_id = $1"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM {users} WHERE id = $1"))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    Ok(())
}

pub(super) async fn get_users_postgres(pool: &Pool<Postgres>) -> Result<Vec<UserWithRole>, UserError> {
    let users = DB_TABLE_USERS.as_str();
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let rows: Vec<UserRoleRow> = sqlx::query_as(&format!(
        r#"
        SELECT u.id, u.username, u.email, u.created_at, u.updated_at, r.role_name AS role
        FROM {users} u
        LEFT JOIN {user_roles} ur ON u.id = ur.user_id
        LEFT JOIN {roles} r ON ur.role_id = r.id
        ORDER BY u.id
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(UserWithRole::from).collect())
}

pub(super) async fn get_user_by_id_postgres(
    pool: &Pool<Postgres>,
    id: i64,
) -> Result<Option<UserWithRole>, UserError> {
    let users = DB_TABLE_USERS.as_str();
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let row: Option<UserRoleRow> = sqlx::query_as(&format!(
        r#"
        SELECT u.id, u.username, u.email, u.created_at, u.updated_at, r.role_name AS role
        FROM {users} u
        LEFT JOIN {user_roles} ur ON u.id = ur.user_id
        LEFT JOIN {roles} r ON ur.role_id = r.id
        WHERE u.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserWithRole::from))
}

pub(super) async fn get_user_by_username_postgres(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<UserCredentials>, UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let row: Option<UserCredentialsRow> = sqlx::query_as(&format!(
        r#"
        SELECT u.id, u.username, s.password, r.role_name AS role
        FROM {users} u
        JOIN {secrets} s ON s.user_id = u.id
        LEFT JOIN {user_roles} ur ON u.id = ur.user_id
        LEFT JOIN {roles} r ON ur.role_id = r.id
        WHERE u.username = $1
        "#
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserCredentials::from))
}

pub(super) async fn count_users_postgres(pool: &Pool<Postgres>) -> Result<i64, UserError> {
    let users = DB_TABLE_USERS.as_str();

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {users}"))
        .fetch_one(pool)
        .await?;

    Ok(count)
}
