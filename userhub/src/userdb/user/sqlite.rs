use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::storage::{
    DB_TABLE_PROFILES, DB_TABLE_ROLES, DB_TABLE_USER_ROLES, DB_TABLE_USER_SECRETS, DB_TABLE_USERS,
    StorageError,
};
use crate::userdb::errors::UserError;
use crate::userdb::types::{
    User, UserCredentials, UserCredentialsRow, UserRoleRow, UserWithRole, role_or_default,
};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {users} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {secrets} (
            user_id INTEGER PRIMARY KEY REFERENCES {users}(id),
            password TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {roles} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            role_name TEXT NOT NULL UNIQUE
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {user_roles} (
            user_id INTEGER NOT NULL REFERENCES {users}(id),
            role_id INTEGER NOT NULL REFERENCES {roles}(id),
            PRIMARY KEY (user_id, role_id)
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

async fn fetch_role_sqlite(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    user_id: i64,
) -> Result<Option<String>, UserError> {
    let roles = DB_TABLE_ROLES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let role: Option<String> = sqlx::query_scalar(&format!(
        r#"
        SELECT r.role_name
        FROM {roles} r
        JOIN {user_roles} ur ON ur.role_id = r.id
        WHERE ur.user_id = ?
        "#
    ))
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(role)
}

pub(super) async fn create_user_sqlite(
    pool: &Pool<Sqlite>,
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
        sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;
    if email_taken.is_some() {
        return Err(UserError::EmailExists);
    }

    let username_taken: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE username = ?"))
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
        VALUES (?, ?, ?, ?)
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
        "INSERT INTO {secrets} (user_id, password, updated_at) VALUES (?, ?, ?)"
    ))
    .bind(user.id)
    .bind(password)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let role = fetch_role_sqlite(&mut tx, user.id).await?;

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

pub(super) async fn update_user_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    username: &str,
    email: &str,
) -> Result<UserWithRole, UserError> {
    let users = DB_TABLE_USERS.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(UserError::NotFound);
    }

    let user: User = sqlx::query_as(&format!(
        r#"
        UPDATE {users}
        SET username = ?, email = ?, updated_at = ?
        WHERE id = ?
        RETURNING id, username, email, created_at, updated_at
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let role = fetch_role_sqlite(&mut tx, id).await?;

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

pub(super) async fn patch_password_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    password: &str,
) -> Result<String, UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(UserError::NotFound);
    }

    sqlx::query(&format!(
        "UPDATE {secrets} SET password = ?, updated_at = ? WHERE user_id = ?"
    ))
    .bind(password)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let role = fetch_role_sqlite(&mut tx, id).await?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    Ok(role_or_default(role))
}

pub(super) async fn delete_user_sqlite(pool: &Pool<Sqlite>, id: i64) -> Result<(), UserError> {
    let users = DB_TABLE_USERS.as_str();
    let secrets = DB_TABLE_USER_SECRETS.as_str();
    let profiles = DB_TABLE_PROFILES.as_str();
    let user_roles = DB_TABLE_USER_ROLES.as_str();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {users} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(UserError::NotFound);
    }

    // A user row never outlives its secret, profile or role links.
    sqlx::query(&format!("DELETE FROM {user_roles} WHERE user_id = ?"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM {profiles} WHERE user_id = ?"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM {secrets} WHERE user_id = ?"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM {users} WHERE id = ?"))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit()
        .await
        .map_err(|e| UserError::Storage(StorageError::from_tx(e)))?;

    Ok(())
}

pub(super) async fn get_users_sqlite(pool: &Pool<Sqlite>) -> Result<Vec<UserWithRole>, UserError> {
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

pub(super) async fn get_user_by_id_sqlite(
    pool: &Pool<Sqlite>,
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
        WHERE u.id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserWithRole::from))
}

pub(super) async fn get_user_by_username_sqlite(
    pool: &Pool<Sqlite>,
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
        WHERE u.username = ?
        "#
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserCredentials::from))
}

pub(super) async fn count_users_sqlite(pool: &Pool<Sqlite>) -> Result<i64, UserError> {
    let users = DB_TABLE_USERS.as_str();

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {users}"))
        .fetch_one(pool)
        .await?;

    Ok(count)
}
