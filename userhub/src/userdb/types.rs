use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role assigned when a user has no role association.
pub(crate) const DEFAULT_ROLE: &str = "user";

/// Core user identity row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Database-assigned identifier
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// A user together with its resolved role.
///
/// Role resolution is total: users without a role association get
/// [`DEFAULT_ROLE`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserWithRole {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: String,
}

/// Login credentials view: user identity plus stored password material.
/// Never serialized.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Raw join row; the LEFT JOIN leaves `role` NULL when no association
/// exists.
#[derive(Debug, Clone, FromRow)]
pub(super) struct UserRoleRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct UserCredentialsRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

pub(crate) fn role_or_default(role: Option<String>) -> String {
    role.unwrap_or_else(|| DEFAULT_ROLE.to_string())
}

impl From<UserRoleRow> for UserWithRole {
    fn from(row: UserRoleRow) -> Self {
        UserWithRole {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
            role: role_or_default(row.role),
        }
    }
}

impl From<UserCredentialsRow> for UserCredentials {
    fn from(row: UserCredentialsRow) -> Self {
        UserCredentials {
            id: row.id,
            username: row.username,
            password: row.password,
            role: role_or_default(row.role),
        }
    }
}
