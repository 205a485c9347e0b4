use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::userdb::DEFAULT_ROLE;

/// A profile row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub age: Option<i64>,
    pub country_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable profile fields as accepted by create and update.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub age: Option<i64>,
}

/// A user joined with its profile, country and role.
///
/// Users without a profile still appear; the profile columns are NULL
/// on their row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfileRecord {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub profile_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub age: Option<i64>,
    pub country: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct UserProfileRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub profile_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub age: Option<i64>,
    pub country: Option<String>,
    pub role: Option<String>,
}

impl From<UserProfileRow> for UserProfileRecord {
    fn from(row: UserProfileRow) -> Self {
        UserProfileRecord {
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            profile_id: row.profile_id,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            profile_picture: row.profile_picture,
            age: row.age,
            country: row.country,
            role: row.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        }
    }
}

/// Per-country user tally. `country` is NULL for users without a
/// profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CountryUserCount {
    pub country: Option<String>,
    pub user_count: i64,
}

/// Sortable columns for profile listings. SQL column expressions come
/// from this enum only, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Username,
    Email,
    FirstName,
    LastName,
}

impl SortBy {
    pub(crate) fn column(self) -> &'static str {
        match self {
            SortBy::Username => "u.username",
            SortBy::Email => "u.email",
            SortBy::FirstName => "p.first_name",
            SortBy::LastName => "p.last_name",
        }
    }
}

impl FromStr for SortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(SortBy::Username),
            "email" => Ok(SortBy::Email),
            "first_name" => Ok(SortBy::FirstName),
            "last_name" => Ok(SortBy::LastName),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}
