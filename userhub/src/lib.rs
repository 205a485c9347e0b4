//! userhub - account, profile and country coordination library
//!
//! This crate provides the storage, validation and service layers for
//! a user account API: accounts with password secrets and roles,
//! per-user profiles tied to a country reference table, and bearer
//! token issuance for login.

mod config;
mod coordination;
mod countrydb;
mod profiledb;
mod storage;
mod token;
mod userdb;
mod validation;

#[cfg(test)]
mod test_utils;

pub use coordination::{
    CoordinationError, PaginatedUserProfiles, count_users_by_country, create_profile, create_user,
    delete_user, get_countries, get_paginated_users_profile, get_user_by_id,
    get_user_profile_by_id, get_users, get_users_profile, login, search_user_profiles,
    sort_user_profiles, update_password, update_profile, update_user, validate_country,
};

pub use config::API_ROUTE_PREFIX;

pub use countrydb::{Country, CountryStore};
pub use profiledb::{
    CountryUserCount, Profile, ProfileFields, SortBy, SortOrder, UserProfileRecord,
};
pub use storage::ping;
pub use token::{Claims, TokenError, verify_token};
pub use userdb::{User, UserWithRole};
pub use validation::{
    CREATE_PROFILE_SCHEMA, CREATE_USER_SCHEMA, LOGIN_SCHEMA, PAGINATION_SCHEMA,
    SEARCH_USER_PROFILES_SCHEMA, SORT_USER_PROFILES_SCHEMA, Schema, UPDATE_PASSWORD_SCHEMA,
    UPDATE_PROFILE_SCHEMA, UPDATE_USER_SCHEMA, USER_ID_SCHEMA, Violation,
};

/// Initialize the storage layer and create the tables.
///
/// Order matters: profiles reference both users and countries.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    countrydb::init().await?;
    userdb::init().await?;
    profiledb::init().await?;
    Ok(())
}
