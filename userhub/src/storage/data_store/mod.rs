mod config;
mod types;

pub(crate) use config::{
    DB_TABLE_COUNTRIES, DB_TABLE_PROFILES, DB_TABLE_ROLES, DB_TABLE_USER_ROLES,
    DB_TABLE_USER_SECRETS, DB_TABLE_USERS, GENERIC_DATA_STORE,
};
