//! Declarative request validation
//!
//! Each exposed operation has a schema describing its payload: required
//! fields, types, length bounds, enumerations, patterns and format checks.
//! Validation runs strictly before any store access and produces an ordered
//! list of violations for the client.

mod schema;
mod schemas;

pub use schema::{Schema, Violation};
pub use schemas::{
    CREATE_PROFILE_SCHEMA, CREATE_USER_SCHEMA, LOGIN_SCHEMA, PAGINATION_SCHEMA,
    SEARCH_USER_PROFILES_SCHEMA, SORT_USER_PROFILES_SCHEMA, UPDATE_PASSWORD_SCHEMA,
    UPDATE_PROFILE_SCHEMA, UPDATE_USER_SCHEMA, USER_ID_SCHEMA,
};
