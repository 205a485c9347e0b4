mod auth;
mod country;
mod errors;
mod profile;
mod user;

pub use auth::login;
pub use country::{get_countries, validate_country};
pub use errors::CoordinationError;
pub use profile::{
    PaginatedUserProfiles, count_users_by_country, create_profile, get_paginated_users_profile,
    get_user_profile_by_id, get_users_profile, search_user_profiles, sort_user_profiles,
    update_profile,
};
pub use user::{create_user, delete_user, get_user_by_id, get_users, update_password, update_user};
