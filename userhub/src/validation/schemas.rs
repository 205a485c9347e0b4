//! Per-operation payload schemas
//!
//! One schema per exposed mutation or parameterized read. Messages are part
//! of the public contract and are asserted by the handler tests.

use std::sync::LazyLock;

use super::schema::{FieldRule, FormatRule, Schema};

const PASSWORD_PATTERN_MESSAGE: &str = "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character";

fn username_rule() -> FieldRule {
    FieldRule::string("username", "Username must be a string")
        .required("Username is required")
        .min_length(6, "Username must be at least 6 characters long")
        .max_length(50, "Username must be at most 50 characters long")
}

fn email_rule() -> FieldRule {
    FieldRule::string("email", "Email must be a string")
        .required("Email is required")
        .max_length(100, "Email must be at most 100 characters long")
        .format(FormatRule::Email, "Email must be a valid email address")
}

fn password_rule() -> FieldRule {
    FieldRule::string("password", "Password must be a string")
        .required("Password is required")
        .min_length(8, "Password must be at least 8 characters long")
        .max_length(255, "Password must be at most 255 characters long")
        .format(FormatRule::Password, PASSWORD_PATTERN_MESSAGE)
}

fn profile_rules(country_required: bool) -> Vec<FieldRule> {
    let mut country = FieldRule::string("country", "Country must be a string")
        .max_length(100, "Country name must be at most 100 characters long");
    if country_required {
        country = country.required("Country is required");
    }

    vec![
        FieldRule::string("firstName", "First name must be a string")
            .min_length(1, "First name must not be empty")
            .max_length(50, "First name must be at most 50 characters long"),
        FieldRule::string("lastName", "Last name must be a string")
            .min_length(1, "Last name must not be empty")
            .max_length(50, "Last name must be at most 50 characters long"),
        FieldRule::string("bio", "Bio must be a string"),
        FieldRule::string("profilePicture", "Profile picture must be a string")
            .max_length(
                255,
                "Profile picture URL must be at most 255 characters long",
            )
            .format(FormatRule::Uri, "Profile picture must be a valid URL"),
        FieldRule::integer("age", "Age must be an integer")
            .minimum(0, "Age must be a non-negative integer"),
        country,
    ]
}

/// Path parameter: numeric user id.
pub static USER_ID_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request parameters must be an object",
        vec![
            FieldRule::string("userId", "User ID must be a string")
                .required("User ID is required")
                .pattern("^[0-9]+$", "User ID must contain only digits"),
        ],
    )
});

pub static CREATE_USER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request body must be an object",
        vec![username_rule(), email_rule(), password_rule()],
    )
});

pub static UPDATE_USER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request body must be an object",
        vec![username_rule(), email_rule()],
    )
});

pub static UPDATE_PASSWORD_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("Request body must be an object", vec![password_rule()]));

pub static CREATE_PROFILE_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("Request body must be an object", profile_rules(true)));

pub static UPDATE_PROFILE_SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("Request body must be an object", profile_rules(false)));

pub static LOGIN_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request body must be an object",
        vec![
            FieldRule::string("username", "Username must be a string")
                .required("Username is required"),
            FieldRule::string("password", "Password must be a string")
                .required("Password is required"),
        ],
    )
});

pub static SEARCH_USER_PROFILES_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request parameters must be an object",
        vec![
            FieldRule::string("query", "Query must be a string")
                .required("Query parameter is required")
                .min_length(3, "Query must be at least 3 characters long"),
        ],
    )
});

pub static SORT_USER_PROFILES_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request parameters must be an object",
        vec![
            FieldRule::string("sortBy", "SortBy must be a string")
                .required("SortBy parameter is required")
                .one_of(
                    &["username", "email", "first_name", "last_name"],
                    "SortBy must be one of the following: username, email, first_name, last_name",
                ),
            FieldRule::string("sortOrder", "SortOrder must be a string").one_of(
                &["ASC", "DESC"],
                "SortOrder must be either 'ASC' or 'DESC'",
            ),
        ],
    )
});

pub static PAGINATION_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "Request parameters must be an object",
        vec![
            FieldRule::integer("page", "Page must be an integer")
                .required("Page parameter is required")
                .minimum(1, "Page must be a positive integer"),
            FieldRule::integer("limit", "Limit must be an integer")
                .required("Limit parameter is required")
                .minimum(1, "Limit must be a positive integer")
                .maximum(100, "Limit must be at most 100"),
        ],
    )
});
