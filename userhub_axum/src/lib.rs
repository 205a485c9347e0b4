//! userhub_axum - axum integration for the userhub library
//!
//! Provides the HTTP surface of the account API: the request handlers,
//! the bearer token extractor, the response envelope and the combined
//! router.

mod auth;
mod error;
mod health;
mod profiles;
mod response;
mod router;
mod users;

#[cfg(test)]
mod test_utils;

pub use auth::AuthUser;
pub use error::ApiError;
pub use response::{ApiResponse, Pagination};
pub use router::{userhub_router, userhub_router_no_trace};

// Re-export what an embedding server needs alongside the router
pub use userhub::API_ROUTE_PREFIX;
pub use userhub::init;
