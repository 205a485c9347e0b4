use std::env;
use std::sync::LazyLock;

/// Route prefix the HTTP layer mounts the API under.
pub static API_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    let prefix = env::var("API_ROUTE_PREFIX").unwrap_or_else(|_| "/api/v1".to_string());
    if !prefix.starts_with('/') {
        panic!("API_ROUTE_PREFIX must begin with '/'");
    }
    prefix
});
