mod errors;
mod types;
mod user;

pub use errors::UserError;
pub use types::{User, UserCredentials, UserWithRole};
pub use user::UserStore;

pub(crate) use types::DEFAULT_ROLE;

pub async fn init() -> Result<(), UserError> {
    UserStore::init().await
}
