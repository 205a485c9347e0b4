mod errors;
mod profile;
mod types;

pub use errors::ProfileError;
pub use profile::ProfileStore;
pub use types::{CountryUserCount, Profile, ProfileFields, SortBy, SortOrder, UserProfileRecord};

pub async fn init() -> Result<(), ProfileError> {
    ProfileStore::init().await
}
