mod country;
mod errors;
mod types;

pub use country::CountryStore;
pub use errors::CountryError;
pub use types::Country;

pub async fn init() -> Result<(), CountryError> {
    CountryStore::init().await
}
