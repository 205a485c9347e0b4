use crate::coordination::errors::CoordinationError;
use crate::countrydb::{Country, CountryStore};

pub async fn get_countries() -> Result<Vec<Country>, CoordinationError> {
    Ok(CountryStore::get_countries().await?)
}

/// Reject a country name that is not in the reference set. Runs before
/// profile writes so a typo fails fast as a client error.
pub async fn validate_country(country: &str) -> Result<(), CoordinationError> {
    let countries = CountryStore::get_countries().await?;

    if !countries.iter().any(|c| c.country_name == country) {
        return Err(CoordinationError::InvalidCountry.log());
    }

    Ok(())
}
