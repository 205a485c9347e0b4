use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the country reference table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Country {
    pub id: i64,
    pub country_name: String,
}
