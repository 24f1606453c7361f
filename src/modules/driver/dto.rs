use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub vehicle_number: String,
    pub vehicle_type: Option<String>,
    pub available: bool,
    /// Mean of the ratings riders gave this driver.
    pub rating: Option<f64>,
}
