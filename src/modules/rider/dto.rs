use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiderProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Mean of the ratings drivers gave this rider.
    pub rating: Option<f64>,
}
