use serde::Deserialize;
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"pickupLocation": "NIT Raipur", "destination": "Raipur Railway Station", "vehicleType": "Sedan"}))]
pub struct RideRequestPayload {
    #[validate(custom(function = "not_blank", message = "Pickup location is required"))]
    pub pickup_location: String,
    #[validate(custom(function = "not_blank", message = "Destination is required"))]
    pub destination: String,
    #[validate(custom(function = "not_blank", message = "Vehicle type is required"))]
    pub vehicle_type: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"startTimestamp": "2025-11-04T10:15:30Z", "initialKm": 0}))]
pub struct StartRideRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub start_timestamp: Option<OffsetDateTime>,
    #[validate(range(min = 0.0, message = "Initial km cannot be negative"))]
    pub initial_km: Option<f64>,
}
