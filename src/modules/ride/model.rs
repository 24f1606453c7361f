use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideRequestStatus {
    Pending,
    Accepted,
    Cancelled,
}

impl RideRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideRequestStatus::Pending => "PENDING",
            RideRequestStatus::Accepted => "ACCEPTED",
            RideRequestStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for RideRequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RideRequestStatus::Pending),
            "ACCEPTED" => Ok(RideRequestStatus::Accepted),
            "CANCELLED" => Ok(RideRequestStatus::Cancelled),
            other => Err(anyhow::anyhow!("Unknown ride request status: {}", other)),
        }
    }
}

impl fmt::Display for RideRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Accepted,
    Started,
    Ended,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Accepted => "ACCEPTED",
            RideStatus::Started => "STARTED",
            RideStatus::Ended => "ENDED",
            RideStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for RideStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPTED" => Ok(RideStatus::Accepted),
            "STARTED" => Ok(RideStatus::Started),
            "ENDED" => Ok(RideStatus::Ended),
            "CANCELLED" => Ok(RideStatus::Cancelled),
            other => Err(anyhow::anyhow!("Unknown ride status: {}", other)),
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    pub id: i64,
    pub rider_id: i64,
    pub pickup_location: String,
    pub destination: String,
    pub vehicle_type: String,
    pub status: RideRequestStatus,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub requested_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRideRequest {
    pub rider_id: i64,
    pub pickup_location: String,
    pub destination: String,
    pub vehicle_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: i64,
    pub ride_request_id: i64,
    pub rider_id: i64,
    pub driver_id: i64,
    pub pickup_location: String,
    pub destination: String,
    pub vehicle_type: String,
    pub status: RideStatus,
    pub initial_km: Option<f64>,
    pub fare: Option<f64>,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub accepted_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::iso8601::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub ended_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::iso8601::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub cancelled_at: Option<OffsetDateTime>,
}

/// Whose ride history is being read, or who is acting on a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Rider(i64),
    Driver(i64),
}

impl Participant {
    pub fn takes_part_in(&self, ride: &Ride) -> bool {
        match *self {
            Participant::Rider(id) => ride.rider_id == id,
            Participant::Driver(id) => ride.driver_id == id,
        }
    }
}
