use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingDirection {
    RiderRatesDriver,
    DriverRatesRider,
}

impl RatingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingDirection::RiderRatesDriver => "RIDER_RATES_DRIVER",
            RatingDirection::DriverRatesRider => "DRIVER_RATES_RIDER",
        }
    }
}

impl FromStr for RatingDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RIDER_RATES_DRIVER" => Ok(RatingDirection::RiderRatesDriver),
            "DRIVER_RATES_RIDER" => Ok(RatingDirection::DriverRatesRider),
            other => Err(anyhow::anyhow!("Unknown rating direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rating {
    pub id: i64,
    pub ride_id: i64,
    pub direction: RatingDirection,
    pub rater_id: i64,
    pub ratee_id: i64,
    pub value: i32,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub ride_id: i64,
    pub direction: RatingDirection,
    pub rater_id: i64,
    pub ratee_id: i64,
    pub value: i32,
    pub comment: Option<String>,
}
