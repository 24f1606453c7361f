use tracing::info;

use super::dto::RatingRequest;
use super::model::{NewRating, RatingDirection};
use crate::common::error::{AppError, AppResult};
use crate::modules::driver::dto::DriverProfileResponse;
use crate::modules::driver::service::DriverService;
use crate::modules::ride::model::{Ride, RideStatus};
use crate::modules::ride::service::RideService;
use crate::modules::rider::dto::RiderProfileResponse;
use crate::modules::rider::service::RiderService;
use crate::state::AppState;

pub struct RatingService;

impl RatingService {
    pub async fn rate_rider(
        state: &AppState,
        driver_id: i64,
        ride_id: i64,
        req: RatingRequest,
    ) -> AppResult<RiderProfileResponse> {
        let ride = RideService::find_ride(state, ride_id).await?;
        if ride.driver_id != driver_id {
            return Err(AppError::forbidden("Only the driver of this ride can rate its rider"));
        }
        Self::record(state, &ride, RatingDirection::DriverRatesRider, driver_id, ride.rider_id, req).await?;
        RiderService::profile(state, ride.rider_id).await
    }

    pub async fn rate_driver(
        state: &AppState,
        rider_id: i64,
        ride_id: i64,
        req: RatingRequest,
    ) -> AppResult<DriverProfileResponse> {
        let ride = RideService::find_ride(state, ride_id).await?;
        if ride.rider_id != rider_id {
            return Err(AppError::forbidden("Only the rider of this ride can rate its driver"));
        }
        Self::record(state, &ride, RatingDirection::RiderRatesDriver, rider_id, ride.driver_id, req).await?;
        DriverService::profile(state, ride.driver_id).await
    }

    async fn record(
        state: &AppState,
        ride: &Ride,
        direction: RatingDirection,
        rater_id: i64,
        ratee_id: i64,
        req: RatingRequest,
    ) -> AppResult<()> {
        if ride.status != RideStatus::Ended {
            return Err(AppError::invalid_state(format!(
                "Ride must be ENDED before rating, current status: {}",
                ride.status
            )));
        }

        let inserted = state
            .ratings
            .insert_rating(NewRating {
                ride_id: ride.id,
                direction,
                rater_id,
                ratee_id,
                value: req.rating,
                comment: req.comment,
            })
            .await?;

        match inserted {
            Some(rating) => {
                info!(ride_id = ride.id, direction = direction.as_str(), value = rating.value, "Rating recorded");
                Ok(())
            }
            None => Err(AppError::conflict("This ride has already been rated")),
        }
    }
}
