use super::dto::DriverProfileResponse;
use crate::common::error::{AppError, AppResult};
use crate::modules::rating::model::RatingDirection;
use crate::state::AppState;

pub struct DriverService;

impl DriverService {
    pub async fn profile(state: &AppState, driver_id: i64) -> AppResult<DriverProfileResponse> {
        let user = state
            .users
            .find_user_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User not found with id: {}", driver_id)))?;
        let driver = state
            .users
            .find_driver(driver_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Driver not found with id: {}", driver_id)))?;
        let rating = state
            .ratings
            .average_rating(driver_id, RatingDirection::RiderRatesDriver)
            .await?;

        Ok(DriverProfileResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            license_number: driver.license_number,
            vehicle_number: driver.vehicle_number,
            vehicle_type: driver.vehicle_type,
            available: driver.available,
            rating,
        })
    }
}
