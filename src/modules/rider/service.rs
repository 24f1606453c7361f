use super::dto::RiderProfileResponse;
use crate::common::error::{AppError, AppResult};
use crate::modules::rating::model::RatingDirection;
use crate::state::AppState;

pub struct RiderService;

impl RiderService {
    pub async fn profile(state: &AppState, rider_id: i64) -> AppResult<RiderProfileResponse> {
        let user = state
            .users
            .find_user_by_id(rider_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Rider not found with id: {}", rider_id)))?;
        let rating = state
            .ratings
            .average_rating(rider_id, RatingDirection::DriverRatesRider)
            .await?;

        Ok(RiderProfileResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            rating,
        })
    }
}
