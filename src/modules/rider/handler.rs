use super::dto::RiderProfileResponse;
use super::service::RiderService;
use crate::common::extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::common::pagination::{PageRequest, RidePageQuery};
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::modules::auth::dto::AuthUser;
use crate::modules::driver::dto::DriverProfileResponse;
use crate::modules::rating::dto::RatingRequest;
use crate::modules::rating::service::RatingService;
use crate::modules::ride::dto::RideRequestPayload;
use crate::modules::ride::model::{Participant, Ride, RideRequest};
use crate::modules::ride::service::RideService;
use crate::state::AppState;
use axum::{
    extract::{Extension, State},
    response::IntoResponse,
};

/// Get rider profile
#[utoipa::path(
    get,
    path = "/rider/getMyProfile",
    responses(
        (status = 200, description = "Rider profile retrieved successfully", body = ApiResponse<RiderProfileResponse>),
        (status = 401, description = "Unauthorized - missing or invalid JWT token"),
        (status = 403, description = "Access forbidden for non-rider roles")
    ),
    security(("bearer_auth" = [])),
    tag = "Rider"
)]
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse {
    match RiderService::profile(&state, user.id).await {
        Ok(profile) => ApiSuccess::ok(profile, "Rider profile retrieved successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get rider's ride history (paginated, 4 per page)
#[utoipa::path(
    get,
    path = "/rider/getMyRides",
    params(RidePageQuery),
    responses(
        (status = 200, description = "List of rides retrieved successfully", body = ApiResponse<Vec<Ride>>),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 401, description = "Unauthorized - missing or invalid JWT token")
    ),
    security(("bearer_auth" = [])),
    tag = "Rider"
)]
pub async fn get_my_rides(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<RidePageQuery>,
) -> impl IntoResponse {
    let page = match PageRequest::try_from(query) {
        Ok(page) => page,
        Err(e) => return e.into_response(),
    };
    match RideService::my_rides(&state, Participant::Rider(user.id), page).await {
        Ok(rides) => ApiSuccess::ok(rides, "Rides retrieved successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Request a ride
#[utoipa::path(
    post,
    path = "/rider/requestRide",
    request_body = RideRequestPayload,
    responses(
        (status = 200, description = "Ride request created successfully", body = ApiResponse<RideRequest>),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(("bearer_auth" = [])),
    tag = "Rider"
)]
pub async fn request_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<RideRequestPayload>,
) -> impl IntoResponse {
    match RideService::request_ride(&state, user.id, payload).await {
        Ok(request) => ApiSuccess::ok(request, "Ride request created successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Cancel a pending ride request before any driver accepts it
#[utoipa::path(
    post,
    path = "/rider/cancelRideRequest/{rideRequestId}",
    params(
        ("rideRequestId" = i64, Path, description = "ID of the ride request to cancel")
    ),
    responses(
        (status = 200, description = "Ride request cancelled", body = ApiResponse<RideRequest>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride request belongs to another rider"),
        (status = 404, description = "Ride request not found"),
        (status = 409, description = "Ride request is no longer pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Rider"
)]
pub async fn cancel_ride_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_request_id): ValidatedPath<i64>,
) -> impl IntoResponse {
    match RideService::cancel_request(&state, user.id, ride_request_id).await {
        Ok(request) => ApiSuccess::ok(request, "Ride request cancelled").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Cancel a ride
#[utoipa::path(
    post,
    path = "/rider/cancelRide/{rideId}",
    params(
        ("rideId" = i64, Path, description = "ID of the ride to cancel")
    ),
    responses(
        (status = 200, description = "Ride cancelled successfully", body = ApiResponse<Ride>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride belongs to another rider"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride already ended or cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Rider"
)]
pub async fn cancel_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_id): ValidatedPath<i64>,
) -> impl IntoResponse {
    match RideService::cancel_ride(&state, Participant::Rider(user.id), ride_id).await {
        Ok(ride) => ApiSuccess::ok(ride, "Ride cancelled successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Rate the driver of a completed ride
#[utoipa::path(
    post,
    path = "/rider/rateDriver/{rideId}",
    params(
        ("rideId" = i64, Path, description = "ID of the completed ride")
    ),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Driver rated successfully", body = ApiResponse<DriverProfileResponse>),
        (status = 400, description = "Invalid rating value"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride belongs to another rider"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride not ended or driver already rated")
    ),
    security(("bearer_auth" = [])),
    tag = "Rider"
)]
pub async fn rate_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_id): ValidatedPath<i64>,
    ValidatedJson(payload): ValidatedJson<RatingRequest>,
) -> impl IntoResponse {
    match RatingService::rate_driver(&state, user.id, ride_id, payload).await {
        Ok(driver) => ApiSuccess::ok(driver, "Driver rated successfully").into_response(),
        Err(e) => e.into_response(),
    }
}
