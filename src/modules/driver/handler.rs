use super::dto::DriverProfileResponse;
use super::service::DriverService;
use crate::common::extract::{optional_json, ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::common::pagination::{PageRequest, RidePageQuery};
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::modules::auth::dto::AuthUser;
use crate::modules::rating::dto::RatingRequest;
use crate::modules::rating::service::RatingService;
use crate::modules::ride::dto::StartRideRequest;
use crate::modules::ride::model::{Participant, Ride};
use crate::modules::ride::service::RideService;
use crate::modules::rider::dto::RiderProfileResponse;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, State},
    response::IntoResponse,
};

/// Get driver profile
#[utoipa::path(
    get,
    path = "/driver/getMyProfile",
    responses(
        (status = 200, description = "Driver profile retrieved successfully", body = ApiResponse<DriverProfileResponse>),
        (status = 401, description = "Unauthorized - missing or invalid JWT token"),
        (status = 403, description = "Access forbidden for non-driver roles")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse {
    match DriverService::profile(&state, user.id).await {
        Ok(profile) => ApiSuccess::ok(profile, "Driver profile retrieved successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get driver's ride history (paginated, 4 per page)
#[utoipa::path(
    get,
    path = "/driver/getMyRides",
    params(RidePageQuery),
    responses(
        (status = 200, description = "List of rides retrieved successfully", body = ApiResponse<Vec<Ride>>),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 401, description = "Unauthorized - missing or invalid JWT token")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
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
    match RideService::my_rides(&state, Participant::Driver(user.id), page).await {
        Ok(rides) => ApiSuccess::ok(rides, "Rides retrieved successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Accept a ride request
#[utoipa::path(
    post,
    path = "/driver/acceptRide/{rideRequestId}",
    params(
        ("rideRequestId" = i64, Path, description = "ID of the ride request to accept")
    ),
    responses(
        (status = 200, description = "Ride request accepted", body = ApiResponse<Ride>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Ride request not found"),
        (status = 409, description = "Ride request already accepted or driver busy")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn accept_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_request_id): ValidatedPath<i64>,
) -> impl IntoResponse {
    match RideService::accept_ride(&state, user.id, ride_request_id).await {
        Ok(ride) => ApiSuccess::ok(ride, "Ride request accepted").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Start a ride
///
/// Optional body: `startTimestamp` (RFC 3339) and `initialKm`.
#[utoipa::path(
    post,
    path = "/driver/startRide/{rideId}",
    params(
        ("rideId" = i64, Path, description = "ID of the ride to start")
    ),
    request_body(content = StartRideRequest, description = "Optional ride start details", content_type = "application/json"),
    responses(
        (status = 200, description = "Ride started successfully", body = ApiResponse<Ride>),
        (status = 400, description = "Invalid start details"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride belongs to another driver"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride is not in ACCEPTED state")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn start_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_id): ValidatedPath<i64>,
    body: Bytes,
) -> impl IntoResponse {
    let details = match optional_json::<StartRideRequest>(&body) {
        Ok(details) => details,
        Err(e) => return e.into_response(),
    };
    match RideService::start_ride(&state, user.id, ride_id, details).await {
        Ok(ride) => ApiSuccess::ok(ride, "Ride started successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// End a ride
///
/// Computes the fare and frees the driver for new requests.
#[utoipa::path(
    post,
    path = "/driver/endRide/{rideId}",
    params(
        ("rideId" = i64, Path, description = "ID of the ride to end")
    ),
    responses(
        (status = 200, description = "Ride ended successfully", body = ApiResponse<Ride>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride belongs to another driver"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride is not in STARTED state")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn end_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_id): ValidatedPath<i64>,
) -> impl IntoResponse {
    match RideService::end_ride(&state, user.id, ride_id).await {
        Ok(ride) => ApiSuccess::ok(ride, "Ride ended successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Cancel a ride
#[utoipa::path(
    post,
    path = "/driver/cancelRide/{rideId}",
    params(
        ("rideId" = i64, Path, description = "ID of the ride to cancel")
    ),
    responses(
        (status = 200, description = "Ride cancelled successfully", body = ApiResponse<Ride>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride belongs to another driver"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride already ended or cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn cancel_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_id): ValidatedPath<i64>,
) -> impl IntoResponse {
    match RideService::cancel_ride(&state, Participant::Driver(user.id), ride_id).await {
        Ok(ride) => ApiSuccess::ok(ride, "Ride cancelled successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Rate the rider of a completed ride
#[utoipa::path(
    post,
    path = "/driver/rateRider/{rideId}",
    params(
        ("rideId" = i64, Path, description = "ID of the completed ride")
    ),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rider rated successfully", body = ApiResponse<RiderProfileResponse>),
        (status = 400, description = "Invalid rating value"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Ride belongs to another driver"),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Ride not ended or rider already rated")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn rate_rider(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedPath(ride_id): ValidatedPath<i64>,
    ValidatedJson(payload): ValidatedJson<RatingRequest>,
) -> impl IntoResponse {
    match RatingService::rate_rider(&state, user.id, ride_id, payload).await {
        Ok(rider) => ApiSuccess::ok(rider, "Rider rated successfully").into_response(),
        Err(e) => e.into_response(),
    }
}
