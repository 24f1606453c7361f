use axum::Router;
use axum::routing::{get, post};
use crate::state::AppState;
use axum::middleware;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router(state: AppState) -> axum::Router<AppState> {
    Router::new()
        .route("/getMyProfile", get(handler::get_my_profile))
        .route("/getMyRides", get(handler::get_my_rides))
        .route("/requestRide", post(handler::request_ride))
        .route("/cancelRideRequest/{rideRequestId}", post(handler::cancel_ride_request))
        .route("/cancelRide/{rideId}", post(handler::cancel_ride))
        .route("/rateDriver/{rideId}", post(handler::rate_driver))
        .route_layer(middleware::from_fn(crate::middleware::role::rider_guard))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware
        ))
}
