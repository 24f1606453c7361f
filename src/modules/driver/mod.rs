use axum::Router;
use axum::routing::{get, post};
use crate::state::AppState;
use axum::middleware;

pub mod dto;
pub mod handler;
pub mod model;
pub mod service;

pub fn router(state: AppState) -> axum::Router<AppState> {
    Router::new()
        .route("/getMyProfile", get(handler::get_my_profile))
        .route("/getMyRides", get(handler::get_my_rides))
        .route("/acceptRide/{rideRequestId}", post(handler::accept_ride))
        .route("/startRide/{rideId}", post(handler::start_ride))
        .route("/endRide/{rideId}", post(handler::end_ride))
        .route("/cancelRide/{rideId}", post(handler::cancel_ride))
        .route("/rateRider/{rideId}", post(handler::rate_rider))
        .route_layer(middleware::from_fn(crate::middleware::role::driver_guard))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware
        ))
}
