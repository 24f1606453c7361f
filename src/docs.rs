use utoipa::OpenApi;
use crate::modules::auth::dto::*;
use crate::modules::auth::model::Role;
use crate::modules::driver::dto::DriverProfileResponse;
use crate::modules::rating::dto::RatingRequest;
use crate::modules::ride::dto::{RideRequestPayload, StartRideRequest};
use crate::modules::ride::model::{Ride, RideRequest, RideRequestStatus, RideStatus};
use crate::modules::rider::dto::RiderProfileResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::handler::signup,
        crate::modules::auth::handler::onboard_driver,
        crate::modules::auth::handler::login,
        crate::modules::auth::handler::refresh,
        crate::modules::driver::handler::get_my_profile,
        crate::modules::driver::handler::get_my_rides,
        crate::modules::driver::handler::accept_ride,
        crate::modules::driver::handler::start_ride,
        crate::modules::driver::handler::end_ride,
        crate::modules::driver::handler::cancel_ride,
        crate::modules::driver::handler::rate_rider,
        crate::modules::rider::handler::get_my_profile,
        crate::modules::rider::handler::get_my_rides,
        crate::modules::rider::handler::request_ride,
        crate::modules::rider::handler::cancel_ride_request,
        crate::modules::rider::handler::cancel_ride,
        crate::modules::rider::handler::rate_driver,
    ),
    components(
        schemas(
            SignupRequest, OnboardDriverRequest, LoginRequest, LoginResponse, UserResponse, Role,
            DriverProfileResponse, RiderProfileResponse,
            RideRequestPayload, StartRideRequest, RatingRequest,
            Ride, RideRequest, RideStatus, RideRequestStatus,
        )
    ),
    tags(
        (name = "Authentication", description = "User registration, login, and JWT generation"),
        (name = "Driver", description = "Driver profile, ride history and ride actions"),
        (name = "Rider", description = "Rider profile, ride requests and ratings")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
