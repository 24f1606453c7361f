use time::OffsetDateTime;
use tracing::{info, warn};

use super::dto::{RideRequestPayload, StartRideRequest};
use super::lifecycle::RideEvent;
use super::model::{NewRideRequest, Participant, Ride, RideRequest, RideStatus};
use super::repository::{AcceptOutcome, RideTransition};
use crate::common::error::{AppError, AppResult};
use crate::common::pagination::PageRequest;
use crate::state::AppState;

pub struct RideService;

impl RideService {
    pub async fn request_ride(state: &AppState, rider_id: i64, req: RideRequestPayload) -> AppResult<RideRequest> {
        let request = state
            .rides
            .create_request(NewRideRequest {
                rider_id,
                pickup_location: req.pickup_location.trim().to_string(),
                destination: req.destination.trim().to_string(),
                vehicle_type: req.vehicle_type.trim().to_string(),
            })
            .await?;

        info!(ride_request_id = request.id, rider_id, "Ride requested");
        Ok(request)
    }

    pub async fn cancel_request(state: &AppState, rider_id: i64, request_id: i64) -> AppResult<RideRequest> {
        let request = Self::find_request(state, request_id).await?;
        if request.rider_id != rider_id {
            return Err(AppError::forbidden("Ride request does not belong to this rider"));
        }
        request.status.cancel()?;

        match state.rides.cancel_request(request_id).await? {
            Some(cancelled) => {
                info!(ride_request_id = request_id, rider_id, "Ride request cancelled");
                Ok(cancelled)
            }
            None => {
                let current = Self::find_request(state, request_id).await?;
                current.status.cancel()?;
                Err(AppError::invalid_state("Ride request was modified concurrently"))
            }
        }
    }

    pub async fn accept_ride(state: &AppState, driver_id: i64, request_id: i64) -> AppResult<Ride> {
        let request = Self::find_request(state, request_id).await?;
        if request.rider_id == driver_id {
            return Err(AppError::forbidden("Drivers cannot accept their own ride requests"));
        }
        if state.users.find_driver(driver_id).await?.is_none() {
            return Err(AppError::not_found(format!("Driver not found with id: {}", driver_id)));
        }

        let now = OffsetDateTime::now_utc();
        match state.rides.accept_request(request_id, driver_id, now).await? {
            AcceptOutcome::Accepted(ride) => {
                info!(ride_id = ride.id, ride_request_id = request_id, driver_id, "Ride accepted");
                Ok(ride)
            }
            AcceptOutcome::RequestNotFound => Err(Self::request_not_found(request_id)),
            AcceptOutcome::RequestNotPending(status) => {
                warn!(ride_request_id = request_id, driver_id, %status, "Accept rejected");
                status.accept()?;
                Err(AppError::invalid_state("Ride request is no longer pending"))
            }
            AcceptOutcome::DriverUnavailable => Err(AppError::conflict("Driver already has an active ride")),
        }
    }

    pub async fn start_ride(
        state: &AppState,
        driver_id: i64,
        ride_id: i64,
        details: Option<StartRideRequest>,
    ) -> AppResult<Ride> {
        let details = details.unwrap_or_default();
        Self::transition(state, Participant::Driver(driver_id), ride_id, RideEvent::Start, details).await
    }

    pub async fn end_ride(state: &AppState, driver_id: i64, ride_id: i64) -> AppResult<Ride> {
        Self::transition(
            state,
            Participant::Driver(driver_id),
            ride_id,
            RideEvent::End,
            StartRideRequest::default(),
        )
        .await
    }

    pub async fn cancel_ride(state: &AppState, actor: Participant, ride_id: i64) -> AppResult<Ride> {
        Self::transition(state, actor, ride_id, RideEvent::Cancel, StartRideRequest::default()).await
    }

    pub async fn my_rides(state: &AppState, participant: Participant, page: PageRequest) -> AppResult<Vec<Ride>> {
        Ok(state.rides.list_rides(participant, page).await?)
    }

    pub async fn find_ride(state: &AppState, ride_id: i64) -> AppResult<Ride> {
        state
            .rides
            .find_ride(ride_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ride not found with id: {}", ride_id)))
    }

    async fn find_request(state: &AppState, request_id: i64) -> AppResult<RideRequest> {
        state
            .rides
            .find_request(request_id)
            .await?
            .ok_or_else(|| Self::request_not_found(request_id))
    }

    fn request_not_found(request_id: i64) -> AppError {
        AppError::not_found(format!("Ride request not found with id: {}", request_id))
    }

    async fn transition(
        state: &AppState,
        actor: Participant,
        ride_id: i64,
        event: RideEvent,
        start: StartRideRequest,
    ) -> AppResult<Ride> {
        let now = OffsetDateTime::now_utc();
        if start.start_timestamp.is_some_and(|ts| ts > now) {
            return Err(AppError::validation("Start timestamp cannot be in the future"));
        }

        let ride = Self::find_ride(state, ride_id).await?;
        if !actor.takes_part_in(&ride) {
            return Err(AppError::forbidden("You are not a participant of this ride"));
        }
        let at = match start.start_timestamp {
            Some(ts) if ts < ride.accepted_at => {
                return Err(AppError::validation("Start timestamp cannot precede ride acceptance"));
            }
            Some(ts) => ts,
            None => now,
        };
        let to = ride.status.apply(event)?;
        let fare = (to == RideStatus::Ended).then(|| state.fares.fare(&ride, at));

        let transition = RideTransition {
            ride_id,
            from: ride.status,
            to,
            at,
            initial_km: start.initial_km,
            fare,
            release_driver: !to.is_active(),
        };

        match state.rides.transition_ride(transition).await? {
            Some(updated) => {
                info!(ride_id, from = %ride.status, to = %updated.status, "Ride transitioned");
                Ok(updated)
            }
            None => {
                // Lost a race: report against whatever state won.
                let current = Self::find_ride(state, ride_id).await?;
                current.status.apply(event)?;
                Err(AppError::invalid_state("Ride was modified concurrently"))
            }
        }
    }
}
