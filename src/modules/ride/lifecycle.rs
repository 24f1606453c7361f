//! Ride state machine.
//!
//! A ride is `REQUESTED` while it only exists as a [`RideRequest`] in
//! `PENDING`; acceptance creates the [`Ride`] in `ACCEPTED`. From there:
//!
//! ```text
//! ACCEPTED --start--> STARTED --end--> ENDED
//!     \                  |
//!      \----cancel-------+-----------> CANCELLED
//! ```
//!
//! [`RideRequest`]: super::model::RideRequest
//! [`Ride`]: super::model::Ride

use thiserror::Error;

use super::model::{RideRequestStatus, RideStatus};
use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideEvent {
    Start,
    End,
    Cancel,
}

impl RideEvent {
    fn verb(&self) -> &'static str {
        match self {
            RideEvent::Start => "start",
            RideEvent::End => "end",
            RideEvent::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Ride request has already been accepted by another driver")]
    AlreadyAccepted,
    #[error("Cannot {verb} a ride request that is {from}")]
    Request { verb: &'static str, from: RideRequestStatus },
    #[error("Cannot {verb} a ride that is {from}")]
    Ride { verb: &'static str, from: RideStatus },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::AlreadyAccepted => AppError::conflict(e.to_string()),
            other => AppError::invalid_state(other.to_string()),
        }
    }
}

impl RideRequestStatus {
    pub fn accept(self) -> Result<RideRequestStatus, TransitionError> {
        match self {
            RideRequestStatus::Pending => Ok(RideRequestStatus::Accepted),
            RideRequestStatus::Accepted => Err(TransitionError::AlreadyAccepted),
            from => Err(TransitionError::Request { verb: "accept", from }),
        }
    }

    pub fn cancel(self) -> Result<RideRequestStatus, TransitionError> {
        match self {
            RideRequestStatus::Pending => Ok(RideRequestStatus::Cancelled),
            from => Err(TransitionError::Request { verb: "cancel", from }),
        }
    }
}

impl RideStatus {
    pub fn apply(self, event: RideEvent) -> Result<RideStatus, TransitionError> {
        match (self, event) {
            (RideStatus::Accepted, RideEvent::Start) => Ok(RideStatus::Started),
            (RideStatus::Started, RideEvent::End) => Ok(RideStatus::Ended),
            (RideStatus::Accepted | RideStatus::Started, RideEvent::Cancel) => Ok(RideStatus::Cancelled),
            (from, event) => Err(TransitionError::Ride { verb: event.verb(), from }),
        }
    }

    /// A driver bound to a ride in one of these states is busy.
    pub fn is_active(self) -> bool {
        matches!(self, RideStatus::Accepted | RideStatus::Started)
    }
}
