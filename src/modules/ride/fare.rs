use time::OffsetDateTime;

use super::model::Ride;

/// Prices a ride at the moment it ends.
pub trait FareCalculator: Send + Sync {
    fn fare(&self, ride: &Ride, ended_at: OffsetDateTime) -> f64;
}

/// `base + per_minute * started minutes`, rounded to cents.
#[derive(Debug, Clone, Copy)]
pub struct TimeBasedFare {
    pub base: f64,
    pub per_minute: f64,
}

impl TimeBasedFare {
    pub fn new(base: f64, per_minute: f64) -> Self {
        Self { base, per_minute }
    }
}

impl FareCalculator for TimeBasedFare {
    fn fare(&self, ride: &Ride, ended_at: OffsetDateTime) -> f64 {
        let started_at = ride.started_at.unwrap_or(ride.accepted_at);
        let seconds = (ended_at - started_at).whole_seconds().max(0);
        let minutes = (seconds + 59) / 60;
        let fare = self.base + self.per_minute * minutes as f64;
        (fare * 100.0).round() / 100.0
    }
}
