use anyhow::Result;
use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use super::model::{NewRideRequest, Participant, Ride, RideRequest, RideRequestStatus, RideStatus};
use crate::common::pagination::PageRequest;
use crate::infrastructure::db::pool::DbPool;

pub enum AcceptOutcome {
    Accepted(Ride),
    RequestNotFound,
    RequestNotPending(RideRequestStatus),
    DriverUnavailable,
}

/// A compare-and-set on a ride's status. Applied only if the stored status
/// still equals `from`.
#[derive(Debug, Clone)]
pub struct RideTransition {
    pub ride_id: i64,
    pub from: RideStatus,
    pub to: RideStatus,
    pub at: OffsetDateTime,
    pub initial_km: Option<f64>,
    pub fare: Option<f64>,
    /// Mark the ride's driver available again.
    pub release_driver: bool,
}

#[async_trait]
pub trait RideRepository: Send + Sync {
    async fn create_request(&self, request: NewRideRequest) -> Result<RideRequest>;
    async fn find_request(&self, id: i64) -> Result<Option<RideRequest>>;
    /// PENDING -> CANCELLED; `None` if the request was not pending.
    async fn cancel_request(&self, id: i64) -> Result<Option<RideRequest>>;
    /// Atomically flips the request to ACCEPTED, reserves the driver and
    /// creates the ride.
    async fn accept_request(&self, request_id: i64, driver_id: i64, at: OffsetDateTime) -> Result<AcceptOutcome>;
    async fn find_ride(&self, id: i64) -> Result<Option<Ride>>;
    /// `None` when the status moved on since it was read.
    async fn transition_ride(&self, transition: RideTransition) -> Result<Option<Ride>>;
    async fn list_rides(&self, participant: Participant, page: PageRequest) -> Result<Vec<Ride>>;
}

#[derive(FromRow)]
struct RideRequestRow {
    id: i64,
    rider_id: i64,
    pickup_location: String,
    destination: String,
    vehicle_type: String,
    status: String,
    requested_at: OffsetDateTime,
}

impl TryFrom<RideRequestRow> for RideRequest {
    type Error = anyhow::Error;

    fn try_from(row: RideRequestRow) -> Result<Self> {
        Ok(RideRequest {
            id: row.id,
            rider_id: row.rider_id,
            pickup_location: row.pickup_location,
            destination: row.destination,
            vehicle_type: row.vehicle_type,
            status: row.status.parse()?,
            requested_at: row.requested_at,
        })
    }
}

#[derive(FromRow)]
struct RideRow {
    id: i64,
    ride_request_id: i64,
    rider_id: i64,
    driver_id: i64,
    pickup_location: String,
    destination: String,
    vehicle_type: String,
    status: String,
    initial_km: Option<f64>,
    fare: Option<f64>,
    accepted_at: OffsetDateTime,
    started_at: Option<OffsetDateTime>,
    ended_at: Option<OffsetDateTime>,
    cancelled_at: Option<OffsetDateTime>,
}

impl TryFrom<RideRow> for Ride {
    type Error = anyhow::Error;

    fn try_from(row: RideRow) -> Result<Self> {
        Ok(Ride {
            id: row.id,
            ride_request_id: row.ride_request_id,
            rider_id: row.rider_id,
            driver_id: row.driver_id,
            pickup_location: row.pickup_location,
            destination: row.destination,
            vehicle_type: row.vehicle_type,
            status: row.status.parse()?,
            initial_km: row.initial_km,
            fare: row.fare,
            accepted_at: row.accepted_at,
            started_at: row.started_at,
            ended_at: row.ended_at,
            cancelled_at: row.cancelled_at,
        })
    }
}

const REQUEST_COLUMNS: &str = "id, rider_id, pickup_location, destination, vehicle_type, status, requested_at";
const RIDE_COLUMNS: &str = "id, ride_request_id, rider_id, driver_id, pickup_location, destination, vehicle_type, \
     status, initial_km, fare, accepted_at, started_at, ended_at, cancelled_at";

pub struct PgRideRepository {
    pool: DbPool,
}

impl PgRideRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RideRepository for PgRideRepository {
    async fn create_request(&self, request: NewRideRequest) -> Result<RideRequest> {
        let row = sqlx::query_as::<_, RideRequestRow>(&format!(
            r#"
            INSERT INTO ride_requests (rider_id, pickup_location, destination, vehicle_type, status)
            VALUES ($1, $2, $3, $4, 'PENDING')
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.rider_id)
        .bind(&request.pickup_location)
        .bind(&request.destination)
        .bind(&request.vehicle_type)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_request(&self, id: i64) -> Result<Option<RideRequest>> {
        let row = sqlx::query_as::<_, RideRequestRow>(&format!("SELECT {REQUEST_COLUMNS} FROM ride_requests WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(RideRequest::try_from).transpose()
    }

    async fn cancel_request(&self, id: i64) -> Result<Option<RideRequest>> {
        let row = sqlx::query_as::<_, RideRequestRow>(&format!(
            r#"
            UPDATE ride_requests SET status = 'CANCELLED'
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RideRequest::try_from).transpose()
    }

    async fn accept_request(&self, request_id: i64, driver_id: i64, at: OffsetDateTime) -> Result<AcceptOutcome> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, RideRequestRow>(&format!(
            r#"
            UPDATE ride_requests SET status = 'ACCEPTED'
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            let status: Option<String> = sqlx::query_scalar("SELECT status FROM ride_requests WHERE id = $1")
                .bind(request_id)
                .fetch_optional(&mut *tx)
                .await?;
            return match status {
                Some(status) => Ok(AcceptOutcome::RequestNotPending(status.parse()?)),
                None => Ok(AcceptOutcome::RequestNotFound),
            };
        };

        let reserved = sqlx::query("UPDATE drivers SET available = FALSE WHERE user_id = $1 AND available = TRUE")
            .bind(driver_id)
            .execute(&mut *tx)
            .await?;
        if reserved.rows_affected() == 0 {
            return Ok(AcceptOutcome::DriverUnavailable);
        }

        let ride = sqlx::query_as::<_, RideRow>(&format!(
            r#"
            INSERT INTO rides (ride_request_id, rider_id, driver_id, pickup_location, destination, vehicle_type, status, accepted_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'ACCEPTED', $7)
            RETURNING {RIDE_COLUMNS}
            "#
        ))
        .bind(request.id)
        .bind(request.rider_id)
        .bind(driver_id)
        .bind(&request.pickup_location)
        .bind(&request.destination)
        .bind(&request.vehicle_type)
        .bind(at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AcceptOutcome::Accepted(ride.try_into()?))
    }

    async fn find_ride(&self, id: i64) -> Result<Option<Ride>> {
        let row = sqlx::query_as::<_, RideRow>(&format!("SELECT {RIDE_COLUMNS} FROM rides WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Ride::try_from).transpose()
    }

    async fn transition_ride(&self, t: RideTransition) -> Result<Option<Ride>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RideRow>(&format!(
            r#"
            UPDATE rides SET
                status = $3,
                started_at = CASE WHEN $3 = 'STARTED' THEN $4 ELSE started_at END,
                ended_at = CASE WHEN $3 = 'ENDED' THEN $4 ELSE ended_at END,
                cancelled_at = CASE WHEN $3 = 'CANCELLED' THEN $4 ELSE cancelled_at END,
                initial_km = COALESCE($5, initial_km),
                fare = COALESCE($6, fare)
            WHERE id = $1 AND status = $2
            RETURNING {RIDE_COLUMNS}
            "#
        ))
        .bind(t.ride_id)
        .bind(t.from.as_str())
        .bind(t.to.as_str())
        .bind(t.at)
        .bind(t.initial_km)
        .bind(t.fare)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if t.release_driver {
            sqlx::query("UPDATE drivers SET available = TRUE WHERE user_id = $1")
                .bind(row.driver_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(row.try_into()?))
    }

    async fn list_rides(&self, participant: Participant, page: PageRequest) -> Result<Vec<Ride>> {
        let (owner_column, owner_id) = match participant {
            Participant::Rider(id) => ("rider_id", id),
            Participant::Driver(id) => ("driver_id", id),
        };
        // Both identifiers come from fixed allow-lists, never from the caller.
        let sql = format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE {owner_column} = $1 \
             ORDER BY {} ASC NULLS LAST, id ASC LIMIT $2 OFFSET $3",
            page.sort.column()
        );

        let rows = sqlx::query_as::<_, RideRow>(&sql)
            .bind(owner_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Ride::try_from).collect()
    }
}
