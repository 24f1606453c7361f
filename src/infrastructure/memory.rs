//! Process-local store backing every repository trait with one lock.
//!
//! Used by the integration tests and handy for running the API without
//! Postgres or Redis. All compare-and-set semantics match the SQL versions.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::common::pagination::{PageRequest, RideSortField};
use crate::modules::auth::model::{NewUser, Role, User};
use crate::modules::auth::repository::{OnboardOutcome, SessionRepository, UserRepository};
use crate::modules::driver::model::{Driver, NewDriver};
use crate::modules::rating::model::{NewRating, Rating, RatingDirection};
use crate::modules::rating::repository::RatingRepository;
use crate::modules::ride::model::{NewRideRequest, Participant, Ride, RideRequest, RideRequestStatus, RideStatus};
use crate::modules::ride::repository::{AcceptOutcome, RideRepository, RideTransition};

#[derive(Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<i64, User>,
    drivers: HashMap<i64, Driver>,
    requests: BTreeMap<i64, RideRequest>,
    rides: BTreeMap<i64, Ride>,
    ratings: Vec<Rating>,
    sessions: HashMap<i64, (String, Instant)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_rides(a: &Ride, b: &Ride, field: RideSortField) -> Ordering {
    // NULLS LAST, matching the SQL ordering.
    fn nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    let primary = match field {
        RideSortField::Id => a.id.cmp(&b.id),
        RideSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        RideSortField::Fare => nulls_last(a.fare, b.fare),
        RideSortField::AcceptedAt => a.accepted_at.cmp(&b.accepted_at),
        RideSortField::StartedAt => nulls_last(a.started_at, b.started_at),
        RideSortField::EndedAt => nulls_last(a.ended_at, b.ended_at),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<Option<User>> {
        let mut t = self.tables.lock().await;
        if t.users.values().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let id = t.next_id();
        let created = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(id, created.clone());
        Ok(Some(created))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users.get(&id).cloned())
    }

    async fn grant_role(&self, id: i64, role: Role) -> Result<Option<User>> {
        let mut t = self.tables.lock().await;
        Ok(t.users.get_mut(&id).map(|user| {
            if !user.has_role(role) {
                user.roles.push(role);
            }
            user.clone()
        }))
    }

    async fn onboard_driver(&self, user_id: i64, driver: NewDriver) -> Result<OnboardOutcome> {
        let mut t = self.tables.lock().await;
        let Some(user) = t.users.get_mut(&user_id) else {
            return Ok(OnboardOutcome::UserNotFound);
        };
        if user.has_role(Role::Driver) {
            return Ok(OnboardOutcome::AlreadyDriver);
        }
        user.roles.push(Role::Driver);

        let created = Driver {
            user_id,
            license_number: driver.license_number,
            vehicle_number: driver.vehicle_number,
            vehicle_type: driver.vehicle_type,
            available: true,
            created_at: OffsetDateTime::now_utc(),
        };
        t.drivers.insert(user_id, created.clone());
        Ok(OnboardOutcome::Onboarded(created))
    }

    async fn find_driver(&self, user_id: i64) -> Result<Option<Driver>> {
        let t = self.tables.lock().await;
        Ok(t.drivers.get(&user_id).cloned())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn store_refresh_token(&self, user_id: i64, refresh_token: &str, ttl_seconds: u64) -> Result<()> {
        let mut t = self.tables.lock().await;
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        t.sessions.insert(user_id, (refresh_token.to_string(), expires_at));
        Ok(())
    }

    async fn get_refresh_token(&self, user_id: i64) -> Result<Option<String>> {
        let mut t = self.tables.lock().await;
        match t.sessions.get(&user_id) {
            Some((token, expires_at)) if *expires_at > Instant::now() => Ok(Some(token.clone())),
            Some(_) => {
                t.sessions.remove(&user_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RideRepository for MemoryStore {
    async fn create_request(&self, request: NewRideRequest) -> Result<RideRequest> {
        let mut t = self.tables.lock().await;
        let id = t.next_id();
        let created = RideRequest {
            id,
            rider_id: request.rider_id,
            pickup_location: request.pickup_location,
            destination: request.destination,
            vehicle_type: request.vehicle_type,
            status: RideRequestStatus::Pending,
            requested_at: OffsetDateTime::now_utc(),
        };
        t.requests.insert(id, created.clone());
        Ok(created)
    }

    async fn find_request(&self, id: i64) -> Result<Option<RideRequest>> {
        let t = self.tables.lock().await;
        Ok(t.requests.get(&id).cloned())
    }

    async fn cancel_request(&self, id: i64) -> Result<Option<RideRequest>> {
        let mut t = self.tables.lock().await;
        match t.requests.get_mut(&id) {
            Some(request) if request.status == RideRequestStatus::Pending => {
                request.status = RideRequestStatus::Cancelled;
                Ok(Some(request.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn accept_request(&self, request_id: i64, driver_id: i64, at: OffsetDateTime) -> Result<AcceptOutcome> {
        let mut t = self.tables.lock().await;

        let request = match t.requests.get(&request_id) {
            None => return Ok(AcceptOutcome::RequestNotFound),
            Some(r) if r.status != RideRequestStatus::Pending => {
                return Ok(AcceptOutcome::RequestNotPending(r.status));
            }
            Some(r) => r.clone(),
        };

        match t.drivers.get_mut(&driver_id) {
            Some(driver) if driver.available => driver.available = false,
            _ => return Ok(AcceptOutcome::DriverUnavailable),
        }

        if let Some(r) = t.requests.get_mut(&request_id) {
            r.status = RideRequestStatus::Accepted;
        }

        let id = t.next_id();
        let ride = Ride {
            id,
            ride_request_id: request.id,
            rider_id: request.rider_id,
            driver_id,
            pickup_location: request.pickup_location,
            destination: request.destination,
            vehicle_type: request.vehicle_type,
            status: RideStatus::Accepted,
            initial_km: None,
            fare: None,
            accepted_at: at,
            started_at: None,
            ended_at: None,
            cancelled_at: None,
        };
        t.rides.insert(id, ride.clone());
        Ok(AcceptOutcome::Accepted(ride))
    }

    async fn find_ride(&self, id: i64) -> Result<Option<Ride>> {
        let t = self.tables.lock().await;
        Ok(t.rides.get(&id).cloned())
    }

    async fn transition_ride(&self, tr: RideTransition) -> Result<Option<Ride>> {
        let mut t = self.tables.lock().await;

        let ride = match t.rides.get_mut(&tr.ride_id) {
            Some(ride) if ride.status == tr.from => ride,
            _ => return Ok(None),
        };

        ride.status = tr.to;
        match tr.to {
            RideStatus::Started => ride.started_at = Some(tr.at),
            RideStatus::Ended => ride.ended_at = Some(tr.at),
            RideStatus::Cancelled => ride.cancelled_at = Some(tr.at),
            RideStatus::Accepted => {}
        }
        if tr.initial_km.is_some() {
            ride.initial_km = tr.initial_km;
        }
        if tr.fare.is_some() {
            ride.fare = tr.fare;
        }
        let updated = ride.clone();

        if tr.release_driver {
            if let Some(driver) = t.drivers.get_mut(&updated.driver_id) {
                driver.available = true;
            }
        }
        Ok(Some(updated))
    }

    async fn list_rides(&self, participant: Participant, page: PageRequest) -> Result<Vec<Ride>> {
        let t = self.tables.lock().await;
        let mut rides: Vec<Ride> = t
            .rides
            .values()
            .filter(|ride| participant.takes_part_in(ride))
            .cloned()
            .collect();
        rides.sort_by(|a, b| compare_rides(a, b, page.sort));

        Ok(rides
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

#[async_trait]
impl RatingRepository for MemoryStore {
    async fn insert_rating(&self, rating: NewRating) -> Result<Option<Rating>> {
        let mut t = self.tables.lock().await;
        if t
            .ratings
            .iter()
            .any(|r| r.ride_id == rating.ride_id && r.direction == rating.direction)
        {
            return Ok(None);
        }
        let id = t.next_id();
        let created = Rating {
            id,
            ride_id: rating.ride_id,
            direction: rating.direction,
            rater_id: rating.rater_id,
            ratee_id: rating.ratee_id,
            value: rating.value,
            comment: rating.comment,
            created_at: OffsetDateTime::now_utc(),
        };
        t.ratings.push(created.clone());
        Ok(Some(created))
    }

    async fn average_rating(&self, ratee_id: i64, direction: RatingDirection) -> Result<Option<f64>> {
        let t = self.tables.lock().await;
        let values: Vec<i32> = t
            .ratings
            .iter()
            .filter(|r| r.ratee_id == ratee_id && r.direction == direction)
            .map(|r| r.value)
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<i32>() as f64 / values.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_driver(store: &MemoryStore, email: &str) -> i64 {
        let user = store
            .create_user(NewUser {
                name: "Driver".into(),
                email: email.into(),
                password_hash: "hash".into(),
                roles: vec![Role::Rider],
            })
            .await
            .unwrap()
            .unwrap();
        let outcome = store
            .onboard_driver(
                user.id,
                NewDriver {
                    license_number: "DL-1".into(),
                    vehicle_number: "MP09AB1234".into(),
                    vehicle_type: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, OnboardOutcome::Onboarded(_)));
        user.id
    }

    async fn seed_request(store: &MemoryStore, rider_id: i64) -> RideRequest {
        store
            .create_request(NewRideRequest {
                rider_id,
                pickup_location: "NIT Raipur".into(),
                destination: "Railway Station".into(),
                vehicle_type: "Sedan".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        let new_user = || NewUser {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password_hash: "hash".into(),
            roles: vec![Role::Rider],
        };
        assert!(store.create_user(new_user()).await.unwrap().is_some());
        assert!(store.create_user(new_user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn onboarding_twice_is_reported() {
        let store = MemoryStore::new();
        let driver_id = seed_driver(&store, "d@example.com").await;
        let again = store
            .onboard_driver(
                driver_id,
                NewDriver {
                    license_number: "DL-2".into(),
                    vehicle_number: "X".into(),
                    vehicle_type: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(again, OnboardOutcome::AlreadyDriver));
        assert!(matches!(
            store
                .onboard_driver(999, NewDriver {
                    license_number: "DL-3".into(),
                    vehicle_number: "Y".into(),
                    vehicle_type: None,
                })
                .await
                .unwrap(),
            OnboardOutcome::UserNotFound
        ));
    }

    #[tokio::test]
    async fn accept_reserves_driver_and_request_once() {
        let store = MemoryStore::new();
        let driver_a = seed_driver(&store, "a@example.com").await;
        let driver_b = seed_driver(&store, "b@example.com").await;
        let request = seed_request(&store, 42).await;
        let now = OffsetDateTime::now_utc();

        let ride = match store.accept_request(request.id, driver_a, now).await.unwrap() {
            AcceptOutcome::Accepted(ride) => ride,
            _ => panic!("first accept must win"),
        };
        assert_eq!(ride.driver_id, driver_a);
        assert!(!store.find_driver(driver_a).await.unwrap().unwrap().available);

        assert!(matches!(
            store.accept_request(request.id, driver_b, now).await.unwrap(),
            AcceptOutcome::RequestNotPending(RideRequestStatus::Accepted)
        ));

        let second = seed_request(&store, 42).await;
        assert!(matches!(
            store.accept_request(second.id, driver_a, now).await.unwrap(),
            AcceptOutcome::DriverUnavailable
        ));
        // The losing attempt must not consume the request.
        assert_eq!(
            store.find_request(second.id).await.unwrap().unwrap().status,
            RideRequestStatus::Pending
        );
    }

    #[tokio::test]
    async fn transition_is_compare_and_set() {
        let store = MemoryStore::new();
        let driver = seed_driver(&store, "a@example.com").await;
        let request = seed_request(&store, 7).await;
        let now = OffsetDateTime::now_utc();
        let AcceptOutcome::Accepted(ride) = store.accept_request(request.id, driver, now).await.unwrap() else {
            panic!("accept failed");
        };

        let start = RideTransition {
            ride_id: ride.id,
            from: RideStatus::Accepted,
            to: RideStatus::Started,
            at: now,
            initial_km: Some(3.5),
            fare: None,
            release_driver: false,
        };
        let started = store.transition_ride(start.clone()).await.unwrap().unwrap();
        assert_eq!(started.status, RideStatus::Started);
        assert_eq!(started.initial_km, Some(3.5));
        assert!(store.transition_ride(start).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_sessions_are_dropped() {
        let store = MemoryStore::new();
        store.store_refresh_token(1, "1:abc", 0).await.unwrap();
        assert!(store.get_refresh_token(1).await.unwrap().is_none());
        store.store_refresh_token(1, "1:def", 60).await.unwrap();
        assert_eq!(store.get_refresh_token(1).await.unwrap().as_deref(), Some("1:def"));
    }

    #[tokio::test]
    async fn ratings_are_unique_per_direction() {
        let store = MemoryStore::new();
        let rating = |direction, value| NewRating {
            ride_id: 1,
            direction,
            rater_id: 2,
            ratee_id: 3,
            value,
            comment: None,
        };
        assert!(store.insert_rating(rating(RatingDirection::DriverRatesRider, 5)).await.unwrap().is_some());
        assert!(store.insert_rating(rating(RatingDirection::DriverRatesRider, 1)).await.unwrap().is_none());
        assert!(store.insert_rating(rating(RatingDirection::RiderRatesDriver, 4)).await.unwrap().is_some());
        assert_eq!(
            store.average_rating(3, RatingDirection::DriverRatesRider).await.unwrap(),
            Some(5.0)
        );
        assert_eq!(store.average_rating(9, RatingDirection::DriverRatesRider).await.unwrap(), None);
    }
}
