use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::DbPool;
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::redis::client::RedisService;
use crate::modules::auth::repository::{PgUserRepository, RedisSessionRepository, SessionRepository, UserRepository};
use crate::modules::rating::repository::{PgRatingRepository, RatingRepository};
use crate::modules::ride::fare::{FareCalculator, TimeBasedFare};
use crate::modules::ride::repository::{PgRideRepository, RideRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub users: Arc<dyn UserRepository>,
    pub rides: Arc<dyn RideRepository>,
    pub ratings: Arc<dyn RatingRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub fares: Arc<dyn FareCalculator>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, redis: RedisService) -> Self {
        let fares = TimeBasedFare::new(config.fare_base, config.fare_per_minute);
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            rides: Arc::new(PgRideRepository::new(db.clone())),
            ratings: Arc::new(PgRatingRepository::new(db)),
            sessions: Arc::new(RedisSessionRepository::new(redis)),
            fares: Arc::new(fares),
            config,
        }
    }

    /// Every repository backed by one shared [`MemoryStore`].
    pub fn in_memory(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let fares = TimeBasedFare::new(config.fare_base, config.fare_per_minute);
        Self {
            users: Arc::new(store.clone()),
            rides: Arc::new(store.clone()),
            ratings: Arc::new(store.clone()),
            sessions: Arc::new(store),
            fares: Arc::new(fares),
            config,
        }
    }
}
