use anyhow::Result;
use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use super::model::{NewRating, Rating, RatingDirection};
use crate::infrastructure::db::pool::DbPool;

#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Returns `None` when this ride was already rated in this direction.
    async fn insert_rating(&self, rating: NewRating) -> Result<Option<Rating>>;
    /// Mean of the ratings `ratee_id` received in `direction`.
    async fn average_rating(&self, ratee_id: i64, direction: RatingDirection) -> Result<Option<f64>>;
}

#[derive(FromRow)]
struct RatingRow {
    id: i64,
    ride_id: i64,
    direction: String,
    rater_id: i64,
    ratee_id: i64,
    value: i32,
    comment: Option<String>,
    created_at: OffsetDateTime,
}

impl TryFrom<RatingRow> for Rating {
    type Error = anyhow::Error;

    fn try_from(row: RatingRow) -> Result<Self> {
        Ok(Rating {
            id: row.id,
            ride_id: row.ride_id,
            direction: row.direction.parse()?,
            rater_id: row.rater_id,
            ratee_id: row.ratee_id,
            value: row.value,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

pub struct PgRatingRepository {
    pool: DbPool,
}

impl PgRatingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    async fn insert_rating(&self, rating: NewRating) -> Result<Option<Rating>> {
        let row = sqlx::query_as::<_, RatingRow>(
            r#"
            INSERT INTO ratings (ride_id, direction, rater_id, ratee_id, value, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (ride_id, direction) DO NOTHING
            RETURNING id, ride_id, direction, rater_id, ratee_id, value, comment, created_at
            "#,
        )
        .bind(rating.ride_id)
        .bind(rating.direction.as_str())
        .bind(rating.rater_id)
        .bind(rating.ratee_id)
        .bind(rating.value)
        .bind(&rating.comment)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Rating::try_from).transpose()
    }

    async fn average_rating(&self, ratee_id: i64, direction: RatingDirection) -> Result<Option<f64>> {
        let avg: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(value)::FLOAT8 FROM ratings WHERE ratee_id = $1 AND direction = $2",
        )
        .bind(ratee_id)
        .bind(direction.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(avg)
    }
}
