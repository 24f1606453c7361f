use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::infrastructure::db::pool::DbPool;
use crate::infrastructure::redis::client::RedisService;
use crate::modules::auth::model::{NewUser, Role, User};
use crate::modules::driver::model::{Driver, NewDriver};

pub enum OnboardOutcome {
    Onboarded(Driver),
    UserNotFound,
    AlreadyDriver,
}

/// Users and the driver records hanging off them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `None` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn grant_role(&self, id: i64, role: Role) -> Result<Option<User>>;
    /// Adds the DRIVER role and the driver record in one step.
    async fn onboard_driver(&self, user_id: i64, driver: NewDriver) -> Result<OnboardOutcome>;
    async fn find_driver(&self, user_id: i64) -> Result<Option<Driver>>;
}

/// Server-side refresh token sessions, one live token per user.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn store_refresh_token(&self, user_id: i64, refresh_token: &str, ttl_seconds: u64) -> Result<()>;
    async fn get_refresh_token(&self, user_id: i64) -> Result<Option<String>>;
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    roles: Vec<String>,
    created_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        let roles = row
            .roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<Result<Vec<_>>>()?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            roles,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct DriverRow {
    user_id: i64,
    license_number: String,
    vehicle_number: String,
    vehicle_type: Option<String>,
    available: bool,
    created_at: OffsetDateTime,
}

impl From<DriverRow> for Driver {
    fn from(row: DriverRow) -> Self {
        Driver {
            user_id: row.user_id,
            license_number: row.license_number,
            vehicle_number: row.vehicle_number,
            vehicle_type: row.vehicle_type,
            available: row.available,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, roles, created_at";
const DRIVER_COLUMNS: &str = "user_id, license_number, vehicle_number, vehicle_type, available, created_at";

fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, roles)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(role_names(&user.roles))
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn grant_role(&self, id: i64, role: Role) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET roles = CASE WHEN $2 = ANY(roles) THEN roles ELSE array_append(roles, $2) END
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn onboard_driver(&self, user_id: i64, driver: NewDriver) -> Result<OnboardOutcome> {
        let mut tx = self.pool.begin().await?;

        let roles: Option<Vec<String>> = sqlx::query_scalar("SELECT roles FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(roles) = roles else {
            return Ok(OnboardOutcome::UserNotFound);
        };
        if roles.iter().any(|r| r == Role::Driver.as_str()) {
            return Ok(OnboardOutcome::AlreadyDriver);
        }

        sqlx::query("UPDATE users SET roles = array_append(roles, $2) WHERE id = $1")
            .bind(user_id)
            .bind(Role::Driver.as_str())
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, DriverRow>(&format!(
            r#"
            INSERT INTO drivers (user_id, license_number, vehicle_number, vehicle_type, available)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {DRIVER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&driver.license_number)
        .bind(&driver.vehicle_number)
        .bind(&driver.vehicle_type)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(OnboardOutcome::Onboarded(row.into()))
    }

    async fn find_driver(&self, user_id: i64) -> Result<Option<Driver>> {
        let row = sqlx::query_as::<_, DriverRow>(&format!("SELECT {DRIVER_COLUMNS} FROM drivers WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Driver::from))
    }
}

pub struct RedisSessionRepository {
    redis: RedisService,
}

impl RedisSessionRepository {
    pub fn new(redis: RedisService) -> Self {
        Self { redis }
    }

    fn key(user_id: i64) -> String {
        format!("refresh_token:{}", user_id)
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn store_refresh_token(&self, user_id: i64, refresh_token: &str, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.redis.conn();
        let _: () = conn.set_ex(Self::key(user_id), refresh_token, ttl_seconds).await?;
        Ok(())
    }

    async fn get_refresh_token(&self, user_id: i64) -> Result<Option<String>> {
        let mut conn = self.redis.conn();
        let token: Option<String> = conn.get(Self::key(user_id)).await?;
        Ok(token)
    }
}
