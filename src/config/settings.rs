use serde::Deserialize;
use crate::config::env::{self, EnvKey};

pub const PRODUCTION: &str = "production";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub redis_url: String,
    pub jwt_secret: String,
    /// Deployment name; refresh cookies are only marked `Secure` in production.
    pub deploy_env: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub fare_base: f64,
    pub fare_per_minute: f64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            db_max_connections: env::get_parsed(EnvKey::DbMaxConnections, 20),
            redis_url: env::get(EnvKey::RedisUrl)?,
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            deploy_env: env::get_or(EnvKey::DeployEnv, "development"),
            access_token_ttl_secs: env::get_parsed(EnvKey::AccessTokenTtl, 15 * 60),
            refresh_token_ttl_secs: env::get_parsed(EnvKey::RefreshTokenTtl, 7 * 24 * 60 * 60),
            fare_base: env::get_parsed(EnvKey::FareBase, 50.0),
            fare_per_minute: env::get_parsed(EnvKey::FarePerMinute, 2.0),
            admin_email: env::get_opt(EnvKey::AdminEmail),
            admin_password: env::get_opt(EnvKey::AdminPassword),
        })
    }

    pub fn is_production(&self) -> bool {
        self.deploy_env == PRODUCTION
    }
}
