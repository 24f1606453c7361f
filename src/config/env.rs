use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    DbMaxConnections,
    RedisUrl,
    JwtSecret,
    DeployEnv,
    AccessTokenTtl,
    RefreshTokenTtl,
    FareBase,
    FarePerMinute,
    AdminEmail,
    AdminPassword,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::DbMaxConnections => "DB_MAX_CONNECTIONS",
            EnvKey::RedisUrl => "REDIS_URL",
            EnvKey::JwtSecret => "JWT_SECRET",
            EnvKey::DeployEnv => "DEPLOY_ENV",
            EnvKey::AccessTokenTtl => "ACCESS_TOKEN_TTL_SECS",
            EnvKey::RefreshTokenTtl => "REFRESH_TOKEN_TTL_SECS",
            EnvKey::FareBase => "FARE_BASE",
            EnvKey::FarePerMinute => "FARE_PER_MINUTE",
            EnvKey::AdminEmail => "ADMIN_EMAIL",
            EnvKey::AdminPassword => "ADMIN_PASSWORD",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
