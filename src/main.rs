use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ride_backend::app;
use ride_backend::config::settings::AppConfig;
use ride_backend::infrastructure::db::pool::{connect_to_db, run_migrations};
use ride_backend::infrastructure::redis::client::RedisService;
use ride_backend::modules::auth::service::AuthService;
use ride_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new()?;
    let db = connect_to_db(&config).await?;
    run_migrations(&db).await?;
    let redis = RedisService::new(&config.redis_url).await?;

    let state = AppState::new(config.clone(), db, redis);
    AuthService::ensure_admin(&state).await?;

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.server_port);

    axum::serve(listener, app).await?;
    Ok(())
}
