use axum::{extract::Request, Router};
use crate::common::error::AppError;
use crate::state::AppState;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

pub fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes(state.clone())
        .fallback(|| async { AppError::not_found("Route not found") })
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            info_span!("http", method = %req.method(), path = %req.uri().path())
        }))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
