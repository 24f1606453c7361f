use crate::common::error::AppError;
use crate::modules::auth::dto::AuthUser;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_owned())
        .ok_or_else(|| AppError::unauthorized("Unauthorized: Missing or invalid token"))?;

    let claims = AuthService::decode_access_token(&state.config, &token)?;
    let id = claims
        .user_id()
        .ok_or_else(|| AppError::unauthorized("Unauthorized: Invalid token subject"))?;

    req.extensions_mut().insert(AuthUser { id, roles: claims.roles });

    Ok(next.run(req).await)
}
