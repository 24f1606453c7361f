use crate::common::error::AppError;
use crate::modules::auth::dto::AuthUser;
use crate::modules::auth::model::Role;
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

fn require_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("Forbidden: {} access required", role)))
    }
}

pub async fn admin_guard(
    Extension(user): Extension<AuthUser>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&user, Role::Admin)?;
    Ok(next.run(req).await)
}

pub async fn driver_guard(
    Extension(user): Extension<AuthUser>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&user, Role::Driver)?;
    Ok(next.run(req).await)
}

pub async fn rider_guard(
    Extension(user): Extension<AuthUser>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&user, Role::Rider)?;
    Ok(next.run(req).await)
}
