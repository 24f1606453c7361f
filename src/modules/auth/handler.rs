use super::dto::{LoginRequest, LoginResponse, OnboardDriverRequest, SignupRequest, UserResponse};
use super::service::AuthService;
use crate::common::error::AppError;
use crate::common::extract::{ValidatedJson, ValidatedPath};
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::config::settings::AppConfig;
use crate::modules::driver::dto::DriverProfileResponse;
use crate::state::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
};
use tower_cookies::{Cookie, Cookies};

pub const REFRESH_COOKIE: &str = "refreshToken";
pub const REFRESH_COOKIE_PATH: &str = "/auth/refresh";

fn refresh_cookie(config: &AppConfig, refresh_token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, refresh_token);
    cookie.set_http_only(true);
    cookie.set_path(REFRESH_COOKIE_PATH);
    cookie.set_secure(config.is_production());
    cookie.set_max_age(Some(time::Duration::seconds(config.refresh_token_ttl_secs as i64)));
    cookie
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User successfully registered", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request data"),
        (status = 409, description = "User already exists")
    ),
    tag = "Authentication"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> impl IntoResponse {
    match AuthService::signup(&state, payload).await {
        Ok(user) => ApiSuccess::created(user, "User registered successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Onboard a driver (admin only)
#[utoipa::path(
    post,
    path = "/auth/onboardDriver/{userId}",
    params(
        ("userId" = i64, Path, description = "ID of the user to convert into a driver")
    ),
    request_body = OnboardDriverRequest,
    responses(
        (status = 201, description = "Driver onboarded successfully", body = ApiResponse<DriverProfileResponse>),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN role"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User is already a driver")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn onboard_driver(
    State(state): State<AppState>,
    ValidatedPath(user_id): ValidatedPath<i64>,
    ValidatedJson(payload): ValidatedJson<OnboardDriverRequest>,
) -> impl IntoResponse {
    match AuthService::onboard_driver(&state, user_id, payload).await {
        Ok(driver) => ApiSuccess::created(driver, "Driver onboarded successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Login and get JWT
///
/// Returns the access token in the body and sets an httpOnly `refreshToken`
/// cookie scoped to `/auth/refresh`.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, JWT returned", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    match AuthService::login(&state, payload).await {
        Ok((response, refresh_token)) => {
            cookies.add(refresh_cookie(&state.config, refresh_token));
            ApiSuccess::ok(response, "Login successful").into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Refresh access token using refresh cookie
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access token issued", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Refresh token missing or invalid")
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    cookies: Cookies,
) -> impl IntoResponse {
    let refresh_token = match cookies.get(REFRESH_COOKIE) {
        Some(c) => c.value().to_string(),
        None => return AppError::unauthorized("Refresh token not found").into_response(),
    };

    match AuthService::refresh(&state, &refresh_token).await {
        Ok(response) => ApiSuccess::ok(response, "Token refreshed").into_response(),
        Err(e) => {
            tracing::debug!("Refresh rejected: {}", e);
            e.into_response()
        }
    }
}
