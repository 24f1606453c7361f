use super::dto::{LoginRequest, LoginResponse, OnboardDriverRequest, SignupRequest, TokenClaims, UserResponse};
use super::model::{NewUser, Role};
use super::repository::OnboardOutcome;
use crate::common::error::{AppError, AppResult};
use crate::common::security;
use crate::config::settings::AppConfig;
use crate::modules::driver::dto::DriverProfileResponse;
use crate::modules::driver::model::NewDriver;
use crate::modules::driver::service::DriverService;
use crate::state::AppState;
use anyhow::anyhow;
use jsonwebtoken::{decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, warn};
use uuid::Uuid;

pub struct AuthService;

impl AuthService {
    pub async fn signup(state: &AppState, req: SignupRequest) -> AppResult<UserResponse> {
        let password_hash = security::hash_password(&req.password)?;

        let user = state
            .users
            .create_user(NewUser {
                name: req.name.trim().to_string(),
                email: req.email.to_lowercase(),
                password_hash,
                roles: vec![Role::Rider],
            })
            .await?
            .ok_or_else(|| AppError::conflict("User already exists"))?;

        info!(user_id = user.id, "User signed up");
        Ok(user.into())
    }

    pub async fn onboard_driver(
        state: &AppState,
        user_id: i64,
        req: OnboardDriverRequest,
    ) -> AppResult<DriverProfileResponse> {
        let details = NewDriver {
            license_number: req.license_number.trim().to_string(),
            vehicle_number: req.vehicle_number.trim().to_string(),
            vehicle_type: req
                .vehicle_type
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        };

        match state.users.onboard_driver(user_id, details).await? {
            OnboardOutcome::Onboarded(_) => {
                info!(user_id, "Driver onboarded");
                DriverService::profile(state, user_id).await
            }
            OnboardOutcome::UserNotFound => Err(AppError::not_found(format!("User not found with id: {}", user_id))),
            OnboardOutcome::AlreadyDriver => Err(AppError::conflict("User is already a driver")),
        }
    }

    /// Returns the login body and the refresh token destined for the cookie.
    pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<(LoginResponse, String)> {
        let user = state
            .users
            .find_user_by_email(&req.email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        security::verify_password(&req.password, &user.password_hash)
            .map_err(|_| AppError::unauthorized("Invalid credentials"))?;

        let access_token = Self::create_access_token(&state.config, user.id, &user.roles)?;
        // Format: user_id:random_uuid
        let refresh_token = format!("{}:{}", user.id, Uuid::new_v4());

        state
            .sessions
            .store_refresh_token(user.id, &refresh_token, state.config.refresh_token_ttl_secs)
            .await?;

        info!(user_id = user.id, "User logged in");
        Ok((LoginResponse { access_token }, refresh_token))
    }

    pub async fn refresh(state: &AppState, refresh_token: &str) -> AppResult<LoginResponse> {
        let user_id = refresh_token
            .split_once(':')
            .and_then(|(id, _)| id.parse::<i64>().ok())
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        match state.sessions.get_refresh_token(user_id).await? {
            Some(stored) if security::tokens_match(refresh_token, &stored) => {}
            Some(_) => return Err(AppError::unauthorized("Invalid refresh token")),
            None => return Err(AppError::unauthorized("Refresh token expired or invalid")),
        }

        // Re-read the user so role changes since login are reflected.
        let user = state
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        let access_token = Self::create_access_token(&state.config, user.id, &user.roles)?;
        Ok(LoginResponse { access_token })
    }

    /// Makes sure the configured admin account exists and holds the ADMIN role.
    pub async fn ensure_admin(state: &AppState) -> AppResult<()> {
        let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
            return Ok(());
        };
        let email = email.to_lowercase();

        if let Some(existing) = state.users.find_user_by_email(&email).await? {
            if !existing.has_role(Role::Admin) {
                state.users.grant_role(existing.id, Role::Admin).await?;
                info!(user_id = existing.id, "Granted ADMIN role to configured admin");
            }
            return Ok(());
        }

        let password_hash = security::hash_password(password)?;
        match state
            .users
            .create_user(NewUser {
                name: "Administrator".to_string(),
                email,
                password_hash,
                roles: vec![Role::Admin],
            })
            .await?
        {
            Some(admin) => info!(user_id = admin.id, "Seeded admin account"),
            None => warn!("Admin account was created concurrently"),
        }
        Ok(())
    }

    pub fn create_access_token(config: &AppConfig, user_id: i64, roles: &[Role]) -> AppResult<String> {
        let now = get_current_timestamp() as usize;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            roles: roles.to_vec(),
            exp: now + config.access_token_ttl_secs as usize,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow!("Failed to sign access token: {}", e)))
    }

    pub fn decode_access_token(config: &AppConfig, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::unauthorized("Unauthorized: Invalid or expired token"))
    }
}
