use serde::{Deserialize, Serialize};
use validator::Validate;
use utoipa::ToSchema;

use super::model::{Role, User};
use crate::common::validation::not_blank;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"name": "Asha", "email": "user@example.com", "password": "P@ssw0rd"}))]
pub struct SignupRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"licenseNumber": "DL-12345", "vehicleNumber": "MP09AB1234", "vehicleType": "Sedan"}))]
pub struct OnboardDriverRequest {
    #[validate(custom(function = "not_blank", message = "License number is required"))]
    pub license_number: String,
    #[validate(custom(function = "not_blank", message = "Vehicle number is required"))]
    pub vehicle_number: String,
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            roles: user.roles,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// User id, as a string per the JWT convention.
    pub sub: String,
    pub roles: Vec<Role>,
    pub exp: usize,
    pub iat: usize,
}

impl TokenClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Authenticated caller, injected into request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
