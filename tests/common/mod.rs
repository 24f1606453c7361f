// Shared harness for the HTTP integration tests.
// Every test gets its own app backed by the in-memory store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response, StatusCode},
    Router,
};
use ride_backend::{
    app::create_app,
    config::settings::AppConfig,
    modules::auth::service::AuthService,
    state::AppState,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@ride.test";
pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const PASSWORD: &str = "P@ssw0rd";

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        database_url: String::new(),
        db_max_connections: 1,
        redis_url: String::new(),
        jwt_secret: "integration-test-secret".to_string(),
        deploy_env: "test".to_string(),
        access_token_ttl_secs: 900,
        refresh_token_ttl_secs: 604_800,
        fare_base: 50.0,
        fare_per_minute: 2.0,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    }
}

/// Generate a unique email so tests never collide.
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4().simple())
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "POST", uri)
    }

    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "GET", uri)
    }

    /// Signs a rider up and returns the new user id.
    pub async fn signup(&self, name: &str, email: &str) -> i64 {
        let response = self
            .post("/auth/signup")
            .json(&json!({ "name": name, "email": email, "password": PASSWORD }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.json().await;
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.json().await;
        body["data"]["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Signs up a rider and returns `(id, access token)`.
    pub async fn rider(&self, name: &str) -> (i64, String) {
        let email = unique_email(name);
        let id = self.signup(name, &email).await;
        (id, self.login(&email, PASSWORD).await)
    }

    /// Signs up a user, onboards them as a driver and returns `(id, access token)`.
    /// The token is issued after onboarding so it carries the DRIVER role.
    pub async fn driver(&self, name: &str) -> (i64, String) {
        let email = unique_email(name);
        let id = self.signup(name, &email).await;
        let admin = self.admin_token().await;
        let response = self
            .post(&format!("/auth/onboardDriver/{}", id))
            .bearer(&admin)
            .json(&json!({
                "licenseNumber": format!("DL-{}", id),
                "vehicleNumber": format!("CG04-{}", id),
                "vehicleType": "Sedan"
            }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        (id, self.login(&email, PASSWORD).await)
    }

    /// Files a ride request as the given rider and returns the request id.
    pub async fn request_ride(&self, rider_token: &str, pickup: &str, destination: &str) -> i64 {
        let response = self
            .post("/rider/requestRide")
            .bearer(rider_token)
            .json(&json!({
                "pickupLocation": pickup,
                "destination": destination,
                "vehicleType": "Sedan"
            }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.json().await;
        body["data"]["id"].as_i64().unwrap()
    }

    /// Accepts a request as the given driver and returns the ride id.
    pub async fn accept(&self, driver_token: &str, request_id: i64) -> i64 {
        let response = self
            .post(&format!("/driver/acceptRide/{}", request_id))
            .bearer(driver_token)
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.json().await;
        body["data"]["id"].as_i64().unwrap()
    }

    /// Drives a fresh ride through to ENDED and returns its id.
    pub async fn completed_ride(&self, rider_token: &str, driver_token: &str) -> i64 {
        let request_id = self.request_ride(rider_token, "Telibandha", "Magneto Mall").await;
        let ride_id = self.accept(driver_token, request_id).await;
        let started = self.post(&format!("/driver/startRide/{}", ride_id)).bearer(driver_token).send().await;
        assert_eq!(started.status(), StatusCode::OK);
        let ended = self.post(&format!("/driver/endRide/{}", ride_id)).bearer(driver_token).send().await;
        assert_eq!(ended.status(), StatusCode::OK);
        ride_id
    }
}

pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: &'static str,
    uri: String,
    headers: Vec<(header::HeaderName, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &'static str, uri: &str) -> Self {
        Self {
            app,
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).unwrap());
        self.headers.push((header::CONTENT_TYPE, "application/json".to_string()));
        self
    }

    /// Raw body sent as `application/json`, used for malformed payloads.
    pub fn raw_json(mut self, body: &str) -> Self {
        self.body = Some(body.as_bytes().to_vec());
        self.headers.push((header::CONTENT_TYPE, "application/json".to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.headers.push((header::AUTHORIZATION, format!("Bearer {}", token)));
        self
    }

    pub fn cookie(mut self, cookie: &str) -> Self {
        self.headers.push((header::COOKIE, cookie.to_string()));
        self
    }

    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(&self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        let request = builder
            .body(self.body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.app.app.clone().oneshot(request).await.unwrap();
        TestResponse { response }
    }
}

pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// The raw `Set-Cookie` header for `name`, if the response set one.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&format!("{}=", name)))
            .map(str::to_string)
    }

    pub async fn json(self) -> Value {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_with_config(test_config()).await
}

pub async fn setup_with_config(config: AppConfig) -> TestApp {
    let app = setup_unseeded(config);
    AuthService::ensure_admin(&app.state).await.unwrap();
    app
}

/// App whose configured admin has not been seeded yet.
pub fn setup_unseeded(config: AppConfig) -> TestApp {
    let state = AppState::in_memory(config);
    TestApp {
        app: create_app(state.clone()),
        state,
    }
}
