// Ride lifecycle, ratings and role guards over HTTP.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::setup_test_app;

#[tokio::test]
async fn test_full_ride_scenario() {
    let app = setup_test_app().await;
    let (rider_id, rider) = app.rider("Riya").await;
    let (driver_a_id, driver_a) = app.driver("Arjun").await;
    let (_, driver_b) = app.driver("Bhavesh").await;

    let requested = app
        .post("/rider/requestRide")
        .bearer(&rider)
        .json(&json!({
            "pickupLocation": "NIT Raipur",
            "destination": "Raipur Railway Station",
            "vehicleType": "Sedan"
        }))
        .send()
        .await;
    assert_eq!(requested.status(), StatusCode::OK);
    let body = requested.json().await;
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["riderId"], rider_id);
    let request_id = body["data"]["id"].as_i64().unwrap();

    let accepted = app
        .post(&format!("/driver/acceptRide/{}", request_id))
        .bearer(&driver_a)
        .send()
        .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    let ride = accepted.json().await["data"].clone();
    assert_eq!(ride["status"], "ACCEPTED");
    assert_eq!(ride["driverId"], driver_a_id);
    assert_eq!(ride["pickupLocation"], "NIT Raipur");
    let ride_id = ride["id"].as_i64().unwrap();

    let late = app
        .post(&format!("/driver/acceptRide/{}", request_id))
        .bearer(&driver_b)
        .send()
        .await;
    assert_eq!(late.status(), StatusCode::CONFLICT);

    let busy = app.get("/driver/getMyProfile").bearer(&driver_a).send().await;
    assert_eq!(busy.json().await["data"]["available"], false);

    let started = app
        .post(&format!("/driver/startRide/{}", ride_id))
        .bearer(&driver_a)
        .json(&json!({ "initialKm": 1200 }))
        .send()
        .await;
    assert_eq!(started.status(), StatusCode::OK);
    let started = started.json().await;
    assert_eq!(started["data"]["status"], "STARTED");
    assert_eq!(started["data"]["initialKm"], 1200.0);
    assert!(started["data"]["startedAt"].is_string());

    let ended = app
        .post(&format!("/driver/endRide/{}", ride_id))
        .bearer(&driver_a)
        .send()
        .await;
    assert_eq!(ended.status(), StatusCode::OK);
    let ended = ended.json().await;
    assert_eq!(ended["data"]["status"], "ENDED");
    assert!(ended["data"]["endedAt"].is_string());
    let fare = ended["data"]["fare"].as_f64().unwrap();
    assert!(fare >= 50.0, "fare includes the base charge, got {}", fare);

    let free = app.get("/driver/getMyProfile").bearer(&driver_a).send().await;
    assert_eq!(free.json().await["data"]["available"], true);

    let rated = app
        .post(&format!("/rider/rateDriver/{}", ride_id))
        .bearer(&rider)
        .json(&json!({ "rating": 5, "comment": "Smooth ride" }))
        .send()
        .await;
    assert_eq!(rated.status(), StatusCode::OK);
    let rated = rated.json().await;
    assert_eq!(rated["data"]["id"], driver_a_id);
    assert_eq!(rated["data"]["rating"], 5.0);

    let again = app
        .post(&format!("/rider/rateDriver/{}", ride_id))
        .bearer(&rider)
        .json(&json!({ "rating": 1 }))
        .send()
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let rider_rated = app
        .post(&format!("/driver/rateRider/{}", ride_id))
        .bearer(&driver_a)
        .json(&json!({ "rating": 4 }))
        .send()
        .await;
    assert_eq!(rider_rated.status(), StatusCode::OK);
    assert_eq!(rider_rated.json().await["data"]["rating"], 4.0);

    let profile = app.get("/rider/getMyProfile").bearer(&rider).send().await;
    assert_eq!(profile.json().await["data"]["rating"], 4.0);
}

#[tokio::test]
async fn test_driver_rating_is_mean_of_received() {
    let app = setup_test_app().await;
    let (_, driver) = app.driver("Dev").await;
    let (_, first) = app.rider("Farah").await;
    let (_, second) = app.rider("Gita").await;

    for (rider, score) in [(&first, 5), (&second, 2)] {
        let ride_id = app.completed_ride(rider, &driver).await;
        let response = app
            .post(&format!("/rider/rateDriver/{}", ride_id))
            .bearer(rider)
            .json(&json!({ "rating": score }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let profile = app.get("/driver/getMyProfile").bearer(&driver).send().await;
    assert_eq!(profile.json().await["data"]["rating"], 3.5);
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    let app = setup_test_app().await;
    let (_, rider) = app.rider("Hari").await;
    let (_, driver) = app.driver("Indu").await;

    let request_id = app.request_ride(&rider, "Pandri", "Ambuja Mall").await;
    let ride_id = app.accept(&driver, request_id).await;

    let early_end = app.post(&format!("/driver/endRide/{}", ride_id)).bearer(&driver).send().await;
    assert_eq!(early_end.status(), StatusCode::CONFLICT);
    assert_eq!(early_end.json().await["error"], "INVALID_STATE");

    let early_rating = app
        .post(&format!("/rider/rateDriver/{}", ride_id))
        .bearer(&rider)
        .json(&json!({ "rating": 5 }))
        .send()
        .await;
    assert_eq!(early_rating.status(), StatusCode::CONFLICT);

    app.post(&format!("/driver/startRide/{}", ride_id)).bearer(&driver).send().await;
    let restart = app.post(&format!("/driver/startRide/{}", ride_id)).bearer(&driver).send().await;
    assert_eq!(restart.status(), StatusCode::CONFLICT);

    app.post(&format!("/driver/endRide/{}", ride_id)).bearer(&driver).send().await;
    let late_cancel = app.post(&format!("/rider/cancelRide/{}", ride_id)).bearer(&rider).send().await;
    assert_eq!(late_cancel.status(), StatusCode::CONFLICT);

    let missing = app.post("/driver/startRide/424242").bearer(&driver).send().await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_ride_rejects_bad_details() {
    let app = setup_test_app().await;
    let (_, rider) = app.rider("Jaya").await;
    let (_, driver) = app.driver("Kabir").await;
    let request_id = app.request_ride(&rider, "Shankar Nagar", "Airport").await;
    let ride_id = app.accept(&driver, request_id).await;

    let negative = app
        .post(&format!("/driver/startRide/{}", ride_id))
        .bearer(&driver)
        .json(&json!({ "initialKm": -5 }))
        .send()
        .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let before_accept = app
        .post(&format!("/driver/startRide/{}", ride_id))
        .bearer(&driver)
        .json(&json!({ "startTimestamp": "2000-01-01T00:00:00Z" }))
        .send()
        .await;
    assert_eq!(before_accept.status(), StatusCode::BAD_REQUEST);

    let future = app
        .post(&format!("/driver/startRide/{}", ride_id))
        .bearer(&driver)
        .json(&json!({ "startTimestamp": "2999-01-01T00:00:00Z" }))
        .send()
        .await;
    assert_eq!(future.status(), StatusCode::BAD_REQUEST);

    let ok = app.post(&format!("/driver/startRide/{}", ride_id)).bearer(&driver).send().await;
    assert_eq!(ok.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cancellation_paths() {
    let app = setup_test_app().await;
    let (_, rider) = app.rider("Lata").await;
    let (_, other_rider) = app.rider("Manoj").await;
    let (_, driver) = app.driver("Nikhil").await;

    let request_id = app.request_ride(&rider, "Civil Lines", "Marine Drive").await;
    let foreign = app
        .post(&format!("/rider/cancelRideRequest/{}", request_id))
        .bearer(&other_rider)
        .send()
        .await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let cancelled = app
        .post(&format!("/rider/cancelRideRequest/{}", request_id))
        .bearer(&rider)
        .send()
        .await;
    assert_eq!(cancelled.status(), StatusCode::OK);
    assert_eq!(cancelled.json().await["data"]["status"], "CANCELLED");

    let accept_cancelled = app
        .post(&format!("/driver/acceptRide/{}", request_id))
        .bearer(&driver)
        .send()
        .await;
    assert_eq!(accept_cancelled.status(), StatusCode::CONFLICT);

    let request_id = app.request_ride(&rider, "Civil Lines", "Marine Drive").await;
    let ride_id = app.accept(&driver, request_id).await;

    let not_mine = app
        .post(&format!("/rider/cancelRide/{}", ride_id))
        .bearer(&other_rider)
        .send()
        .await;
    assert_eq!(not_mine.status(), StatusCode::FORBIDDEN);

    let by_driver = app.post(&format!("/driver/cancelRide/{}", ride_id)).bearer(&driver).send().await;
    assert_eq!(by_driver.status(), StatusCode::OK);
    let body = by_driver.json().await;
    assert_eq!(body["data"]["status"], "CANCELLED");
    assert!(body["data"]["cancelledAt"].is_string());
    assert!(body["data"]["fare"].is_null());

    // Cancelling freed the driver for the next request.
    let next = app.request_ride(&rider, "Telibandha", "VIP Road").await;
    app.accept(&driver, next).await;
}

#[tokio::test]
async fn test_driver_with_active_ride_cannot_accept_another() {
    let app = setup_test_app().await;
    let (_, first) = app.rider("Om").await;
    let (_, second) = app.rider("Pari").await;
    let (_, driver) = app.driver("Qasim").await;

    let first_request = app.request_ride(&first, "A", "B").await;
    app.accept(&driver, first_request).await;

    let second_request = app.request_ride(&second, "C", "D").await;
    let response = app
        .post(&format!("/driver/acceptRide/{}", second_request))
        .bearer(&driver)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_role_guards() {
    let app = setup_test_app().await;
    let (_, rider) = app.rider("Rohan").await;
    let (_, driver) = app.driver("Sana").await;

    let no_token = app.get("/rider/getMyProfile").send().await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let bad_token = app.get("/driver/getMyProfile").bearer("not.a.jwt").send().await;
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);

    let rider_as_driver = app.get("/driver/getMyProfile").bearer(&rider).send().await;
    assert_eq!(rider_as_driver.status(), StatusCode::FORBIDDEN);

    let rider_accepts = app.post("/driver/acceptRide/1").bearer(&rider).send().await;
    assert_eq!(rider_accepts.status(), StatusCode::FORBIDDEN);

    // Onboarded drivers keep their RIDER role.
    let driver_as_rider = app.get("/rider/getMyProfile").bearer(&driver).send().await;
    assert_eq!(driver_as_rider.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_driver_cannot_accept_own_request() {
    let app = setup_test_app().await;
    let (_, driver) = app.driver("Tara").await;

    let request_id = app.request_ride(&driver, "Home", "Office").await;
    let response = app
        .post(&format!("/driver/acceptRide/{}", request_id))
        .bearer(&driver)
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rating_validation_and_ownership() {
    let app = setup_test_app().await;
    let (_, rider) = app.rider("Uma").await;
    let (_, stranger) = app.rider("Varun").await;
    let (_, driver) = app.driver("Waqar").await;
    let ride_id = app.completed_ride(&rider, &driver).await;

    let out_of_range = app
        .post(&format!("/rider/rateDriver/{}", ride_id))
        .bearer(&rider)
        .json(&json!({ "rating": 6 }))
        .send()
        .await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let stranger_rates = app
        .post(&format!("/rider/rateDriver/{}", ride_id))
        .bearer(&stranger)
        .json(&json!({ "rating": 3 }))
        .send()
        .await;
    assert_eq!(stranger_rates.status(), StatusCode::FORBIDDEN);

    let missing_ride = app
        .post("/rider/rateDriver/987654")
        .bearer(&rider)
        .json(&json!({ "rating": 3 }))
        .send()
        .await;
    assert_eq!(missing_ride.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_future_start_timestamp_is_rejected_before_state() {
    let app = setup_test_app().await;
    let (_, rider) = app.rider("Xavier").await;
    let (_, driver) = app.driver("Yamini").await;
    let ride_id = app.completed_ride(&rider, &driver).await;

    let future = app
        .post(&format!("/driver/startRide/{}", ride_id))
        .bearer(&driver)
        .json(&json!({ "startTimestamp": "2999-01-01T00:00:00Z" }))
        .send()
        .await;
    assert_eq!(future.status(), StatusCode::BAD_REQUEST);
    assert_eq!(future.json().await["error"], "VALIDATION_ERROR");

    let no_details = app.post(&format!("/driver/startRide/{}", ride_id)).bearer(&driver).send().await;
    assert_eq!(no_details.status(), StatusCode::CONFLICT);
    assert_eq!(no_details.json().await["error"], "INVALID_STATE");
}
