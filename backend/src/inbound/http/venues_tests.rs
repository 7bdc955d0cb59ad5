//! Tests for venue HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::VenueId;
use crate::inbound::http::test_utils::{memory_world, test_app};

fn draft_body(name: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "name": name,
        "address": "90 Bedford St",
        "latitude": latitude,
        "longitude": longitude,
        "category": "club",
        "ageRestriction": 21,
        "coverCharge": "$10"
    })
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|venue| venue["name"].as_str().expect("name").to_owned())
        .collect()
}

#[actix_web::test]
async fn create_then_fetch_round_trips_attributes() {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/venues")
        .set_json(draft_body("  Basement Bar ", 40.7332, -74.0053))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    assert_eq!(created["name"], "Basement Bar");
    assert_eq!(created["ageRestriction"], 21);
    assert_eq!(created["createdAt"], "2026-03-06T20:00:00+00:00");

    let id = created["id"].as_str().expect("id");
    let fetched = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/venues/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = actix_test::read_body_json(fetched).await;
    assert_eq!(fetched, created);
}

#[rstest]
#[case(json!({ "latitude": 1.0, "longitude": 1.0 }), "name")]
#[case(json!({ "name": "Nowhere", "longitude": 1.0 }), "latitude")]
#[case(json!({ "name": "Nowhere", "latitude": 95.0, "longitude": 1.0 }), "latitude")]
#[case(json!({ "name": "Nowhere", "latitude": 1.0, "longitude": 1.0, "ageRestriction": -1 }), "ageRestriction")]
#[actix_web::test]
async fn create_rejects_invalid_attributes(#[case] payload: Value, #[case] field: &str) {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/venues")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn update_replaces_attributes_and_bumps_timestamp() {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state.clone())).await;
    world.clock.advance_minutes(90);

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/venues/{}", world.crow))
        .set_json(draft_body("The Tipsy Crow", 40.7306, -74.0007))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["category"], "club");
    assert_eq!(body["createdAt"], "2026-03-06T20:00:00+00:00");
    assert_eq!(body["updatedAt"], "2026-03-06T21:30:00+00:00");
}

#[actix_web::test]
async fn update_of_unknown_venue_is_not_found() {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/venues/{}", VenueId::random()))
        .set_json(draft_body("Ghost", 1.0, 1.0))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_then_get_is_not_found() {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state.clone())).await;
    let uri = format!("/api/v1/venues/{}", world.neon);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let fetched =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request())
            .await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_returns_seeded_venues_by_name() {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/venues").to_request(),
    )
    .await;
    assert_eq!(names(&body), ["Neon Room", "The Tipsy Crow"]);
}

#[rstest]
#[case("lat=40.7306&lon=-74.0007&radiusMi=0.1", &["Neon Room", "The Tipsy Crow"])]
#[case("lat=40.7306&lon=-74.0007&radiusMi=0.02", &["The Tipsy Crow"])]
#[case("lat=41.8781&lon=-87.6298&radiusMi=5", &[])]
#[actix_web::test]
async fn nearby_filters_by_bounding_box(#[case] query: &str, #[case] expected: &[&str]) {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/venues/nearby?{query}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(names(&body), expected);
}

#[rstest]
#[case("lon=-74.0&radiusMi=1", "lat")]
#[case("lat=north&lon=-74.0&radiusMi=1", "lat")]
#[case("lat=40.7&lon=-74.0&radiusMi=0", "radiusMi")]
#[case("lat=40.7&lon=-74.0&radiusMi=-3", "radiusMi")]
#[case("lat=90&lon=-74.0&radiusMi=1", "lat")]
#[actix_web::test]
async fn nearby_rejects_invalid_parameters(#[case] query: &str, #[case] field: &str) {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/venues/nearby?{query}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[case("query=tipsy", &["The Tipsy Crow"])]
#[case("query=ROOM", &["Neon Room"])]
#[case("query=zzz", &[])]
#[actix_web::test]
async fn search_matches_name_fragments_ignoring_case(
    #[case] query: &str,
    #[case] expected: &[&str],
) {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/venues/search?{query}"))
            .to_request(),
    )
    .await;
    assert_eq!(names(&body), expected);
}

#[rstest]
#[case("/api/v1/venues/search")]
#[case("/api/v1/venues/search?query=%20%20")]
#[actix_web::test]
async fn search_rejects_blank_query(#[case] uri: &str) {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("bar", &["Neon Room", "The Tipsy Crow"])]
#[case("club", &[])]
#[actix_web::test]
async fn category_lists_exact_matches(#[case] category: &str, #[case] expected: &[&str]) {
    let world = memory_world();
    let app = actix_test::init_service(test_app(world.state)).await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/venues/category/{category}"))
            .to_request(),
    )
    .await;
    assert_eq!(names(&body), expected);
}
