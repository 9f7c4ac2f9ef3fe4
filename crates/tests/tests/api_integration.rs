use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use triage_api::build_app;

async fn test_app() -> Router {
    // Keep tests hermetic: never let a developer's key enable the live
    // delegation path.
    std::env::remove_var("OPENAI_API_KEY");
    build_app().await.expect("app should build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn assess_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/assess")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["status"], "healthy");
    assert!(parsed.get("timestamp").is_some());
}

#[tokio::test]
async fn assess_requires_symptoms() {
    let app = test_app().await;

    let response = app
        .oneshot(assess_request(json!({ "location": "San Francisco" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = body_json(response).await;
    assert_eq!(parsed["error"], "Symptoms are required");
}

#[tokio::test]
async fn assess_requires_symptoms_for_empty_body() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/assess")
                .header("content-type", "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = body_json(response).await;
    assert_eq!(parsed["error"], "Symptoms are required");
}

#[tokio::test]
async fn assess_requires_symptoms_for_unparseable_body() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/assess")
                .header("content-type", "application/json")
                .body(Body::from("not json at all"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = body_json(response).await;
    assert_eq!(parsed["error"], "Symptoms are required");
}

#[tokio::test]
async fn assess_rejects_blank_symptoms() {
    let app = test_app().await;

    let response = app
        .oneshot(assess_request(json!({ "symptoms": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = body_json(response).await;
    assert_eq!(parsed["error"], "Symptoms cannot be empty");
}

#[tokio::test]
async fn assess_classifies_chest_pain_as_high() {
    let app = test_app().await;

    let response = app
        .oneshot(assess_request(json!({
            "symptoms": "I have CHEST PAIN",
            "location": "San Francisco"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;

    assert_eq!(parsed["urgencyLevel"], "high");
    assert!(parsed["summary"].is_string());
    assert!(parsed["recommendations"].as_array().unwrap().len() >= 3);
    assert!(parsed["reasoning"].is_string());
    assert!(parsed.get("timestamp").is_some());
    assert!(parsed.get("disclaimer").is_some());

    let resources = parsed["nearbyResources"].as_array().unwrap();
    assert!(resources.len() <= 3);
    for resource in resources {
        let kind = resource["type"].as_str().unwrap();
        assert!(kind == "Emergency Room" || kind == "Hospital");
    }
}

#[tokio::test]
async fn assess_defaults_to_low_for_benign_text() {
    let app = test_app().await;

    let response = app
        .oneshot(assess_request(json!({ "symptoms": "I feel great" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["urgencyLevel"], "low");
    assert!(parsed["nearbyResources"].as_array().unwrap().len() <= 3);
}

#[tokio::test]
async fn resources_default_to_moderate_urgency() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/resources")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;

    assert_eq!(parsed["total"], 3);
    let resources = parsed["resources"].as_array().unwrap();
    let mut last_distance = 0.0;
    for resource in resources {
        assert_ne!(resource["type"], "Clinic");
        let distance = resource["distanceMiles"].as_f64().unwrap();
        assert!(distance >= last_distance);
        last_distance = distance;
    }
}

#[tokio::test]
async fn resources_high_urgency_filters_to_emergency_capable() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/resources?urgency=high&location=SF")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;

    assert_eq!(parsed["total"], 2);
    for resource in parsed["resources"].as_array().unwrap() {
        let kind = resource["type"].as_str().unwrap();
        assert!(kind == "Emergency Room" || kind == "Hospital");
    }
}
