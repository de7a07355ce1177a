//! Router-level tests that never reach MongoDB: authentication, input
//! validation and receipt rendering. The client connects lazily, so no
//! server needs to be running.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use carwash_service::models::{ActorKind, AuthenticatedActor, Role};
use carwash_service::services::{CarwashDb, JwtService};
use carwash_service::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

async fn test_router() -> (Router, String) {
    let config = common::test_config("carwash_router_test");
    let db = CarwashDb::connect(
        "mongodb://127.0.0.1:1",
        &config.mongodb.database,
        &config.service_name,
        Duration::from_millis(200),
    )
    .await
    .expect("connection string parses");

    let token = JwtService::new(&config.jwt)
        .generate_token(&AuthenticatedActor {
            id: "user-1".to_string(),
            name: "Test Admin".to_string(),
            role: Role::Admin,
            kind: ActorKind::User,
        })
        .expect("token");

    (build_router(AppState::new(config, db)), token)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn transaction_body() -> Value {
    json!({
        "serviceType": "Full Detail",
        "originalPrice": 100,
        "discountPercent": 10,
        "paymentMethod": "Card",
        "vehicleDetails": "Red Corolla",
        "customerName": "Jane Doe"
    })
}

#[tokio::test]
async fn business_routes_require_a_bearer_token() {
    let (app, _) = test_router().await;

    for uri in ["/transactions", "/customers", "/catalog/services", "/auth/me"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing or invalid Authorization header");
    }
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let (app, _) = test_router().await;

    let response = app
        .oneshot(json_request("POST", "/transactions", Some("not.a.jwt"), transaction_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn me_returns_the_token_actor() {
    let (app, token) = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["_id"], "user-1");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["type"], "User");
}

#[tokio::test]
async fn invalid_transactions_are_rejected_before_storage() {
    let (app, token) = test_router().await;

    let mut blank_service = transaction_body();
    blank_service["serviceType"] = json!("   ");

    let mut negative_price = transaction_body();
    negative_price["originalPrice"] = json!(-5);

    let mut percent_too_high = transaction_body();
    percent_too_high["discountPercent"] = json!(150);

    let mut unknown_method = transaction_body();
    unknown_method["paymentMethod"] = json!("Cheque");

    let mut missing_customer = transaction_body();
    missing_customer.as_object_mut().unwrap().remove("customerName");

    let cases = [
        (blank_service, "serviceType is required"),
        (negative_price, "originalPrice"),
        (percent_too_high, "discountPercent"),
        (unknown_method, "paymentMethod"),
        (missing_customer, "customerName"),
    ];

    for (body, expected) in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/transactions", Some(&token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{expected}");
        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains(expected), "{message} should mention {expected}");
    }
}

#[tokio::test]
async fn blank_search_is_a_bad_request() {
    let (app, token) = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/customers/search?name=%20")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing name");
}

#[tokio::test]
async fn receipt_is_rendered_as_an_html_attachment() {
    let (app, token) = test_router().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/receipts",
            Some(&token),
            json!({
                "customerName": "Jane Doe",
                "vehicleDetails": "Red Corolla",
                "email": "jane@example.com",
                "serviceType": "Full Detail",
                "specials": "Spring Special",
                "paymentMethod": "Mobile Payment",
                "originalPrice": 100,
                "discountPercent": 10,
                "discountAmount": 10,
                "finalPrice": 90,
                "issuedAt": "2024-05-01T14:30:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"receipt-1714573800000.html\""
    );
    assert!(response.headers()[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap()
        .contains("img-src data:"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<th>Original Price</th><td>$100.00</td>"));
    assert!(html.contains("<th>Total</th><td>$90.00</td>"));
    assert!(html.contains("<th>Special</th><td>Spring Special</td>"));
    assert!(html.contains("<th>Payment Method</th><td>Mobile Payment</td>"));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (app, _) = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
