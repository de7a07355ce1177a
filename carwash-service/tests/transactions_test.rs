//! End-to-end transaction pipeline tests.

mod common;

use common::TestApp;
use serde_json::{json, Value};

fn sale(customer_name: &str, vehicle: &str) -> Value {
    json!({
        "serviceType": "Full Detail",
        "originalPrice": 100,
        "discountPercent": 10,
        "discountAmount": 5,
        "paymentMethod": "Cash",
        "vehicleDetails": vehicle,
        "customerName": customer_name,
        "notes": "Pet hair",
        "createdBy": "someone-else"
    })
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn new_customer_sale_creates_one_customer_and_one_transaction() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let response = app.post_json("/transactions", &token, &sale("Jane Doe", "Red Corolla")).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();

    // 100 - (10 + 5)
    assert_eq!(body["originalPrice"], 85.0);
    assert_eq!(body["finalPrice"], 85.0);
    assert_eq!(body["quotedPrice"], 100.0);
    assert_eq!(body["totalDiscount"], 15.0);
    assert_eq!(body["discountAmount"], 5.0);
    assert_eq!(body["discountLabel"], "10% + $5 off");
    assert_eq!(body["createdBy"]["type"], "User");
    assert_ne!(body["createdBy"]["_id"], "someone-else");

    assert_eq!(app.count("customers").await, 1);
    assert_eq!(app.count("transactions").await, 1);

    // A second sale for the same pair reuses the customer
    let again: Value = app
        .post_json("/transactions", &token, &sale("Jane Doe", "Red Corolla"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(again["customer"], body["customer"]);
    assert_eq!(app.count("customers").await, 1);
    assert_eq!(app.count("transactions").await, 2);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn unknown_customer_reference_is_unprocessable() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let mut body = sale("Jane Doe", "Red Corolla");
    body["customer"] = json!("no-such-customer");

    let response = app.post_json("/transactions", &token, &body).await;
    assert_eq!(response.status(), 422);
    assert_eq!(app.count("transactions").await, 0);
    assert_eq!(app.count("customers").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn removed_actor_cannot_record_a_sale_or_create_a_customer() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let me: Value = app.get("/auth/me", &token).await.json().await.unwrap();
    app.db
        .database()
        .collection::<mongodb::bson::Document>("users")
        .delete_one(mongodb::bson::doc! { "_id": me["_id"].as_str().unwrap() }, None)
        .await
        .expect("Failed to delete user");

    let customers_before = app.count("customers").await;
    let response = app
        .post_json("/transactions", &token, &sale("Brand New", "Green Jeep"))
        .await;

    assert_eq!(response.status(), 422);
    assert_eq!(app.count("transactions").await, 0);
    assert_eq!(app.count("customers").await, customers_before);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn invalid_sale_creates_nothing() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let mut body = sale("Jane Doe", "Red Corolla");
    body["discountPercent"] = json!(101);

    let response = app.post_json("/transactions", &token, &body).await;
    assert_eq!(response.status(), 400);
    assert_eq!(app.count("customers").await, 0);
    assert_eq!(app.count("transactions").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn list_is_newest_first_and_enriched() {
    let app = TestApp::spawn().await;
    let (employee_id, token) = app.employee_token("Sam Washer").await;

    for (name, date) in [
        ("Old Timer", "2024-01-01T10:00:00Z"),
        ("Newest", "2024-03-01T10:00:00Z"),
        ("Middle", "2024-02-01T10:00:00Z"),
    ] {
        let mut body = sale(name, "Wagon");
        body["serviceDate"] = json!(date);
        assert_eq!(app.post_json("/transactions", &token, &body).await.status(), 201);
    }

    let list: Vec<Value> = app.get("/transactions", &token).await.json().await.unwrap();
    let names: Vec<&str> = list
        .iter()
        .map(|t| t["customerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Newest", "Middle", "Old Timer"]);

    let first = &list[0];
    assert_eq!(first["customer"]["name"], "Newest");
    assert_eq!(first["createdBy"]["_id"], employee_id.as_str());
    assert_eq!(first["createdBy"]["name"], "Sam Washer");

    let filtered: Vec<Value> = app
        .get("/transactions?from=2024-01-15T00:00:00Z&to=2024-02-15T00:00:00Z", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["customerName"], "Middle");

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn delete_reports_missing_ids() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let missing = app.delete("/transactions/does-not-exist", &token).await;
    assert_eq!(missing.status(), 404);

    let created: Value = app
        .post_json("/transactions", &token, &sale("Jane Doe", "Red Corolla"))
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/transactions/{}", created["_id"].as_str().unwrap());

    let deleted = app.delete(&path, &token).await;
    assert_eq!(deleted.status(), 200);
    let body: Value = deleted.json().await.unwrap();
    assert_eq!(body["message"], "Transaction deleted");

    assert_eq!(app.get(&path, &token).await.status(), 404);
    assert_eq!(app.delete(&path, &token).await.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn stored_transaction_receipt_shows_the_quoted_price() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let created: Value = app
        .post_json("/transactions", &token, &sale("Jane Doe", "Red Corolla"))
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .get(&format!("/transactions/{}/receipt", created["_id"].as_str().unwrap()), &token)
        .await;
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("<th>Original Price</th><td>$100.00</td>"));
    assert!(html.contains("<th>Discount (10%)</th><td>-$15.00</td>"));
    assert!(html.contains("<th>Total</th><td>$85.00</td>"));
    assert!(html.contains("Pet hair"));

    app.cleanup().await;
}
