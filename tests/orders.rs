mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

async fn place(app: &TestApp, item: &str, customer_id: i64) -> i64 {
    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/api/v1/orders",
            Some(&bearer()),
            Some(json!({ "item": item, "amount": 100, "customer_id": customer_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_get_embeds_customer() {
    let (sms, _rx) = RecordingSms::ok();
    let app = test_app(sms);
    app.store.seed_customer(7, "Jane", "+254700000000");
    let id = place(&app, "Phone", 7).await;

    let (status, body) = send(
        &app.router,
        request("GET", &format!("/api/v1/orders/{}", id), Some(&bearer()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"], "Phone");
    assert_eq!(body["customer"]["code"], "CUST007");

    let (status, body) = send(
        &app.router,
        request("GET", "/api/v1/orders/999", Some(&bearer()), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "order_not_found");
}

#[tokio::test]
async fn test_list_filters_by_customer() {
    let (sms, _rx) = RecordingSms::ok();
    let app = test_app(sms);
    app.store.seed_customer(1, "Jane", "0700000001");
    app.store.seed_customer(2, "John", "0700000002");
    place(&app, "Phone", 1).await;
    place(&app, "Laptop", 2).await;
    place(&app, "Charger", 1).await;

    let (status, body) = send(
        &app.router,
        request("GET", "/api/v1/orders", Some(&bearer()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (_, body) = send(
        &app.router,
        request("GET", "/api/v1/orders?customer_id=1", Some(&bearer()), None),
    )
    .await;
    assert_eq!(body["total"], 2);
    let orders = body["orders"].as_array().unwrap();
    assert!(orders.iter().all(|o| o["customer"]["name"] == "Jane"));
}

#[tokio::test]
async fn test_update_keeps_empty_fields_and_rejects_negative_amount() {
    let (sms, _rx) = RecordingSms::ok();
    let app = test_app(sms);
    app.store.seed_customer(7, "Jane", "+254700000000");
    let id = place(&app, "Phone", 7).await;
    let uri = format!("/api/v1/orders/{}", id);

    let (status, body) = send(
        &app.router,
        request("PUT", &uri, Some(&bearer()), Some(json!({ "item": "", "amount": 250.5 }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"], "Phone");
    assert_eq!(body["amount"], 250.5);

    let (status, body) = send(
        &app.router,
        request("PUT", &uri, Some(&bearer()), Some(json!({ "amount": -5 }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_delete_order() {
    let (sms, _rx) = RecordingSms::ok();
    let app = test_app(sms);
    app.store.seed_customer(7, "Jane", "+254700000000");
    let id = place(&app, "Phone", 7).await;
    let uri = format!("/api/v1/orders/{}", id);

    let (status, _) = send(&app.router, request("DELETE", &uri, Some(&bearer()), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.order_count(), 0);

    let (status, body) = send(&app.router, request("DELETE", &uri, Some(&bearer()), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "order_not_found");
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let (sms, _rx) = RecordingSms::ok();
    let app = test_app(sms);
    app.store.seed_customer(1, "Jane", "0700000001");
    place(&app, "Phone", 1).await;

    let (status, body) = send(
        &app.router,
        request(
            "GET",
            &format!("/api/v1/orders?page={}", i64::MAX),
            Some(&bearer()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert!(body["orders"].as_array().unwrap().is_empty());
}
