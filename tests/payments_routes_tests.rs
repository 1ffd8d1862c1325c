//! Integration tests for the payments ledger endpoints.

mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};

use support::{delete, get, patch_json, post_json, test_app};

fn payment_body(name: &str, amount: f64, reason: &str, method: &str, date: &str) -> Value {
    json!({
        "full_name": name,
        "amount": amount,
        "reason": reason,
        "payment_method": method,
        "payment_date": date,
        "payment_time": "09:30:00",
        "received_by": "Treasurer"
    })
}

#[tokio::test]
async fn test_latest_receipt_on_empty_ledger() {
    let app = test_app();
    let (status, body) = get(&app, "/payments/receipts/latest").await;
    assert_eq!(status, StatusCode::OK);
    // Bare JSON string, not an object.
    assert_eq!(body, json!("0000000"));
}

#[tokio::test]
async fn test_receipt_numbers_are_sequential() {
    let app = test_app();
    let (status, first) = post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.0, "tithe", "cash", "2025-03-09"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["receipt_number"], "0000001");

    let (_, second) = post_json(
        &app,
        "/payments",
        payment_body("John Doe", 10.0, "offering", "ecocash", "2025-03-09"),
    )
    .await;
    assert_eq!(second["receipt_number"], "0000002");

    let (_, latest) = get(&app, "/payments/receipts/latest").await;
    assert_eq!(latest, json!("0000002"));
}

#[tokio::test]
async fn test_missing_required_fields_rejected() {
    let app = test_app();
    let (status, _) = post_json(
        &app,
        "/payments",
        json!({ "full_name": "Jane Doe", "amount": 10.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_amount_rounded_and_currency_defaulted() {
    let app = test_app();
    let (_, created) = post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.005, "tithe", "cash", "2025-03-09"),
    )
    .await;
    assert_eq!(created["amount"], 25.01);
    assert_eq!(created["currency"], "USD");
    assert_eq!(created["payment_date"], "2025-03-09");
    assert_eq!(created["payment_time"], "09:30:00");
}

#[tokio::test]
async fn test_list_newest_first_and_date_range() {
    let app = test_app();
    post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.0, "tithe", "cash", "2025-03-01"),
    )
    .await;
    post_json(
        &app,
        "/payments",
        payment_body("John Doe", 10.0, "offering", "cash", "2025-03-09"),
    )
    .await;

    let (_, body) = get(&app, "/payments").await;
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["payment_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-03-09", "2025-03-01"]);

    let (_, body) = get(&app, "/payments?from_date=2025-03-05").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["full_name"], "John Doe");

    let (_, count) = get(&app, "/payments/count?from_date=2025-03-01&to_date=2025-03-01").await;
    assert_eq!(count, json!(1));
}

#[tokio::test]
async fn test_search_matches_receipt_number() {
    let app = test_app();
    post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.0, "tithe", "cash", "2025-03-09"),
    )
    .await;

    let (_, body) = get(&app, "/payments?search=0000001").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, count) = get(&app, "/payments/count?search=0000001").await;
    assert_eq!(count, json!(1));
}

#[tokio::test]
async fn test_patch_strips_nulls_and_keeps_receipt() {
    let app = test_app();
    let (_, created) = post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.0, "tithe", "cash", "2025-03-09"),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = patch_json(
        &app,
        &format!("/payments/{id}"),
        json!({ "full_name": null, "amount": 30.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["full_name"], "Jane Doe");
    assert_eq!(updated["amount"], 30.0);
    assert_eq!(updated["receipt_number"], created["receipt_number"]);
}

#[tokio::test]
async fn test_delete_then_404() {
    let app = test_app();
    let (_, created) = post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.0, "tithe", "cash", "2025-03-09"),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = delete(&app, &format!("/payments/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/payments/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_breakdowns() {
    let app = test_app();
    post_json(
        &app,
        "/payments",
        payment_body("Jane Doe", 25.0, "tithe", "cash", "2025-03-09"),
    )
    .await;
    post_json(
        &app,
        "/payments",
        payment_body("Amai Moyo", 10.0, "tithe", "ecocash", "2025-03-09"),
    )
    .await;
    post_json(
        &app,
        "/payments",
        payment_body("John Doe", 15.0, "offering", "ecocash", "2025-03-01"),
    )
    .await;

    let (status, stats) = get(&app, "/payments/stats/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["total_amount"], 50.0);
    assert_eq!(stats["by_reason"]["tithe"], 35.0);
    assert_eq!(stats["by_reason"]["offering"], 15.0);
    assert_eq!(stats["by_method"]["cash"], 25.0);
    assert_eq!(stats["by_method"]["ecocash"], 25.0);
}
