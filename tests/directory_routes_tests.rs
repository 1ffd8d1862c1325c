//! Integration tests for the member directory endpoints.

mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{delete, get, patch_json, post_json, test_app};

#[tokio::test]
async fn test_create_member_returns_stored_representation() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/directory",
        json!({
            "full_name": "Jane Doe",
            "email": "jane@example.org",
            "phone": "",
            "gender": "female",
            "departments": ["choir", "ushering"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["full_name"], "Jane Doe");
    assert_eq!(body["email"], "jane@example.org");
    // Blank strings normalize to absent.
    assert_eq!(body["phone"], serde_json::Value::Null);
    assert_eq!(body["departments"], json!(["choir", "ushering"]));
    assert!(body["id"].as_str().is_some());
    assert!(body["created_at"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn test_list_is_sorted_and_searchable() {
    let app = test_app();
    for name in ["Zed Ncube", "Jane Doe", "Amai Moyo"] {
        let (status, _) = post_json(&app, "/directory", json!({ "full_name": name })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, "/directory").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Amai Moyo", "Jane Doe", "Zed Ncube"]);

    let (status, body) = get(&app, "/directory?search=jane").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, count) = get(&app, "/directory/count?search=jane").await;
    assert_eq!(count, json!(1));
}

#[tokio::test]
async fn test_department_filter_matches_membership() {
    let app = test_app();
    post_json(
        &app,
        "/directory",
        json!({ "full_name": "Jane Doe", "departments": ["choir"] }),
    )
    .await;
    post_json(&app, "/directory", json!({ "full_name": "John Dube" })).await;

    let (_, body) = get(&app, "/directory?department=choir").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["full_name"], "Jane Doe");

    let (_, count) = get(&app, "/directory/count?department=media").await;
    assert_eq!(count, json!(0));
}

#[tokio::test]
async fn test_get_unknown_member_is_404() {
    let app = test_app();
    let (status, body) = get(
        &app,
        "/directory/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_patch_null_clears_and_absent_preserves() {
    let app = test_app();
    let (_, created) = post_json(
        &app,
        "/directory",
        json!({
            "full_name": "Jane Doe",
            "email": "jane@example.org",
            "phone": "+263 77 000 0000"
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = patch_json(
        &app,
        &format!("/directory/{id}"),
        json!({ "email": null, "profession": "Teacher" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], serde_json::Value::Null);
    assert_eq!(updated["phone"], "+263 77 000 0000");
    assert_eq!(updated["profession"], "Teacher");
}

#[tokio::test]
async fn test_empty_patch_is_a_noop() {
    let app = test_app();
    let (_, created) = post_json(&app, "/directory", json!({ "full_name": "Jane Doe" })).await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = patch_json(&app, &format!("/directory/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn test_delete_then_404() {
    let app = test_app();
    let (_, created) = post_json(&app, "/directory", json!({ "full_name": "Jane Doe" })).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = delete(&app, &format!("/directory/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = delete(&app, &format!("/directory/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("/directory/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_overview_buckets() {
    let app = test_app();
    post_json(
        &app,
        "/directory",
        json!({
            "full_name": "Jane Doe",
            "gender": "female",
            "baptism_date": "2020-06-01",
            "spouse_name": "John Doe"
        }),
    )
    .await;
    post_json(
        &app,
        "/directory",
        json!({ "full_name": "John Doe", "gender": "male" }),
    )
    .await;

    let (status, stats) = get(&app, "/directory/stats/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["male"], 1);
    assert_eq!(stats["female"], 1);
    assert_eq!(stats["baptised"], 1);
    assert_eq!(stats["with_family"], 1);
}

#[tokio::test]
async fn test_pagination_window() {
    let app = test_app();
    for name in ["A", "B", "C", "D"] {
        post_json(&app, "/directory", json!({ "full_name": name })).await;
    }

    let (_, body) = get(&app, "/directory?limit=2&offset=1").await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "C"]);

    let (_, body) = get(&app, "/directory?offset=100").await;
    assert_eq!(body, json!([]));
}
