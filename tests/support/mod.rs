//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use assembly_api::api::common::Page;
use assembly_api::api::directory::{MemberCreate, MemberFilter, MemberPatch, MemberRecord};
use assembly_api::api::equipment::{
    EquipmentCreate, EquipmentFilter, EquipmentPatch, EquipmentRecord,
};
use assembly_api::api::events::{
    EventCreate, EventFilter, EventPatch, EventRecord, RsvpCreate, RsvpRecord,
};
use assembly_api::api::payments::{PaymentCreate, PaymentFilter, PaymentPatch, PaymentRecord};
use assembly_api::http::{create_router, AppState};
use assembly_api::store::{
    EquipmentStore, EventStore, FullStore, MemberStore, MemoryObjectStore, MemoryStore,
    ObjectStore, PaymentStore, StoreError, StoreHealth, StoreResult, StoredObject,
};

/// Router backed by fresh in-memory stores.
pub fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new()) as Arc<dyn FullStore>;
    let images = Arc::new(MemoryObjectStore::new("http://localhost:8080"));
    create_router(AppState::new(store, images))
}

/// Router whose store fails every operation, for error-path tests.
pub fn failing_app() -> Router {
    let store = Arc::new(FailingStore) as Arc<dyn FullStore>;
    let images = Arc::new(FailingObjects) as Arc<dyn ObjectStore>;
    create_router(AppState::new(store, images))
}

// =========================================================
// Request helpers
// =========================================================

/// Send a request with an optional JSON body, returning status and parsed
/// body (Null for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request build");

    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Boundary used by [`multipart_upload`].
pub const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Send a single-file multipart upload to `uri`.
pub async fn multipart_upload(
    app: &Router,
    uri: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> (StatusCode, Value) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request build");

    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// =========================================================
// Failing doubles
// =========================================================

fn offline() -> StoreError {
    StoreError::connection("backend offline")
}

/// Store double that fails every operation.
pub struct FailingStore;

#[async_trait]
impl MemberStore for FailingStore {
    async fn list_members(
        &self,
        _filter: &MemberFilter,
        _page: Page,
    ) -> StoreResult<Vec<MemberRecord>> {
        Err(offline())
    }

    async fn count_members(&self, _filter: &MemberFilter) -> StoreResult<u64> {
        Err(offline())
    }

    async fn get_member(&self, _id: Uuid) -> StoreResult<Option<MemberRecord>> {
        Err(offline())
    }

    async fn insert_member(&self, _create: MemberCreate) -> StoreResult<MemberRecord> {
        Err(offline())
    }

    async fn update_member(
        &self,
        _id: Uuid,
        _patch: MemberPatch,
    ) -> StoreResult<Option<MemberRecord>> {
        Err(offline())
    }

    async fn delete_member(&self, _id: Uuid) -> StoreResult<bool> {
        Err(offline())
    }
}

#[async_trait]
impl EquipmentStore for FailingStore {
    async fn list_equipment(
        &self,
        _filter: &EquipmentFilter,
        _page: Page,
    ) -> StoreResult<Vec<EquipmentRecord>> {
        Err(offline())
    }

    async fn count_equipment(&self, _filter: &EquipmentFilter) -> StoreResult<u64> {
        Err(offline())
    }

    async fn get_equipment(&self, _id: Uuid) -> StoreResult<Option<EquipmentRecord>> {
        Err(offline())
    }

    async fn insert_equipment(&self, _create: EquipmentCreate) -> StoreResult<EquipmentRecord> {
        Err(offline())
    }

    async fn update_equipment(
        &self,
        _id: Uuid,
        _patch: EquipmentPatch,
    ) -> StoreResult<Option<EquipmentRecord>> {
        Err(offline())
    }

    async fn delete_equipment(&self, _id: Uuid) -> StoreResult<bool> {
        Err(offline())
    }
}

#[async_trait]
impl EventStore for FailingStore {
    async fn list_events(
        &self,
        _filter: &EventFilter,
        _page: Page,
    ) -> StoreResult<Vec<EventRecord>> {
        Err(offline())
    }

    async fn count_events(&self, _filter: &EventFilter) -> StoreResult<u64> {
        Err(offline())
    }

    async fn get_event(&self, _id: Uuid) -> StoreResult<Option<EventRecord>> {
        Err(offline())
    }

    async fn increment_event_views(&self, _id: Uuid) -> StoreResult<bool> {
        Err(offline())
    }

    async fn insert_event(&self, _create: EventCreate) -> StoreResult<EventRecord> {
        Err(offline())
    }

    async fn update_event(
        &self,
        _id: Uuid,
        _patch: EventPatch,
    ) -> StoreResult<Option<EventRecord>> {
        Err(offline())
    }

    async fn delete_event(&self, _id: Uuid) -> StoreResult<bool> {
        Err(offline())
    }

    async fn list_rsvps(&self, _event_id: Uuid) -> StoreResult<Vec<RsvpRecord>> {
        Err(offline())
    }

    async fn count_rsvps(&self, _event_id: Uuid) -> StoreResult<u64> {
        Err(offline())
    }

    async fn count_all_rsvps(&self) -> StoreResult<u64> {
        Err(offline())
    }

    async fn insert_rsvp(&self, _create: RsvpCreate) -> StoreResult<RsvpRecord> {
        Err(offline())
    }

    async fn delete_rsvp(&self, _id: Uuid) -> StoreResult<bool> {
        Err(offline())
    }

    async fn delete_event_rsvps(&self, _event_id: Uuid) -> StoreResult<u64> {
        Err(offline())
    }
}

#[async_trait]
impl PaymentStore for FailingStore {
    async fn list_payments(
        &self,
        _filter: &PaymentFilter,
        _page: Page,
    ) -> StoreResult<Vec<PaymentRecord>> {
        Err(offline())
    }

    async fn count_payments(&self, _filter: &PaymentFilter) -> StoreResult<u64> {
        Err(offline())
    }

    async fn get_payment(&self, _id: Uuid) -> StoreResult<Option<PaymentRecord>> {
        Err(offline())
    }

    async fn insert_payment(&self, _create: PaymentCreate) -> StoreResult<PaymentRecord> {
        Err(offline())
    }

    async fn update_payment(
        &self,
        _id: Uuid,
        _patch: PaymentPatch,
    ) -> StoreResult<Option<PaymentRecord>> {
        Err(offline())
    }

    async fn delete_payment(&self, _id: Uuid) -> StoreResult<bool> {
        Err(offline())
    }

    async fn latest_receipt_number(&self) -> StoreResult<Option<String>> {
        Err(offline())
    }
}

#[async_trait]
impl StoreHealth for FailingStore {
    async fn ping(&self) -> StoreResult<bool> {
        Err(offline())
    }
}

/// Object-store double that fails every upload.
pub struct FailingObjects;

#[async_trait]
impl ObjectStore for FailingObjects {
    async fn put_image(
        &self,
        _filename: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> StoreResult<StoredObject> {
        Err(offline())
    }
}
