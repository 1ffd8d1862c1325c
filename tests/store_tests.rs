//! Tests exercising the in-memory store directly through the trait seam.

use serde_json::json;

use assembly_api::api::common::Page;
use assembly_api::api::directory::MemberPatch;
use assembly_api::api::events::{EventCreate, EventFilter, RsvpCreate};
use assembly_api::api::payments::PaymentFilter;
use assembly_api::store::{EventStore, MemberStore, MemoryStore, PaymentStore};

fn page() -> Page {
    Page {
        limit: 100,
        offset: 0,
    }
}

#[tokio::test]
async fn test_empty_patch_does_not_touch_updated_at() {
    let store = MemoryStore::new();
    let created = store
        .insert_member(serde_json::from_value(json!({ "full_name": "Jane Doe" })).unwrap())
        .await
        .unwrap();

    let unchanged = store
        .update_member(created.id, MemberPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.updated_at, created.updated_at);

    let patch: MemberPatch = serde_json::from_str(r#"{"profession": "Teacher"}"#).unwrap();
    let changed = store.update_member(created.id, patch).await.unwrap().unwrap();
    assert!(changed.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_view_counter_and_missing_event() {
    let store = MemoryStore::new();
    let event: EventCreate = serde_json::from_value(json!({ "title": "Conference" })).unwrap();
    let created = store.insert_event(event).await.unwrap();

    assert!(store.increment_event_views(created.id).await.unwrap());
    assert!(store.increment_event_views(created.id).await.unwrap());
    let fetched = store.get_event(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.views, 2);

    assert!(!store
        .increment_event_views(uuid::Uuid::new_v4())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_rsvp_cascade_delete() {
    let store = MemoryStore::new();
    let event: EventCreate = serde_json::from_value(json!({ "title": "Conference" })).unwrap();
    let event = store.insert_event(event).await.unwrap();
    let other: EventCreate = serde_json::from_value(json!({ "title": "Other" })).unwrap();
    let other = store.insert_event(other).await.unwrap();

    for name in ["Jane", "John"] {
        let rsvp: RsvpCreate = serde_json::from_value(json!({
            "event_id": event.id.to_string(),
            "name": name
        }))
        .unwrap();
        store.insert_rsvp(rsvp).await.unwrap();
    }
    let keeper: RsvpCreate = serde_json::from_value(json!({
        "event_id": other.id.to_string(),
        "name": "Amai Moyo"
    }))
    .unwrap();
    store.insert_rsvp(keeper).await.unwrap();

    assert_eq!(store.delete_event_rsvps(event.id).await.unwrap(), 2);
    assert_eq!(store.count_rsvps(event.id).await.unwrap(), 0);
    assert_eq!(store.count_all_rsvps().await.unwrap(), 1);
}

#[tokio::test]
async fn test_event_default_filter_includes_drafts() {
    let store = MemoryStore::new();
    let draft: EventCreate =
        serde_json::from_value(json!({ "title": "Draft", "is_published": false })).unwrap();
    store.insert_event(draft).await.unwrap();

    assert_eq!(
        store.count_events(&EventFilter::default()).await.unwrap(),
        1
    );
    let published_only = EventFilter {
        published_only: true,
        ..Default::default()
    };
    assert_eq!(store.count_events(&published_only).await.unwrap(), 0);
}

#[tokio::test]
async fn test_payment_ordering_is_date_then_time() {
    let store = MemoryStore::new();
    let mk = |name: &str, date: &str, time: &str| {
        serde_json::from_value(json!({
            "full_name": name,
            "amount": 10.0,
            "reason": "tithe",
            "payment_method": "cash",
            "payment_date": date,
            "payment_time": time,
            "received_by": "Treasurer"
        }))
        .unwrap()
    };
    store
        .insert_payment(mk("Morning", "2025-03-09", "08:00:00"))
        .await
        .unwrap();
    store
        .insert_payment(mk("Evening", "2025-03-09", "18:00:00"))
        .await
        .unwrap();
    store
        .insert_payment(mk("Older", "2025-03-01", "23:00:00"))
        .await
        .unwrap();

    let rows = store
        .list_payments(&PaymentFilter::default(), page())
        .await
        .unwrap();
    let names: Vec<&str> = rows.iter().map(|p| p.full_name.as_str()).collect();
    assert_eq!(names, vec!["Evening", "Morning", "Older"]);
}
