//! Store traits: the abstract persistence interface.
//!
//! All querying, pagination, uniqueness, and sequence generation is
//! delegated to a store implementation behind these traits. The crate ships
//! [`super::MemoryStore`]; a hosted database client plugs in by implementing
//! the same traits. Implementations must be `Send + Sync`.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreResult;
use crate::api::common::Page;
use crate::api::directory::{MemberCreate, MemberFilter, MemberPatch, MemberRecord};
use crate::api::equipment::{EquipmentCreate, EquipmentFilter, EquipmentPatch, EquipmentRecord};
use crate::api::events::{EventCreate, EventFilter, EventPatch, EventRecord, RsvpCreate, RsvpRecord};
use crate::api::payments::{PaymentCreate, PaymentFilter, PaymentPatch, PaymentRecord};

/// Member directory operations.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// List members matching the filter, ordered by full name.
    async fn list_members(&self, filter: &MemberFilter, page: Page)
        -> StoreResult<Vec<MemberRecord>>;

    /// Count members matching the filter.
    async fn count_members(&self, filter: &MemberFilter) -> StoreResult<u64>;

    /// Fetch one member; `None` when absent.
    async fn get_member(&self, id: Uuid) -> StoreResult<Option<MemberRecord>>;

    /// Persist a new member, assigning id and timestamps.
    async fn insert_member(&self, create: MemberCreate) -> StoreResult<MemberRecord>;

    /// Apply a partial update; `None` when the id does not exist. An empty
    /// patch returns the record unchanged.
    async fn update_member(&self, id: Uuid, patch: MemberPatch)
        -> StoreResult<Option<MemberRecord>>;

    /// Hard-delete; returns whether a record was removed.
    async fn delete_member(&self, id: Uuid) -> StoreResult<bool>;
}

/// Equipment inventory operations.
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// List equipment matching the filter, ordered by name.
    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
        page: Page,
    ) -> StoreResult<Vec<EquipmentRecord>>;

    /// Count equipment matching the filter.
    async fn count_equipment(&self, filter: &EquipmentFilter) -> StoreResult<u64>;

    /// Fetch one item; `None` when absent.
    async fn get_equipment(&self, id: Uuid) -> StoreResult<Option<EquipmentRecord>>;

    /// Persist a new item, assigning id and timestamps.
    async fn insert_equipment(&self, create: EquipmentCreate) -> StoreResult<EquipmentRecord>;

    /// Apply a partial update; `None` when the id does not exist.
    async fn update_equipment(
        &self,
        id: Uuid,
        patch: EquipmentPatch,
    ) -> StoreResult<Option<EquipmentRecord>>;

    /// Hard-delete; returns whether a record was removed.
    async fn delete_equipment(&self, id: Uuid) -> StoreResult<bool>;
}

/// Events/notices and RSVP operations.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// List events matching the filter, newest publication first.
    async fn list_events(&self, filter: &EventFilter, page: Page)
        -> StoreResult<Vec<EventRecord>>;

    /// Count events matching the filter.
    async fn count_events(&self, filter: &EventFilter) -> StoreResult<u64>;

    /// Fetch one event; `None` when absent. Does not touch the view counter.
    async fn get_event(&self, id: Uuid) -> StoreResult<Option<EventRecord>>;

    /// Bump the view counter; returns whether the event exists.
    async fn increment_event_views(&self, id: Uuid) -> StoreResult<bool>;

    /// Persist a new event, assigning id, publish timestamp, and counters.
    async fn insert_event(&self, create: EventCreate) -> StoreResult<EventRecord>;

    /// Apply a partial update; `None` when the id does not exist.
    async fn update_event(&self, id: Uuid, patch: EventPatch)
        -> StoreResult<Option<EventRecord>>;

    /// Hard-delete the event row only; RSVP cleanup is a separate call.
    async fn delete_event(&self, id: Uuid) -> StoreResult<bool>;

    /// List RSVPs for an event in chronological order.
    async fn list_rsvps(&self, event_id: Uuid) -> StoreResult<Vec<RsvpRecord>>;

    /// Count RSVPs for one event.
    async fn count_rsvps(&self, event_id: Uuid) -> StoreResult<u64>;

    /// Count RSVPs across all events.
    async fn count_all_rsvps(&self) -> StoreResult<u64>;

    /// Persist a new RSVP. Parent existence is the caller's check.
    async fn insert_rsvp(&self, create: RsvpCreate) -> StoreResult<RsvpRecord>;

    /// Hard-delete one RSVP; returns whether a record was removed.
    async fn delete_rsvp(&self, id: Uuid) -> StoreResult<bool>;

    /// Delete every RSVP referencing an event; returns how many were removed.
    async fn delete_event_rsvps(&self, event_id: Uuid) -> StoreResult<u64>;
}

/// Payments ledger operations.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// List payments matching the filter, newest payment date/time first.
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        page: Page,
    ) -> StoreResult<Vec<PaymentRecord>>;

    /// Count payments matching the filter.
    async fn count_payments(&self, filter: &PaymentFilter) -> StoreResult<u64>;

    /// Fetch one payment; `None` when absent.
    async fn get_payment(&self, id: Uuid) -> StoreResult<Option<PaymentRecord>>;

    /// Persist a new payment. The store draws the next receipt number from
    /// its sequence; a sequence failure fails the insert (no placeholder
    /// receipt is ever issued).
    async fn insert_payment(&self, create: PaymentCreate) -> StoreResult<PaymentRecord>;

    /// Apply a partial update; `None` when the id does not exist.
    async fn update_payment(
        &self,
        id: Uuid,
        patch: PaymentPatch,
    ) -> StoreResult<Option<PaymentRecord>>;

    /// Hard-delete; returns whether a record was removed.
    async fn delete_payment(&self, id: Uuid) -> StoreResult<bool>;

    /// The lexicographically greatest receipt number, `None` on an empty
    /// ledger.
    async fn latest_receipt_number(&self) -> StoreResult<Option<String>>;
}

/// Connectivity probe for the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// True when the backend is reachable.
    async fn ping(&self) -> StoreResult<bool>;
}

/// Combined store interface required by the HTTP layer.
pub trait FullStore:
    MemberStore + EquipmentStore + EventStore + PaymentStore + StoreHealth
{
}

impl<T> FullStore for T where
    T: MemberStore + EquipmentStore + EventStore + PaymentStore + StoreHealth
{
}
