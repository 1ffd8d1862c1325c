//! In-memory store implementation.
//!
//! Mirrors the query semantics the hosted backend provides: case-insensitive
//! substring search OR-ed across the module's text fields, exact-match
//! filters AND-ed together, module-specific ordering, and range pagination.
//! Each operation takes the lock once, so individual row mutations are
//! atomic; multi-step flows are not, matching the service's consistency
//! model.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::error::StoreResult;
use super::traits::{EquipmentStore, EventStore, MemberStore, PaymentStore, StoreHealth};
use crate::api::common::Page;
use crate::api::directory::{MemberCreate, MemberFilter, MemberPatch, MemberRecord};
use crate::api::equipment::{EquipmentCreate, EquipmentFilter, EquipmentPatch, EquipmentRecord};
use crate::api::events::{
    EventCreate, EventFilter, EventPatch, EventRecord, RsvpCreate, RsvpRecord,
};
use crate::api::payments::{PaymentCreate, PaymentFilter, PaymentPatch, PaymentRecord};

#[derive(Default)]
struct State {
    members: HashMap<Uuid, MemberRecord>,
    equipment: HashMap<Uuid, EquipmentRecord>,
    events: HashMap<Uuid, EventRecord>,
    rsvps: HashMap<Uuid, RsvpRecord>,
    payments: HashMap<Uuid, PaymentRecord>,
    receipt_seq: u64,
}

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// =========================================================
// Matching helpers
// =========================================================

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map(|h| contains_ci(h, needle)).unwrap_or(false)
}

fn paginate<T>(rows: Vec<T>, page: Page) -> Vec<T> {
    rows.into_iter().skip(page.offset).take(page.limit).collect()
}

fn member_matches(m: &MemberRecord, f: &MemberFilter) -> bool {
    if let Some(ref term) = f.search {
        let hit = contains_ci(&m.full_name, term)
            || opt_contains_ci(m.email.as_deref(), term)
            || opt_contains_ci(m.phone.as_deref(), term)
            || opt_contains_ci(m.profession.as_deref(), term)
            || opt_contains_ci(m.id_number.as_deref(), term);
        if !hit {
            return false;
        }
    }
    if let Some(ref gender) = f.gender {
        if m.gender.as_deref() != Some(gender.as_str()) {
            return false;
        }
    }
    if let Some(ref department) = f.department {
        if !m.departments.iter().any(|d| d == department) {
            return false;
        }
    }
    if let Some(ref position) = f.position {
        if !m.positions.iter().any(|p| p == position) {
            return false;
        }
    }
    true
}

fn equipment_matches(e: &EquipmentRecord, f: &EquipmentFilter) -> bool {
    if let Some(ref term) = f.search {
        let hit = contains_ci(&e.name, term)
            || opt_contains_ci(e.serial_number.as_deref(), term)
            || opt_contains_ci(e.model_number.as_deref(), term)
            || opt_contains_ci(e.manufacturer.as_deref(), term);
        if !hit {
            return false;
        }
    }
    if let Some(ref category) = f.category {
        if e.category.as_deref() != Some(category.as_str()) {
            return false;
        }
    }
    if let Some(status) = f.status {
        if e.status != status {
            return false;
        }
    }
    if let Some(ref location) = f.location {
        if e.location.as_deref() != Some(location.as_str()) {
            return false;
        }
    }
    if let Some(ref assigned_to) = f.assigned_to {
        if e.assigned_to.as_deref() != Some(assigned_to.as_str()) {
            return false;
        }
    }
    true
}

fn event_matches(e: &EventRecord, f: &EventFilter) -> bool {
    if f.published_only && !e.is_published {
        return false;
    }
    if let Some(ref term) = f.search {
        let hit = contains_ci(&e.title, term) || opt_contains_ci(e.content.as_deref(), term);
        if !hit {
            return false;
        }
    }
    if let Some(ref kind) = f.kind {
        if &e.kind != kind {
            return false;
        }
    }
    if let Some(ref category) = f.category {
        if e.category.as_deref() != Some(category.as_str()) {
            return false;
        }
    }
    if let Some(featured) = f.featured {
        if e.is_featured != featured {
            return false;
        }
    }
    if f.upcoming {
        let today = Utc::now().date_naive();
        let starts_later = e.event_start_date.map(|d| d >= today).unwrap_or(false);
        if !(e.kind == "event" && starts_later) {
            return false;
        }
    }
    true
}

fn payment_matches(p: &PaymentRecord, f: &PaymentFilter) -> bool {
    if let Some(ref term) = f.search {
        let hit = contains_ci(&p.full_name, term)
            || contains_ci(&p.receipt_number, term)
            || opt_contains_ci(p.email.as_deref(), term)
            || opt_contains_ci(p.phone.as_deref(), term);
        if !hit {
            return false;
        }
    }
    if let Some(ref reason) = f.reason {
        if &p.reason != reason {
            return false;
        }
    }
    if let Some(ref method) = f.payment_method {
        if &p.payment_method != method {
            return false;
        }
    }
    if let Some(from) = f.from_date {
        if p.payment_date < from {
            return false;
        }
    }
    if let Some(to) = f.to_date {
        if p.payment_date > to {
            return false;
        }
    }
    true
}

// =========================================================
// Members
// =========================================================

#[async_trait]
impl MemberStore for MemoryStore {
    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: Page,
    ) -> StoreResult<Vec<MemberRecord>> {
        let state = self.state.read();
        let mut rows: Vec<MemberRecord> = state
            .members
            .values()
            .filter(|m| member_matches(m, filter))
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.full_name.to_lowercase());
        Ok(paginate(rows, page))
    }

    async fn count_members(&self, filter: &MemberFilter) -> StoreResult<u64> {
        let state = self.state.read();
        Ok(state
            .members
            .values()
            .filter(|m| member_matches(m, filter))
            .count() as u64)
    }

    async fn get_member(&self, id: Uuid) -> StoreResult<Option<MemberRecord>> {
        Ok(self.state.read().members.get(&id).cloned())
    }

    async fn insert_member(&self, create: MemberCreate) -> StoreResult<MemberRecord> {
        let record = create.into_record(Uuid::new_v4(), Utc::now());
        self.state.write().members.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_member(
        &self,
        id: Uuid,
        patch: MemberPatch,
    ) -> StoreResult<Option<MemberRecord>> {
        let mut state = self.state.write();
        let Some(record) = state.members.get_mut(&id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply(record);
            record.updated_at = Utc::now();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_member(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().members.remove(&id).is_some())
    }
}

// =========================================================
// Equipment
// =========================================================

#[async_trait]
impl EquipmentStore for MemoryStore {
    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
        page: Page,
    ) -> StoreResult<Vec<EquipmentRecord>> {
        let state = self.state.read();
        let mut rows: Vec<EquipmentRecord> = state
            .equipment
            .values()
            .filter(|e| equipment_matches(e, filter))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.name.to_lowercase());
        Ok(paginate(rows, page))
    }

    async fn count_equipment(&self, filter: &EquipmentFilter) -> StoreResult<u64> {
        let state = self.state.read();
        Ok(state
            .equipment
            .values()
            .filter(|e| equipment_matches(e, filter))
            .count() as u64)
    }

    async fn get_equipment(&self, id: Uuid) -> StoreResult<Option<EquipmentRecord>> {
        Ok(self.state.read().equipment.get(&id).cloned())
    }

    async fn insert_equipment(&self, create: EquipmentCreate) -> StoreResult<EquipmentRecord> {
        let record = create.into_record(Uuid::new_v4(), Utc::now());
        self.state
            .write()
            .equipment
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_equipment(
        &self,
        id: Uuid,
        patch: EquipmentPatch,
    ) -> StoreResult<Option<EquipmentRecord>> {
        let mut state = self.state.write();
        let Some(record) = state.equipment.get_mut(&id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply(record);
            record.updated_at = Utc::now();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_equipment(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().equipment.remove(&id).is_some())
    }
}

// =========================================================
// Events + RSVPs
// =========================================================

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(
        &self,
        filter: &EventFilter,
        page: Page,
    ) -> StoreResult<Vec<EventRecord>> {
        let state = self.state.read();
        let mut rows: Vec<EventRecord> = state
            .events
            .values()
            .filter(|e| event_matches(e, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(paginate(rows, page))
    }

    async fn count_events(&self, filter: &EventFilter) -> StoreResult<u64> {
        let state = self.state.read();
        Ok(state
            .events
            .values()
            .filter(|e| event_matches(e, filter))
            .count() as u64)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<EventRecord>> {
        Ok(self.state.read().events.get(&id).cloned())
    }

    async fn increment_event_views(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write();
        match state.events.get_mut(&id) {
            Some(event) => {
                event.views += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_event(&self, create: EventCreate) -> StoreResult<EventRecord> {
        let record = create.into_record(Uuid::new_v4(), Utc::now());
        self.state.write().events.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_event(
        &self,
        id: Uuid,
        patch: EventPatch,
    ) -> StoreResult<Option<EventRecord>> {
        let mut state = self.state.write();
        let Some(record) = state.events.get_mut(&id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply(record);
            record.updated_at = Utc::now();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().events.remove(&id).is_some())
    }

    async fn list_rsvps(&self, event_id: Uuid) -> StoreResult<Vec<RsvpRecord>> {
        let state = self.state.read();
        let mut rows: Vec<RsvpRecord> = state
            .rsvps
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn count_rsvps(&self, event_id: Uuid) -> StoreResult<u64> {
        let state = self.state.read();
        Ok(state
            .rsvps
            .values()
            .filter(|r| r.event_id == event_id)
            .count() as u64)
    }

    async fn count_all_rsvps(&self) -> StoreResult<u64> {
        Ok(self.state.read().rsvps.len() as u64)
    }

    async fn insert_rsvp(&self, create: RsvpCreate) -> StoreResult<RsvpRecord> {
        let record = create.into_record(Uuid::new_v4(), Utc::now());
        self.state.write().rsvps.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_rsvp(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().rsvps.remove(&id).is_some())
    }

    async fn delete_event_rsvps(&self, event_id: Uuid) -> StoreResult<u64> {
        let mut state = self.state.write();
        let doomed: Vec<Uuid> = state
            .rsvps
            .values()
            .filter(|r| r.event_id == event_id)
            .map(|r| r.id)
            .collect();
        for id in &doomed {
            state.rsvps.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

// =========================================================
// Payments
// =========================================================

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        page: Page,
    ) -> StoreResult<Vec<PaymentRecord>> {
        let state = self.state.read();
        let mut rows: Vec<PaymentRecord> = state
            .payments
            .values()
            .filter(|p| payment_matches(p, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.payment_date
                .cmp(&a.payment_date)
                .then(b.payment_time.cmp(&a.payment_time))
        });
        Ok(paginate(rows, page))
    }

    async fn count_payments(&self, filter: &PaymentFilter) -> StoreResult<u64> {
        let state = self.state.read();
        Ok(state
            .payments
            .values()
            .filter(|p| payment_matches(p, filter))
            .count() as u64)
    }

    async fn get_payment(&self, id: Uuid) -> StoreResult<Option<PaymentRecord>> {
        Ok(self.state.read().payments.get(&id).cloned())
    }

    async fn insert_payment(&self, create: PaymentCreate) -> StoreResult<PaymentRecord> {
        let mut state = self.state.write();
        // Sequence draw and insert happen under the same lock, so receipt
        // numbers are unique and monotonic.
        state.receipt_seq += 1;
        let receipt_number = format!("{:07}", state.receipt_seq);
        let record = create.into_record(Uuid::new_v4(), receipt_number, Utc::now());
        state.payments.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_payment(
        &self,
        id: Uuid,
        patch: PaymentPatch,
    ) -> StoreResult<Option<PaymentRecord>> {
        let mut state = self.state.write();
        let Some(record) = state.payments.get_mut(&id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply(record);
            record.updated_at = Utc::now();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_payment(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().payments.remove(&id).is_some())
    }

    async fn latest_receipt_number(&self) -> StoreResult<Option<String>> {
        let state = self.state.read();
        Ok(state
            .payments
            .values()
            .map(|p| p.receipt_number.clone())
            .max())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
