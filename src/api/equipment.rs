//! Equipment inventory types and data shaping.
//!
//! The register tracks physical assets: identifiers, lifecycle status,
//! condition, purchase and maintenance dates, monetary value, and assignment.
//! Status drives the stats bucketing. Like the directory, partial updates
//! preserve explicit nulls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{blank_to_none, iso_date, iso_datetime, round_cents, Page, Patch};

/// Default page size for inventory listings.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Maximum page size for inventory listings.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Days ahead considered "maintenance due soon" by the stats endpoint.
pub const MAINTENANCE_WINDOW_DAYS: i64 = 30;

/// Lifecycle status of an equipment item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
    Damaged,
}

fn default_condition() -> String {
    "good".to_string()
}

// =========================================================
// Stored representation
// =========================================================

/// An equipment item as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer: Option<String>,
    pub status: EquipmentStatus,
    pub condition: String,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =========================================================
// Requests
// =========================================================

/// Create request body. `name` is the only required field.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub status: EquipmentStatus,
    #[serde(default = "default_condition")]
    pub condition: String,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub last_maintenance: Option<NaiveDate>,
    #[serde(default)]
    pub next_maintenance: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EquipmentCreate {
    /// Build the stored record, normalizing blank text to absent and
    /// rounding the purchase price to cents.
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> EquipmentRecord {
        EquipmentRecord {
            id,
            name: self.name,
            description: blank_to_none(self.description),
            category: blank_to_none(self.category),
            serial_number: blank_to_none(self.serial_number),
            model_number: blank_to_none(self.model_number),
            manufacturer: blank_to_none(self.manufacturer),
            status: self.status,
            condition: self.condition,
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price.map(round_cents),
            supplier: blank_to_none(self.supplier),
            location: blank_to_none(self.location),
            assigned_to: blank_to_none(self.assigned_to),
            last_maintenance: self.last_maintenance,
            next_maintenance: self.next_maintenance,
            notes: blank_to_none(self.notes),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update body. Absent fields are untouched; explicit nulls clear
/// the nullable fields. Status and condition are non-nullable and only
/// replaced when a value is sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub serial_number: Patch<String>,
    #[serde(default)]
    pub model_number: Patch<String>,
    #[serde(default)]
    pub manufacturer: Patch<String>,
    #[serde(default)]
    pub status: Option<EquipmentStatus>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub purchase_date: Patch<NaiveDate>,
    #[serde(default)]
    pub purchase_price: Patch<f64>,
    #[serde(default)]
    pub supplier: Patch<String>,
    #[serde(default)]
    pub location: Patch<String>,
    #[serde(default)]
    pub assigned_to: Patch<String>,
    #[serde(default)]
    pub last_maintenance: Patch<NaiveDate>,
    #[serde(default)]
    pub next_maintenance: Patch<NaiveDate>,
    #[serde(default)]
    pub notes: Patch<String>,
}

impl EquipmentPatch {
    /// True when the patch carries no effective change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_absent()
            && self.category.is_absent()
            && self.serial_number.is_absent()
            && self.model_number.is_absent()
            && self.manufacturer.is_absent()
            && self.status.is_none()
            && self.condition.is_none()
            && self.purchase_date.is_absent()
            && self.purchase_price.is_absent()
            && self.supplier.is_absent()
            && self.location.is_absent()
            && self.assigned_to.is_absent()
            && self.last_maintenance.is_absent()
            && self.next_maintenance.is_absent()
            && self.notes.is_absent()
    }

    /// Apply the patch to a stored record.
    pub fn apply(self, record: &mut EquipmentRecord) {
        if let Some(name) = blank_to_none(self.name) {
            record.name = name;
        }
        self.description.apply_text(&mut record.description);
        self.category.apply_text(&mut record.category);
        self.serial_number.apply_text(&mut record.serial_number);
        self.model_number.apply_text(&mut record.model_number);
        self.manufacturer.apply_text(&mut record.manufacturer);
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(condition) = blank_to_none(self.condition) {
            record.condition = condition;
        }
        self.purchase_date.apply(&mut record.purchase_date);
        match self.purchase_price {
            Patch::Absent => {}
            Patch::Null => record.purchase_price = None,
            Patch::Value(price) => record.purchase_price = Some(round_cents(price)),
        }
        self.supplier.apply_text(&mut record.supplier);
        self.location.apply_text(&mut record.location);
        self.assigned_to.apply_text(&mut record.assigned_to);
        self.last_maintenance.apply(&mut record.last_maintenance);
        self.next_maintenance.apply(&mut record.next_maintenance);
        self.notes.apply_text(&mut record.notes);
    }
}

// =========================================================
// Filtering
// =========================================================

/// Filter specification for inventory queries.
///
/// `search` matches name, serial number, model number, and manufacturer
/// (case-insensitive substring, OR); the remaining fields are exact matches
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
}

/// Query string for list/count endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<EquipmentStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl EquipmentListQuery {
    pub fn filter(&self) -> EquipmentFilter {
        EquipmentFilter {
            search: blank_to_none(self.search.clone()),
            category: blank_to_none(self.category.clone()),
            status: self.status,
            location: blank_to_none(self.location.clone()),
            assigned_to: blank_to_none(self.assigned_to.clone()),
        }
    }

    pub fn page(&self) -> Page {
        Page::clamped(self.limit, self.offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

// =========================================================
// Responses
// =========================================================

/// Wire representation of an equipment item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub manufacturer: Option<String>,
    pub status: EquipmentStatus,
    pub condition: String,
    pub purchase_date: Option<String>,
    pub purchase_price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
    pub last_maintenance: Option<String>,
    pub next_maintenance: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&EquipmentRecord> for EquipmentResponse {
    fn from(record: &EquipmentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            serial_number: record.serial_number.clone(),
            model_number: record.model_number.clone(),
            manufacturer: record.manufacturer.clone(),
            status: record.status,
            condition: record.condition.clone(),
            purchase_date: iso_date(record.purchase_date),
            purchase_price: record.purchase_price,
            supplier: record.supplier.clone(),
            location: record.location.clone(),
            assigned_to: record.assigned_to.clone(),
            last_maintenance: iso_date(record.last_maintenance),
            next_maintenance: iso_date(record.next_maintenance),
            notes: record.notes.clone(),
            created_at: iso_datetime(record.created_at),
            updated_at: iso_datetime(record.updated_at),
        }
    }
}

// =========================================================
// Stats
// =========================================================

/// Inventory overview aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStats {
    pub total: u64,
    pub available: u64,
    pub in_use: u64,
    pub maintenance: u64,
    pub damaged: u64,
    pub need_maintenance_soon: u64,
    pub total_value: f64,
}

/// Aggregate inventory stats over an already-fetched record set.
pub fn equipment_stats(items: &[EquipmentRecord], today: NaiveDate) -> EquipmentStats {
    let status_count = |s: EquipmentStatus| items.iter().filter(|e| e.status == s).count() as u64;

    let need_maintenance_soon = items
        .iter()
        .filter(|e| {
            e.next_maintenance
                .map(|due| {
                    let days_until = (due - today).num_days();
                    (0..=MAINTENANCE_WINDOW_DAYS).contains(&days_until)
                })
                .unwrap_or(false)
        })
        .count() as u64;

    let total_value = round_cents(items.iter().filter_map(|e| e.purchase_price).sum());

    EquipmentStats {
        total: items.len() as u64,
        available: status_count(EquipmentStatus::Available),
        in_use: status_count(EquipmentStatus::InUse),
        maintenance: status_count(EquipmentStatus::Maintenance),
        damaged: status_count(EquipmentStatus::Damaged),
        need_maintenance_soon,
        total_value,
    }
}
