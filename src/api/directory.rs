//! Member directory types and data shaping.
//!
//! The directory is the canonical register of congregation members: contact
//! details, demographic and family fields, and free-text department/position
//! labels. Partial updates preserve explicit nulls (a null clears the field).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{blank_to_none, iso_date, iso_datetime, Page, Patch};

/// Default page size for directory listings.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Maximum page size for directory listings.
pub const MAX_PAGE_SIZE: usize = 1000;

// =========================================================
// Stored representation
// =========================================================

/// A member as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub id_number: Option<String>,
    pub profession: Option<String>,
    pub workplace: Option<String>,
    pub address: Option<String>,
    pub home_address: Option<String>,
    pub next_of_kin: Option<String>,
    pub spouse_name: Option<String>,
    pub parents: Option<String>,
    pub departments: Vec<String>,
    pub positions: Vec<String>,
    pub baptism_date: Option<NaiveDate>,
    pub joined_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =========================================================
// Requests
// =========================================================

/// Create request body. `full_name` is the only required field.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberCreate {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub workplace: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub home_address: Option<String>,
    #[serde(default)]
    pub next_of_kin: Option<String>,
    #[serde(default)]
    pub spouse_name: Option<String>,
    #[serde(default)]
    pub parents: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub baptism_date: Option<NaiveDate>,
    #[serde(default)]
    pub joined_date: Option<NaiveDate>,
}

impl MemberCreate {
    /// Build the stored record, normalizing blank text to absent.
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> MemberRecord {
        MemberRecord {
            id,
            full_name: self.full_name,
            email: blank_to_none(self.email),
            phone: blank_to_none(self.phone),
            gender: blank_to_none(self.gender),
            date_of_birth: self.date_of_birth,
            id_number: blank_to_none(self.id_number),
            profession: blank_to_none(self.profession),
            workplace: blank_to_none(self.workplace),
            address: blank_to_none(self.address),
            home_address: blank_to_none(self.home_address),
            next_of_kin: blank_to_none(self.next_of_kin),
            spouse_name: blank_to_none(self.spouse_name),
            parents: blank_to_none(self.parents),
            departments: self.departments,
            positions: self.positions,
            baptism_date: self.baptism_date,
            joined_date: self.joined_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update body. Absent fields are untouched; explicit nulls clear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub phone: Patch<String>,
    #[serde(default)]
    pub gender: Patch<String>,
    #[serde(default)]
    pub date_of_birth: Patch<NaiveDate>,
    #[serde(default)]
    pub id_number: Patch<String>,
    #[serde(default)]
    pub profession: Patch<String>,
    #[serde(default)]
    pub workplace: Patch<String>,
    #[serde(default)]
    pub address: Patch<String>,
    #[serde(default)]
    pub home_address: Patch<String>,
    #[serde(default)]
    pub next_of_kin: Patch<String>,
    #[serde(default)]
    pub spouse_name: Patch<String>,
    #[serde(default)]
    pub parents: Patch<String>,
    #[serde(default)]
    pub departments: Option<Vec<String>>,
    #[serde(default)]
    pub positions: Option<Vec<String>>,
    #[serde(default)]
    pub baptism_date: Patch<NaiveDate>,
    #[serde(default)]
    pub joined_date: Patch<NaiveDate>,
}

impl MemberPatch {
    /// True when the patch carries no effective change.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_absent()
            && self.phone.is_absent()
            && self.gender.is_absent()
            && self.date_of_birth.is_absent()
            && self.id_number.is_absent()
            && self.profession.is_absent()
            && self.workplace.is_absent()
            && self.address.is_absent()
            && self.home_address.is_absent()
            && self.next_of_kin.is_absent()
            && self.spouse_name.is_absent()
            && self.parents.is_absent()
            && self.departments.is_none()
            && self.positions.is_none()
            && self.baptism_date.is_absent()
            && self.joined_date.is_absent()
    }

    /// Apply the patch to a stored record. The required name is only replaced
    /// by a non-blank value.
    pub fn apply(self, record: &mut MemberRecord) {
        if let Some(name) = blank_to_none(self.full_name) {
            record.full_name = name;
        }
        self.email.apply_text(&mut record.email);
        self.phone.apply_text(&mut record.phone);
        self.gender.apply_text(&mut record.gender);
        self.date_of_birth.apply(&mut record.date_of_birth);
        self.id_number.apply_text(&mut record.id_number);
        self.profession.apply_text(&mut record.profession);
        self.workplace.apply_text(&mut record.workplace);
        self.address.apply_text(&mut record.address);
        self.home_address.apply_text(&mut record.home_address);
        self.next_of_kin.apply_text(&mut record.next_of_kin);
        self.spouse_name.apply_text(&mut record.spouse_name);
        self.parents.apply_text(&mut record.parents);
        if let Some(departments) = self.departments {
            record.departments = departments;
        }
        if let Some(positions) = self.positions {
            record.positions = positions;
        }
        self.baptism_date.apply(&mut record.baptism_date);
        self.joined_date.apply(&mut record.joined_date);
    }
}

// =========================================================
// Filtering
// =========================================================

/// Filter specification for directory queries.
///
/// `search` is a case-insensitive substring match across name, email, phone,
/// profession, and id number (OR); the remaining fields are exact matches
/// combined with AND. Department/position match membership in the label list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFilter {
    pub search: Option<String>,
    pub gender: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

/// Query string for list/count endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl MemberListQuery {
    pub fn filter(&self) -> MemberFilter {
        MemberFilter {
            search: blank_to_none(self.search.clone()),
            gender: blank_to_none(self.gender.clone()),
            department: blank_to_none(self.department.clone()),
            position: blank_to_none(self.position.clone()),
        }
    }

    pub fn page(&self) -> Page {
        Page::clamped(self.limit, self.offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

// =========================================================
// Responses
// =========================================================

/// Wire representation of a member. Date fields are ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub id_number: Option<String>,
    pub profession: Option<String>,
    pub workplace: Option<String>,
    pub address: Option<String>,
    pub home_address: Option<String>,
    pub next_of_kin: Option<String>,
    pub spouse_name: Option<String>,
    pub parents: Option<String>,
    pub departments: Vec<String>,
    pub positions: Vec<String>,
    pub baptism_date: Option<String>,
    pub joined_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&MemberRecord> for MemberResponse {
    fn from(record: &MemberRecord) -> Self {
        Self {
            id: record.id.to_string(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            gender: record.gender.clone(),
            date_of_birth: iso_date(record.date_of_birth),
            id_number: record.id_number.clone(),
            profession: record.profession.clone(),
            workplace: record.workplace.clone(),
            address: record.address.clone(),
            home_address: record.home_address.clone(),
            next_of_kin: record.next_of_kin.clone(),
            spouse_name: record.spouse_name.clone(),
            parents: record.parents.clone(),
            departments: record.departments.clone(),
            positions: record.positions.clone(),
            baptism_date: iso_date(record.baptism_date),
            joined_date: iso_date(record.joined_date),
            created_at: iso_datetime(record.created_at),
            updated_at: iso_datetime(record.updated_at),
        }
    }
}

// =========================================================
// Stats
// =========================================================

/// Directory overview aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberStats {
    pub total: u64,
    pub male: u64,
    pub female: u64,
    pub other: u64,
    pub baptised: u64,
    pub with_family: u64,
    pub upcoming_birthdays: u64,
}

/// Aggregate directory stats over an already-fetched record set.
pub fn member_stats(members: &[MemberRecord], today: NaiveDate) -> MemberStats {
    let gender_count = |g: &str| {
        members
            .iter()
            .filter(|m| m.gender.as_deref() == Some(g))
            .count() as u64
    };

    MemberStats {
        total: members.len() as u64,
        male: gender_count("male"),
        female: gender_count("female"),
        other: gender_count("other"),
        baptised: members.iter().filter(|m| m.baptism_date.is_some()).count() as u64,
        with_family: members
            .iter()
            .filter(|m| {
                m.next_of_kin.is_some() || m.spouse_name.is_some() || m.parents.is_some()
            })
            .count() as u64,
        upcoming_birthdays: members
            .iter()
            .filter(|m| {
                m.date_of_birth
                    .map(|dob| birthday_within(dob, today, 30))
                    .unwrap_or(false)
            })
            .count() as u64,
    }
}

/// True when the next anniversary of `dob` falls within `window_days` of
/// `today` (inclusive on both ends). A Feb 29 birthday counts as Mar 1 in
/// non-leap years.
fn birthday_within(dob: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    let next = next_anniversary(dob, today);
    let days_until = (next - today).num_days();
    (0..=window_days).contains(&days_until)
}

fn next_anniversary(dob: NaiveDate, today: NaiveDate) -> NaiveDate {
    let in_year = |year: i32| {
        dob.with_year(year)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 3, 1).unwrap_or(today))
    };
    let this_year = in_year(today.year());
    if this_year >= today {
        this_year
    } else {
        in_year(today.year() + 1)
    }
}
