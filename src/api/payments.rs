//! Payments/receipting ledger types and data shaping.
//!
//! Every payment carries payer details, an amount, a reason and method, the
//! payment date/time, the recording officer, and a server-assigned receipt
//! number issued by the store's sequence. Partial updates strip nulls, like
//! the events module.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{blank_to_none, iso_datetime, iso_time, non_blank, round_cents, Page};

/// Default page size for ledger listings.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Maximum page size for ledger listings.
pub const MAX_PAGE_SIZE: usize = 100;

/// Receipt probe result when the ledger is empty.
pub const EMPTY_LEDGER_RECEIPT: &str = "0000000";

// =========================================================
// Stored representation
// =========================================================

/// A payment as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    /// Zero-padded sequence number; uniqueness and ordering come from the
    /// store's sequence, never from the client.
    pub receipt_number: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub reason: String,
    pub reason_other: Option<String>,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub payment_date: NaiveDate,
    pub payment_time: NaiveTime,
    pub amount_in_words: Option<String>,
    pub received_by: String,
    pub notes: Option<String>,
    pub church_name: Option<String>,
    pub church_address: Option<String>,
    pub church_phone: Option<String>,
    pub church_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =========================================================
// Requests
// =========================================================

fn default_currency() -> String {
    "USD".to_string()
}

/// Create request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCreate {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub reason: String,
    #[serde(default)]
    pub reason_other: Option<String>,
    pub payment_method: String,
    #[serde(default)]
    pub payment_reference: Option<String>,
    pub payment_date: NaiveDate,
    pub payment_time: NaiveTime,
    #[serde(default)]
    pub amount_in_words: Option<String>,
    pub received_by: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub church_name: Option<String>,
    #[serde(default)]
    pub church_address: Option<String>,
    #[serde(default)]
    pub church_phone: Option<String>,
    #[serde(default)]
    pub church_email: Option<String>,
}

impl PaymentCreate {
    /// Build the stored record with the server-assigned id and receipt
    /// number, rounding the amount to cents.
    pub fn into_record(
        self,
        id: Uuid,
        receipt_number: String,
        now: DateTime<Utc>,
    ) -> PaymentRecord {
        PaymentRecord {
            id,
            receipt_number,
            full_name: self.full_name,
            email: blank_to_none(self.email),
            phone: blank_to_none(self.phone),
            address: blank_to_none(self.address),
            amount: round_cents(self.amount),
            currency: self.currency,
            reason: self.reason,
            reason_other: blank_to_none(self.reason_other),
            payment_method: self.payment_method,
            payment_reference: blank_to_none(self.payment_reference),
            payment_date: self.payment_date,
            payment_time: self.payment_time,
            amount_in_words: blank_to_none(self.amount_in_words),
            received_by: self.received_by,
            notes: blank_to_none(self.notes),
            church_name: blank_to_none(self.church_name),
            church_address: blank_to_none(self.church_address),
            church_phone: blank_to_none(self.church_phone),
            church_email: blank_to_none(self.church_email),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update body with strip-null semantics. The receipt number is not
/// updatable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reason_other: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_time: Option<NaiveTime>,
    #[serde(default)]
    pub amount_in_words: Option<String>,
    #[serde(default)]
    pub received_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentPatch {
    /// True when the patch carries no effective change.
    pub fn is_empty(&self) -> bool {
        non_blank(self.full_name.clone()).is_none()
            && non_blank(self.email.clone()).is_none()
            && non_blank(self.phone.clone()).is_none()
            && non_blank(self.address.clone()).is_none()
            && self.amount.is_none()
            && non_blank(self.currency.clone()).is_none()
            && non_blank(self.reason.clone()).is_none()
            && non_blank(self.reason_other.clone()).is_none()
            && non_blank(self.payment_method.clone()).is_none()
            && non_blank(self.payment_reference.clone()).is_none()
            && self.payment_date.is_none()
            && self.payment_time.is_none()
            && non_blank(self.amount_in_words.clone()).is_none()
            && non_blank(self.received_by.clone()).is_none()
            && non_blank(self.notes.clone()).is_none()
    }

    /// Apply the patch to a stored record.
    pub fn apply(self, record: &mut PaymentRecord) {
        if let Some(name) = non_blank(self.full_name) {
            record.full_name = name;
        }
        if let Some(email) = non_blank(self.email) {
            record.email = Some(email);
        }
        if let Some(phone) = non_blank(self.phone) {
            record.phone = Some(phone);
        }
        if let Some(address) = non_blank(self.address) {
            record.address = Some(address);
        }
        if let Some(amount) = self.amount {
            record.amount = round_cents(amount);
        }
        if let Some(currency) = non_blank(self.currency) {
            record.currency = currency;
        }
        if let Some(reason) = non_blank(self.reason) {
            record.reason = reason;
        }
        if let Some(reason_other) = non_blank(self.reason_other) {
            record.reason_other = Some(reason_other);
        }
        if let Some(method) = non_blank(self.payment_method) {
            record.payment_method = method;
        }
        if let Some(reference) = non_blank(self.payment_reference) {
            record.payment_reference = Some(reference);
        }
        if let Some(date) = self.payment_date {
            record.payment_date = date;
        }
        if let Some(time) = self.payment_time {
            record.payment_time = time;
        }
        if let Some(words) = non_blank(self.amount_in_words) {
            record.amount_in_words = Some(words);
        }
        if let Some(received_by) = non_blank(self.received_by) {
            record.received_by = received_by;
        }
        if let Some(notes) = non_blank(self.notes) {
            record.notes = Some(notes);
        }
    }
}

// =========================================================
// Filtering
// =========================================================

/// Filter specification for ledger queries.
///
/// `search` matches payer name, receipt number, email, and phone
/// (case-insensitive substring, OR); reason and method are exact matches,
/// and the date bounds are inclusive over the payment date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub search: Option<String>,
    pub reason: Option<String>,
    pub payment_method: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Query string for list/count endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl PaymentListQuery {
    pub fn filter(&self) -> PaymentFilter {
        PaymentFilter {
            search: blank_to_none(self.search.clone()),
            reason: blank_to_none(self.reason.clone()),
            payment_method: blank_to_none(self.payment_method.clone()),
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    pub fn page(&self) -> Page {
        Page::clamped(self.limit, self.offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

// =========================================================
// Responses
// =========================================================

/// Wire representation of a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub receipt_number: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub reason: String,
    pub reason_other: Option<String>,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub payment_date: String,
    pub payment_time: String,
    pub amount_in_words: Option<String>,
    pub received_by: String,
    pub notes: Option<String>,
    pub church_name: Option<String>,
    pub church_address: Option<String>,
    pub church_phone: Option<String>,
    pub church_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&PaymentRecord> for PaymentResponse {
    fn from(record: &PaymentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            receipt_number: record.receipt_number.clone(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
            amount: record.amount,
            currency: record.currency.clone(),
            reason: record.reason.clone(),
            reason_other: record.reason_other.clone(),
            payment_method: record.payment_method.clone(),
            payment_reference: record.payment_reference.clone(),
            payment_date: record.payment_date.to_string(),
            payment_time: iso_time(Some(record.payment_time)).unwrap_or_default(),
            amount_in_words: record.amount_in_words.clone(),
            received_by: record.received_by.clone(),
            notes: record.notes.clone(),
            church_name: record.church_name.clone(),
            church_address: record.church_address.clone(),
            church_phone: record.church_phone.clone(),
            church_email: record.church_email.clone(),
            created_at: iso_datetime(record.created_at),
            updated_at: iso_datetime(record.updated_at),
        }
    }
}

// =========================================================
// Stats
// =========================================================

/// Ledger overview aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    pub total: u64,
    pub total_amount: f64,
    pub today_total: f64,
    pub by_reason: BTreeMap<String, f64>,
    pub by_method: BTreeMap<String, f64>,
}

/// Aggregate ledger stats over an already-fetched record set.
pub fn payment_stats(payments: &[PaymentRecord], today: NaiveDate) -> PaymentStats {
    let mut by_reason: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_method: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_amount = 0.0;
    let mut today_total = 0.0;

    for payment in payments {
        total_amount += payment.amount;
        if payment.payment_date == today {
            today_total += payment.amount;
        }
        *by_reason.entry(payment.reason.clone()).or_default() += payment.amount;
        *by_method.entry(payment.payment_method.clone()).or_default() += payment.amount;
    }

    PaymentStats {
        total: payments.len() as u64,
        total_amount: round_cents(total_amount),
        today_total: round_cents(today_total),
        by_reason: by_reason
            .into_iter()
            .map(|(k, v)| (k, round_cents(v)))
            .collect(),
        by_method: by_method
            .into_iter()
            .map(|(k, v)| (k, round_cents(v)))
            .collect(),
    }
}
