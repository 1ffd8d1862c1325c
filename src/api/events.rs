//! Events/notices board types and data shaping.
//!
//! Events carry schedule and location fields, media references, publish
//! flags, and a server-maintained view counter, plus a dependent RSVP
//! collection. Unlike the directory, partial updates strip nulls: an
//! explicit null means "leave unchanged".

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{blank_to_none, iso_date, iso_datetime, iso_time, non_blank, Page};

/// Default page size for event listings.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Maximum page size for event listings.
pub const MAX_PAGE_SIZE: usize = 100;

/// MIME types accepted by the image upload endpoint.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Upload size ceiling (10 MB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

fn default_kind() -> String {
    "event".to_string()
}

fn default_true() -> bool {
    true
}

fn default_guests() -> u32 {
    1
}

// =========================================================
// Stored representations
// =========================================================

/// An event/notice as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    /// "event" or "notice"; serialized on the wire as `type`.
    pub kind: String,
    pub category: Option<String>,
    pub event_start_date: Option<NaiveDate>,
    pub event_end_date: Option<NaiveDate>,
    pub event_start_time: Option<NaiveTime>,
    pub event_end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub is_online: bool,
    pub online_url: Option<String>,
    pub featured_image: Option<String>,
    pub gallery_images: Option<Vec<String>>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub views: u64,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An attendee response owned by an event.
#[derive(Debug, Clone, PartialEq)]
pub struct RsvpRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub guests: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// Requests
// =========================================================

/// Create request body. `title` is the only required field.
#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub event_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default)]
    pub event_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub online_url: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub gallery_images: Option<Vec<String>>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl EventCreate {
    /// Build the stored record. The publish timestamp and view counter are
    /// server-assigned at creation.
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> EventRecord {
        EventRecord {
            id,
            title: self.title,
            content: blank_to_none(self.content),
            excerpt: blank_to_none(self.excerpt),
            kind: self.kind,
            category: blank_to_none(self.category),
            event_start_date: self.event_start_date,
            event_end_date: self.event_end_date,
            event_start_time: self.event_start_time,
            event_end_time: self.event_end_time,
            all_day: self.all_day,
            location: blank_to_none(self.location),
            venue: blank_to_none(self.venue),
            address: blank_to_none(self.address),
            is_online: self.is_online,
            online_url: blank_to_none(self.online_url),
            featured_image: blank_to_none(self.featured_image),
            gallery_images: self.gallery_images,
            author_name: blank_to_none(self.author_name),
            author_email: blank_to_none(self.author_email),
            is_published: self.is_published,
            is_featured: self.is_featured,
            views: 0,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update body with strip-null semantics: absent, null, and blank
/// values all leave the stored field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub event_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default)]
    pub event_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub all_day: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_online: Option<bool>,
    #[serde(default)]
    pub online_url: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub gallery_images: Option<Vec<String>>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

impl EventPatch {
    /// True when the patch carries no effective change.
    pub fn is_empty(&self) -> bool {
        non_blank(self.title.clone()).is_none()
            && non_blank(self.content.clone()).is_none()
            && non_blank(self.excerpt.clone()).is_none()
            && non_blank(self.kind.clone()).is_none()
            && non_blank(self.category.clone()).is_none()
            && self.event_start_date.is_none()
            && self.event_end_date.is_none()
            && self.event_start_time.is_none()
            && self.event_end_time.is_none()
            && self.all_day.is_none()
            && non_blank(self.location.clone()).is_none()
            && non_blank(self.venue.clone()).is_none()
            && non_blank(self.address.clone()).is_none()
            && self.is_online.is_none()
            && non_blank(self.online_url.clone()).is_none()
            && non_blank(self.featured_image.clone()).is_none()
            && self.gallery_images.is_none()
            && non_blank(self.author_name.clone()).is_none()
            && non_blank(self.author_email.clone()).is_none()
            && self.is_published.is_none()
            && self.is_featured.is_none()
    }

    /// Apply the patch to a stored record.
    pub fn apply(self, record: &mut EventRecord) {
        if let Some(title) = non_blank(self.title) {
            record.title = title;
        }
        if let Some(content) = non_blank(self.content) {
            record.content = Some(content);
        }
        if let Some(excerpt) = non_blank(self.excerpt) {
            record.excerpt = Some(excerpt);
        }
        if let Some(kind) = non_blank(self.kind) {
            record.kind = kind;
        }
        if let Some(category) = non_blank(self.category) {
            record.category = Some(category);
        }
        if let Some(date) = self.event_start_date {
            record.event_start_date = Some(date);
        }
        if let Some(date) = self.event_end_date {
            record.event_end_date = Some(date);
        }
        if let Some(time) = self.event_start_time {
            record.event_start_time = Some(time);
        }
        if let Some(time) = self.event_end_time {
            record.event_end_time = Some(time);
        }
        if let Some(all_day) = self.all_day {
            record.all_day = all_day;
        }
        if let Some(location) = non_blank(self.location) {
            record.location = Some(location);
        }
        if let Some(venue) = non_blank(self.venue) {
            record.venue = Some(venue);
        }
        if let Some(address) = non_blank(self.address) {
            record.address = Some(address);
        }
        if let Some(is_online) = self.is_online {
            record.is_online = is_online;
        }
        if let Some(url) = non_blank(self.online_url) {
            record.online_url = Some(url);
        }
        if let Some(image) = non_blank(self.featured_image) {
            record.featured_image = Some(image);
        }
        if let Some(gallery) = self.gallery_images {
            record.gallery_images = Some(gallery);
        }
        if let Some(author) = non_blank(self.author_name) {
            record.author_name = Some(author);
        }
        if let Some(email) = non_blank(self.author_email) {
            record.author_email = Some(email);
        }
        if let Some(is_published) = self.is_published {
            record.is_published = is_published;
        }
        if let Some(is_featured) = self.is_featured {
            record.is_featured = is_featured;
        }
    }
}

/// RSVP create request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpCreate {
    pub event_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RsvpCreate {
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> RsvpRecord {
        RsvpRecord {
            id,
            event_id: self.event_id,
            name: self.name,
            email: blank_to_none(self.email),
            phone: blank_to_none(self.phone),
            guests: self.guests,
            notes: blank_to_none(self.notes),
            created_at: now,
        }
    }
}

// =========================================================
// Filtering
// =========================================================

/// Filter specification for event queries.
///
/// `search` matches title and content (case-insensitive substring, OR).
/// `upcoming` restricts to events (kind "event") starting today or later.
/// `published_only` is set by the public listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub search: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub upcoming: bool,
    pub published_only: bool,
}

/// Query string for the event listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub upcoming: Option<bool>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl EventListQuery {
    /// Filter for the public listing: only published events are surfaced.
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            search: blank_to_none(self.search.clone()),
            kind: blank_to_none(self.kind.clone()),
            category: blank_to_none(self.category.clone()),
            featured: self.featured,
            upcoming: self.upcoming.unwrap_or(false),
            published_only: true,
        }
    }

    pub fn page(&self) -> Page {
        Page::clamped(self.limit, self.offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

// =========================================================
// Responses
// =========================================================

/// Wire representation of an event, including the derived RSVP count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub event_start_date: Option<String>,
    pub event_end_date: Option<String>,
    pub event_start_time: Option<String>,
    pub event_end_time: Option<String>,
    pub all_day: bool,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub is_online: bool,
    pub online_url: Option<String>,
    pub featured_image: Option<String>,
    pub gallery_images: Option<Vec<String>>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub views: u64,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
    pub rsvp_count: u64,
}

impl EventResponse {
    pub fn from_record(record: &EventRecord, rsvp_count: u64) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            content: record.content.clone(),
            excerpt: record.excerpt.clone(),
            kind: record.kind.clone(),
            category: record.category.clone(),
            event_start_date: iso_date(record.event_start_date),
            event_end_date: iso_date(record.event_end_date),
            event_start_time: iso_time(record.event_start_time),
            event_end_time: iso_time(record.event_end_time),
            all_day: record.all_day,
            location: record.location.clone(),
            venue: record.venue.clone(),
            address: record.address.clone(),
            is_online: record.is_online,
            online_url: record.online_url.clone(),
            featured_image: record.featured_image.clone(),
            gallery_images: record.gallery_images.clone(),
            author_name: record.author_name.clone(),
            author_email: record.author_email.clone(),
            is_published: record.is_published,
            is_featured: record.is_featured,
            views: record.views,
            published_at: iso_datetime(record.published_at),
            created_at: iso_datetime(record.created_at),
            updated_at: iso_datetime(record.updated_at),
            rsvp_count,
        }
    }
}

/// Wire representation of an RSVP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpResponse {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub guests: u32,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<&RsvpRecord> for RsvpResponse {
    fn from(record: &RsvpRecord) -> Self {
        Self {
            id: record.id.to_string(),
            event_id: record.event_id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            guests: record.guests,
            notes: record.notes.clone(),
            created_at: iso_datetime(record.created_at),
        }
    }
}

/// Response body for a successful image upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub url: String,
    pub filename: String,
}

// =========================================================
// Image naming
// =========================================================

/// Lowercased extension of an uploaded filename, with the leading dot.
/// Falls back to `.jpg` when the name carries no extension.
pub fn image_extension(original: &str) -> String {
    std::path::Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_else(|| ".jpg".to_string())
}

/// Collision-resistant stored name: random token plus original extension.
pub fn unique_image_name(original: &str) -> String {
    format!("{}{}", Uuid::new_v4(), image_extension(original))
}

// =========================================================
// Stats
// =========================================================

/// Events overview aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStats {
    pub total_events: u64,
    pub published_events: u64,
    pub upcoming_events: u64,
    pub total_rsvps: u64,
}

/// Aggregate event stats over an already-fetched record set.
pub fn event_stats(events: &[EventRecord], total_rsvps: u64, today: NaiveDate) -> EventStats {
    EventStats {
        total_events: events.len() as u64,
        published_events: events.iter().filter(|e| e.is_published).count() as u64,
        upcoming_events: events
            .iter()
            .filter(|e| {
                e.is_published
                    && e.kind == "event"
                    && e.event_start_date.map(|d| d >= today).unwrap_or(false)
            })
            .count() as u64,
        total_rsvps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_event(title: &str) -> EventRecord {
        let create: EventCreate =
            serde_json::from_value(serde_json::json!({ "title": title })).unwrap();
        create.into_record(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_kind_uses_type_on_the_wire() {
        let create: EventCreate = serde_json::from_value(serde_json::json!({
            "title": "Harvest Sunday",
            "type": "notice"
        }))
        .unwrap();
        assert_eq!(create.kind, "notice");

        let record = sample_event("Harvest Sunday");
        let response = EventResponse::from_record(&record, 0);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "event");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_create_defaults() {
        let record = sample_event("Harvest Sunday");
        assert!(record.is_published);
        assert!(!record.is_featured);
        assert!(!record.all_day);
        assert_eq!(record.views, 0);
        assert_eq!(record.kind, "event");
    }

    #[test]
    fn test_patch_strips_nulls_and_blanks() {
        let mut record = sample_event("Harvest Sunday");
        record.content = Some("All welcome".to_string());

        let patch: EventPatch = serde_json::from_str(
            r#"{"content": null, "excerpt": "", "venue": "Main hall", "is_featured": true}"#,
        )
        .unwrap();
        patch.apply(&mut record);

        // Null and blank both leave the stored value alone.
        assert_eq!(record.content.as_deref(), Some("All welcome"));
        assert_eq!(record.excerpt, None);
        assert_eq!(record.venue.as_deref(), Some("Main hall"));
        assert!(record.is_featured);
    }

    #[test]
    fn test_all_null_patch_is_empty() {
        let patch: EventPatch =
            serde_json::from_str(r#"{"title": null, "content": null}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("photo.PNG"), ".png");
        assert_eq!(image_extension("picture.jpeg"), ".jpeg");
        assert_eq!(image_extension("archive.tar.gz"), ".gz");
        assert_eq!(image_extension("noext"), ".jpg");
        assert_eq!(image_extension(""), ".jpg");
    }

    #[test]
    fn test_unique_image_name_keeps_extension() {
        let name = unique_image_name("banner.webp");
        assert!(name.ends_with(".webp"));
        assert_ne!(unique_image_name("a.png"), unique_image_name("a.png"));
    }

    #[test]
    fn test_event_stats() {
        let today = ymd(2025, 3, 9);

        let mut upcoming = sample_event("Conference");
        upcoming.event_start_date = Some(ymd(2025, 4, 1));

        let mut past = sample_event("Old crusade");
        past.event_start_date = Some(ymd(2024, 1, 1));

        let mut draft = sample_event("Draft notice");
        draft.kind = "notice".to_string();
        draft.is_published = false;

        let stats = event_stats(&[upcoming, past, draft], 7, today);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.published_events, 2);
        assert_eq!(stats.upcoming_events, 1);
        assert_eq!(stats.total_rsvps, 7);
    }
}
