//! Wire types for the Ticketmaster Discovery and Eventbrite responses.
//!
//! Only the fields the API layer reshapes are modeled; the rest of the
//! provider payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ticketmaster Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmVenue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<TmAddress>,
    #[serde(default)]
    pub city: Option<TmNamed>,
    #[serde(default)]
    pub country: Option<TmNamed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmAddress {
    #[serde(default)]
    pub line1: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmNamed {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmDates {
    #[serde(default)]
    pub start: Option<TmStart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmStart {
    #[serde(default, rename = "localDate")]
    pub local_date: Option<String>,
    #[serde(default, rename = "localTime")]
    pub local_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmClassification {
    #[serde(default)]
    pub segment: Option<TmNamed>,
}

/// One event from a Discovery API search or detail lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmEvent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Vec<TmImage>,
    #[serde(default)]
    pub dates: Option<TmDates>,
    #[serde(default)]
    pub classifications: Vec<TmClassification>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<TmEventEmbedded>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmEventEmbedded {
    #[serde(default)]
    pub venues: Vec<TmVenue>,
}

impl TmEvent {
    /// The first venue, if the response embedded any.
    #[must_use]
    pub fn venue(&self) -> Option<&TmVenue> {
        self.embedded.as_ref().and_then(|e| e.venues.first())
    }

    /// The segment name of the first classification (e.g. `"Music"`).
    #[must_use]
    pub fn segment_name(&self) -> Option<&str> {
        self.classifications
            .first()
            .and_then(|c| c.segment.as_ref())
            .and_then(|s| s.name.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmSearchResponse {
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<TmSearchEmbedded>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TmSearchEmbedded {
    #[serde(default)]
    pub events: Vec<TmEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmFaultResponse {
    pub fault: Option<TmFault>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmFault {
    #[serde(default)]
    pub faultstring: Option<String>,
}

// ---------------------------------------------------------------------------
// Eventbrite
// ---------------------------------------------------------------------------

/// Eventbrite's `{ "text": ..., "html": ... }` rich-text wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EbText {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EbWhen {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub utc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbVenue {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbCategory {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbLogo {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbOrganizer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<EbText>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo: Option<EbLogo>,
}

/// One Eventbrite event, with venue/category expanded when requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbEvent {
    pub id: String,
    #[serde(default)]
    pub name: Option<EbText>,
    #[serde(default)]
    pub description: Option<EbText>,
    #[serde(default)]
    pub start: Option<EbWhen>,
    #[serde(default)]
    pub end: Option<EbWhen>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub logo: Option<EbLogo>,
    #[serde(default)]
    pub venue: Option<EbVenue>,
    #[serde(default)]
    pub category: Option<EbCategory>,
    #[serde(default)]
    pub organizer: Option<EbOrganizer>,
    #[serde(default)]
    pub format: Option<serde_json::Value>,
    #[serde(default)]
    pub is_free: Option<bool>,
    #[serde(default)]
    pub capacity: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbTicketClass {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<serde_json::Value>,
    #[serde(default)]
    pub fee: Option<serde_json::Value>,
    #[serde(default)]
    pub quantity_total: Option<u64>,
    #[serde(default)]
    pub quantity_sold: Option<u64>,
    #[serde(default)]
    pub sales_end: Option<String>,
    #[serde(default)]
    pub free: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EbSearchResponse {
    #[serde(default)]
    pub events: Vec<EbEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EbTicketClassesResponse {
    #[serde(default)]
    pub ticket_classes: Vec<EbTicketClass>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EbAttendeesResponse {
    #[serde(default)]
    pub attendees: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EbErrorResponse {
    #[serde(default)]
    pub error_description: Option<String>,
}
