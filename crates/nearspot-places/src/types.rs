//! Wire types for the Google Places and Yelp Fusion responses.
//!
//! Only the fields the API layer reshapes are modeled; everything else in
//! the provider payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as Google serializes it (`lat`/`lng`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleGeometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GooglePhoto {
    pub photo_reference: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Opening-hours block. List responses only carry `open_now`; detail
/// responses add the human-readable `weekday_text` the status evaluator
/// consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// One entry of a nearby-search result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GooglePlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: GoogleGeometry,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<GooglePhoto>,
    #[serde(default)]
    pub opening_hours: Option<GoogleOpeningHours>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleReview {
    pub author_name: String,
    pub rating: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub relative_time_description: Option<String>,
}

/// The full record returned by a place-details lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GooglePlaceDetails {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: GoogleGeometry,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<GooglePhoto>,
    #[serde(default)]
    pub opening_hours: Option<GoogleOpeningHours>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub reviews: Vec<GoogleReview>,
}

/// One autocomplete prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacePrediction {
    pub description: String,
    pub place_id: String,
}

/// A geocoding hit resolved to a coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub formatted_address: String,
    pub location: LatLng,
}

/// Travel summary extracted from the first route leg of a directions lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsSummary {
    pub duration_text: String,
    #[serde(default)]
    pub distance_text: Option<String>,
}

// ---------------------------------------------------------------------------
// Envelope types (not exported): Google wraps everything in a status body.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleListResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GooglePlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleDetailsResponse {
    pub status: String,
    pub result: Option<GooglePlaceDetails>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleAutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<PlacePrediction>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsLeg {
    pub duration: DirectionsText,
    #[serde(default)]
    pub distance: Option<DirectionsText>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsText {
    pub text: String,
}

// ---------------------------------------------------------------------------
// Yelp Fusion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YelpCategory {
    pub alias: String,
    pub title: String,
}

/// One business from a Yelp Fusion search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YelpBusiness {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<YelpCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct YelpSearchResponse {
    #[serde(default)]
    pub businesses: Vec<YelpBusiness>,
}
