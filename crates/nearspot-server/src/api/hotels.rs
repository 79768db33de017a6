//! Hotel discovery: Google nearby search (`lodging`) with per-hotel details
//! enrichment, distance-ranked from the query point.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use nearspot_core::geo;
use nearspot_core::hours::{self, OpenStatus};
use nearspot_places::{GooglePlace, GooglePlacesClient, LatLng, NearbySearchParams};

use crate::middleware::RequestId;

use super::restaurants::to_coordinate;
use super::reviews::ReviewItem;
use super::{
    map_db_error, map_places_error, require_configured, require_coords, ApiError, ApiResponse,
    AppState, ResponseMeta,
};

const DEFAULT_RADIUS_M: u32 = 5_000;
const LIST_PHOTO_WIDTH: u32 = 400;
const DETAIL_PHOTO_WIDTH: u32 = 800;
const MAX_LIST_PHOTOS: usize = 3;
const MAX_DETAIL_REVIEWS: usize = 5;

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsQuery {
    /// `lat,lng` of the caller, for the optional travel-time lookup.
    user_location: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct HotelItem {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: LatLng,
    pub distance_km: f64,
    pub rating: Option<f64>,
    pub total_ratings: Option<u32>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub photos: Vec<String>,
    pub open_now: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct HotelList {
    pub hotels: Vec<HotelItem>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct HotelDetails {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: LatLng,
    pub rating: Option<f64>,
    pub total_ratings: Option<u32>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub photos: Vec<String>,
    pub weekday_text: Vec<String>,
    pub status: OpenStatus,
    pub status_label: &'static str,
    pub reviews: Vec<nearspot_places::GoogleReview>,
    pub community_reviews: Vec<ReviewItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<String>,
}

pub(super) async fn nearby_hotels(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<HotelList>>, ApiError> {
    let origin = require_coords(&req_id.0, query.lat, query.lng)?;
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    let params = NearbySearchParams {
        radius_m: Some(query.radius.unwrap_or(DEFAULT_RADIUS_M)),
        place_type: Some("lodging".to_string()),
        keyword: None,
        open_now: false,
    };
    let places = google
        .nearby_search(origin, &params)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let hotels = enrich_and_rank(&state, google, origin, places).await;
    let count = hotels.len();

    Ok(Json(ApiResponse {
        data: HotelList { hotels, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn hotel_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<ApiResponse<HotelDetails>>, ApiError> {
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    let details = google
        .place_details(&place_id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    // Travel time is best-effort: no route or a failed lookup leaves it out.
    let travel_time = match query.user_location {
        Some(ref user_location) => {
            let destination = format!(
                "{},{}",
                details.geometry.location.lat, details.geometry.location.lng
            );
            match google.directions(user_location, &destination).await {
                Ok(summary) => summary.map(|s| s.duration_text),
                Err(e) => {
                    tracing::warn!(error = %e, "directions lookup failed");
                    None
                }
            }
        }
        None => None,
    };

    let community_reviews = nearspot_db::reviews::list_reviews_for_place(&state.pool, &place_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .into_iter()
        .map(ReviewItem::from)
        .collect();

    let weekday_text = details
        .opening_hours
        .as_ref()
        .map(|h| h.weekday_text.clone())
        .unwrap_or_default();
    let status = hours::evaluate(&weekday_text);

    let data = HotelDetails {
        id: details.place_id.unwrap_or(place_id),
        name: details.name,
        address: details.formatted_address,
        location: details.geometry.location,
        rating: details.rating,
        total_ratings: details.user_ratings_total,
        price_level: details.price_level,
        types: details.types,
        phone: details.formatted_phone_number,
        website: details.website,
        photos: details
            .photos
            .iter()
            .map(|p| google.photo_url(&p.photo_reference, DETAIL_PHOTO_WIDTH))
            .collect(),
        weekday_text,
        status_label: status.label(),
        status,
        reviews: details.reviews.into_iter().take(MAX_DETAIL_REVIEWS).collect(),
        community_reviews,
        travel_time,
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Enriches each hotel with its detail record (phone, website, hours),
/// spacing the calls by the configured delay. A failed details fetch keeps
/// the base search result. Results are sorted ascending by distance; the
/// sort is stable, so equidistant hotels keep provider order.
async fn enrich_and_rank(
    state: &AppState,
    google: &GooglePlacesClient,
    origin: LatLng,
    places: Vec<GooglePlace>,
) -> Vec<HotelItem> {
    let mut hotels = Vec::with_capacity(places.len());

    for (i, place) in places.into_iter().enumerate() {
        if i > 0 && state.inter_request_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(
                state.inter_request_delay_ms,
            ))
            .await;
        }

        let details = match google.place_details(&place.place_id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(place = %place.name, error = %e, "hotel details enrichment failed; returning base result");
                None
            }
        };

        hotels.push(to_item(google, origin, place, details));
    }

    hotels.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hotels
}

fn to_item(
    google: &GooglePlacesClient,
    origin: LatLng,
    place: GooglePlace,
    details: Option<nearspot_places::GooglePlaceDetails>,
) -> HotelItem {
    let location = place.geometry.location;
    let distance_km = geo::distance_km(to_coordinate(origin), to_coordinate(location));

    let (detail_price, detail_hours, phone, website) = match details {
        Some(details) => (
            details.price_level,
            details.opening_hours,
            details.formatted_phone_number,
            details.website,
        ),
        None => (None, None, None, None),
    };

    HotelItem {
        id: place.place_id,
        name: place.name,
        address: place.vicinity,
        location,
        distance_km,
        rating: place.rating,
        total_ratings: place.user_ratings_total,
        price_level: detail_price.or(place.price_level),
        types: place.types,
        photos: place
            .photos
            .iter()
            .take(MAX_LIST_PHOTOS)
            .map(|p| google.photo_url(&p.photo_reference, LIST_PHOTO_WIDTH))
            .collect(),
        open_now: detail_hours
            .or(place.opening_hours)
            .and_then(|h| h.open_now),
        phone,
        website,
    }
}
