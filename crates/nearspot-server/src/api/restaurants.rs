//! Restaurant discovery: Google nearby search enriched with Yelp data,
//! distance-ranked from the query point.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use nearspot_core::geo::{self, Coordinate};
use nearspot_core::hours::{self, OpenStatus};
use nearspot_db::search_history;
use nearspot_places::{
    GooglePlace, GooglePlacesClient, GoogleReview, LatLng, NearbySearchParams, YelpBusiness,
};

use crate::middleware::{optional_user, RequestId};

use super::reviews::ReviewItem;
use super::{
    map_db_error, map_places_error, require_configured, require_coords, ApiError, ApiResponse,
    AppState, ResponseMeta,
};

const DEFAULT_RADIUS_M: u32 = 1_500;
const LIST_PHOTO_WIDTH: u32 = 400;
const DETAIL_PHOTO_WIDTH: u32 = 800;
const MAX_LIST_PHOTOS: usize = 3;
const MAX_DETAIL_REVIEWS: usize = 5;

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<u32>,
    keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    query: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<u32>,
    min_rating: Option<f64>,
    max_price: Option<u8>,
    open_now: Option<bool>,
    cuisine: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RestaurantItem {
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
    pub yelp_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yelp_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RestaurantList {
    pub restaurants: Vec<RestaurantItem>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct RestaurantDetails {
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
    pub reviews: Vec<GoogleReview>,
    pub community_reviews: Vec<ReviewItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yelp: Option<YelpBusiness>,
}

pub(super) async fn nearby_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<RestaurantList>>, ApiError> {
    let origin = require_coords(&req_id.0, query.lat, query.lng)?;
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    let params = NearbySearchParams {
        radius_m: Some(query.radius.unwrap_or(DEFAULT_RADIUS_M)),
        place_type: Some("restaurant".to_string()),
        keyword: Some(query.keyword.unwrap_or_else(|| "restaurant".to_string())),
        open_now: false,
    };
    let places = google
        .nearby_search(origin, &params)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let restaurants = enrich_and_rank(&state, google, origin, places).await;
    let count = restaurants.len();

    Ok(Json(ApiResponse {
        data: RestaurantList { restaurants, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<RestaurantList>>, ApiError> {
    if query.query.is_none() && query.lat.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query or location is required",
        ));
    }
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    // Nearby search always needs a center, so a keyword-only request still
    // fails validation, just with a more specific message.
    let origin = require_coords(&req_id.0, query.lat, query.lng)?;

    let params = NearbySearchParams {
        radius_m: Some(query.radius.unwrap_or(DEFAULT_RADIUS_M)),
        place_type: Some("restaurant".to_string()),
        keyword: query.query.clone(),
        open_now: query.open_now.unwrap_or(false),
    };
    let mut places = google
        .nearby_search(origin, &params)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    apply_filters(&mut places, &query);

    record_search(&state, &headers, origin, &query).await;

    let restaurants = enrich_and_rank(&state, google, origin, places).await;
    let count = restaurants.len();

    Ok(Json(ApiResponse {
        data: RestaurantList { restaurants, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteQuery {
    input: String,
}

pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<ApiResponse<Vec<nearspot_places::PlacePrediction>>>, ApiError> {
    if query.input.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "input is required",
        ));
    }
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    let predictions = google
        .autocomplete(&query.input)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: predictions,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    address: Option<String>,
    place_id: Option<String>,
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<nearspot_places::GeocodedLocation>>, ApiError> {
    if query.address.is_none() && query.place_id.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "address or place_id is required",
        ));
    }
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    let hit = google
        .geocode(query.address.as_deref(), query.place_id.as_deref())
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let Some(hit) = hit else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no geocoding result for the given input",
        ));
    };

    Ok(Json(ApiResponse {
        data: hit,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn restaurant_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<RestaurantDetails>>, ApiError> {
    let google = require_configured(state.google.as_ref(), &req_id.0, "Google Places")?;

    let details = google
        .place_details(&place_id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    // Yelp enrichment is best-effort; a failure only drops the extras.
    let yelp = match state.yelp.as_ref() {
        Some(yelp) => yelp
            .best_match(&details.name, details.geometry.location)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(place = %details.name, error = %e, "yelp details unavailable");
                None
            }),
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

    let data = RestaurantDetails {
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
        yelp,
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Server-side filters applied on top of the provider search.
fn apply_filters(places: &mut Vec<GooglePlace>, query: &SearchQuery) {
    if let Some(min_rating) = query.min_rating {
        places.retain(|p| p.rating.is_some_and(|r| r >= min_rating));
    }
    if let Some(max_price) = query.max_price {
        places.retain(|p| p.price_level.is_some_and(|level| level <= max_price));
    }
    if let Some(ref cuisine) = query.cuisine {
        let needle = cuisine.to_lowercase();
        places.retain(|p| p.types.iter().any(|t| t.to_lowercase().contains(&needle)));
    }
}

/// Attributes the search to the caller when a valid bearer token is present.
/// Recording failures are logged, never surfaced.
async fn record_search(state: &AppState, headers: &HeaderMap, origin: LatLng, query: &SearchQuery) {
    let Some(user) = optional_user(headers, &state.auth) else {
        return;
    };
    let Some(ref text) = query.query else {
        return;
    };

    let filters = serde_json::json!({
        "min_rating": query.min_rating,
        "max_price": query.max_price,
        "open_now": query.open_now,
        "cuisine": query.cuisine,
    })
    .to_string();
    let location = format!("{},{}", origin.lat, origin.lng);

    if let Err(e) = search_history::record_search(
        &state.pool,
        Some(user.id),
        text,
        Some(&location),
        Some(&filters),
    )
    .await
    {
        tracing::warn!(error = %e, "failed to record search history");
    }
}

/// Enriches each place with its best Yelp match (sequentially, spacing the
/// calls by the configured delay) and sorts ascending by distance from the
/// query point. The sort is stable, so equidistant places keep provider
/// order.
async fn enrich_and_rank(
    state: &AppState,
    google: &GooglePlacesClient,
    origin: LatLng,
    places: Vec<GooglePlace>,
) -> Vec<RestaurantItem> {
    let mut items = Vec::with_capacity(places.len());

    for (i, place) in places.into_iter().enumerate() {
        let yelp = match state.yelp.as_ref() {
            Some(yelp) => {
                if i > 0 && state.inter_request_delay_ms > 0 {
                    tokio::time::sleep(std::time::Duration::from_millis(
                        state.inter_request_delay_ms,
                    ))
                    .await;
                }
                yelp.best_match(&place.name, place.geometry.location)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!(place = %place.name, error = %e, "yelp enrichment failed; returning base result");
                        None
                    })
            }
            None => None,
        };
        items.push(to_item(google, origin, place, yelp));
    }

    items.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    items
}

fn to_item(
    google: &GooglePlacesClient,
    origin: LatLng,
    place: GooglePlace,
    yelp: Option<YelpBusiness>,
) -> RestaurantItem {
    let location = place.geometry.location;
    let distance_km = geo::distance_km(to_coordinate(origin), to_coordinate(location));

    let (yelp_url, yelp_price, phone, categories, yelp_rating, yelp_review_count) = match yelp {
        Some(business) => (
            business.url,
            business.price,
            business.phone,
            business.categories.into_iter().map(|c| c.title).collect(),
            business.rating,
            business.review_count,
        ),
        None => (None, None, None, Vec::new(), None, None),
    };

    RestaurantItem {
        id: place.place_id,
        name: place.name,
        address: place.vicinity,
        location,
        distance_km,
        rating: place.rating.or(yelp_rating),
        total_ratings: place.user_ratings_total.or(yelp_review_count),
        price_level: place.price_level,
        types: place.types,
        photos: place
            .photos
            .iter()
            .take(MAX_LIST_PHOTOS)
            .map(|p| google.photo_url(&p.photo_reference, LIST_PHOTO_WIDTH))
            .collect(),
        open_now: place.opening_hours.and_then(|h| h.open_now),
        yelp_url,
        yelp_price,
        phone,
        categories,
    }
}

pub(super) fn to_coordinate(location: LatLng) -> Coordinate {
    Coordinate {
        latitude: location.lat,
        longitude: location.lng,
    }
}
