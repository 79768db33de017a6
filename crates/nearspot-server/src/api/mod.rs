mod events;
mod favorites;
mod hotels;
mod restaurants;
mod reviews;
mod users;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::auth::AuthState;
use crate::middleware::{enforce_rate_limit, request_id, require_jwt_auth, RateLimitState, RequestId};
use nearspot_events::{EventbriteClient, TicketmasterClient};
use nearspot_places::{GooglePlacesClient, LatLng, YelpClient};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: AuthState,
    pub google: Option<GooglePlacesClient>,
    pub yelp: Option<YelpClient>,
    pub ticketmaster: Option<TicketmasterClient>,
    pub eventbrite: Option<EventbriteClient>,
    /// Delay between sequential enrichment calls to a provider, to respect
    /// third-party rate limits.
    pub inter_request_delay_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &nearspot_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_places_error(request_id: String, error: &nearspot_places::PlacesError) -> ApiError {
    if error.is_not_found() {
        return ApiError::new(request_id, "not_found", "place not found");
    }
    tracing::error!(error = %error, "place provider request failed");
    ApiError::new(request_id, "upstream_error", "place provider request failed")
}

pub(super) fn map_events_error(request_id: String, error: &nearspot_events::EventsError) -> ApiError {
    if let nearspot_events::EventsError::NotFound { .. } = error {
        return ApiError::new(request_id, "not_found", "event not found");
    }
    tracing::error!(error = %error, "event provider request failed");
    ApiError::new(request_id, "upstream_error", "event provider request failed")
}

/// Unwraps an optional provider client, answering 503 when the deployment
/// has no API key for it.
pub(super) fn require_configured<'a, T>(
    client: Option<&'a T>,
    request_id: &str,
    provider: &str,
) -> Result<&'a T, ApiError> {
    client.ok_or_else(|| {
        ApiError::new(
            request_id,
            "not_configured",
            format!("{provider} API key is not configured"),
        )
    })
}

/// Both coordinates are required for nearby searches.
pub(super) fn require_coords(
    request_id: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<LatLng, ApiError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(LatLng { lat, lng }),
        _ => Err(ApiError::new(
            request_id,
            "validation_error",
            "latitude and longitude are required",
        )),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/users/register", post(users::register))
        .route("/api/v1/users/login", post(users::login))
        .route(
            "/api/v1/restaurants/nearby",
            get(restaurants::nearby_restaurants),
        )
        .route(
            "/api/v1/restaurants/search",
            get(restaurants::search_restaurants),
        )
        .route(
            "/api/v1/restaurants/autocomplete",
            get(restaurants::autocomplete),
        )
        .route("/api/v1/restaurants/geocode", get(restaurants::geocode))
        .route(
            "/api/v1/restaurants/{place_id}",
            get(restaurants::restaurant_details),
        )
        .route("/api/v1/hotels/nearby", get(hotels::nearby_hotels))
        .route("/api/v1/hotels/{place_id}", get(hotels::hotel_details))
        .route("/api/v1/events/nearby", get(events::nearby_events))
        .route("/api/v1/events/search", get(events::search_events))
        .route(
            "/api/v1/events/ticketmaster/nearby",
            get(events::ticketmaster_nearby),
        )
        .route(
            "/api/v1/events/ticketmaster/{event_id}",
            get(events::ticketmaster_details),
        )
        .route("/api/v1/events/{event_id}", get(events::event_details))
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/users/profile",
            get(users::profile).put(users::update_profile),
        )
        .route("/api/v1/users/password", put(users::change_password))
        .route("/api/v1/users/activity", get(users::activity))
        .route("/api/v1/users/favorites", get(users::all_favorites))
        .route(
            "/api/v1/restaurants/{place_id}/reviews",
            post(reviews::review_restaurant),
        )
        .route(
            "/api/v1/hotels/{place_id}/reviews",
            post(reviews::review_hotel),
        )
        .route("/api/v1/reviews/my", get(reviews::my_reviews))
        .route(
            "/api/v1/restaurants/{place_id}/favorite",
            post(favorites::favorite_restaurant).delete(favorites::unfavorite_restaurant),
        )
        .route(
            "/api/v1/hotels/{place_id}/favorite",
            post(favorites::favorite_hotel).delete(favorites::unfavorite_hotel),
        )
        .route(
            "/api/v1/events/{event_id}/favorite",
            post(favorites::favorite_event).delete(favorites::unfavorite_event),
        )
        .route("/api/v1/favorites/my", get(favorites::my_favorites))
        .layer(axum::middleware::from_fn_with_state(auth, require_jwt_auth))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let auth = state.auth.clone();

    Router::new()
        .merge(public_router())
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                )),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match nearspot_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
