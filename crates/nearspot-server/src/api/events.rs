//! Event discovery from the Eventbrite and Ticketmaster Discovery APIs.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use nearspot_db::search_history;
use nearspot_events::{
    EbEvent, EbTicketClass, EventbriteSearchParams, TicketmasterSearchParams, TmEvent,
};

use crate::middleware::{optional_user, RequestId};

use super::{
    map_events_error, require_configured, require_coords, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

const DEFAULT_RADIUS_KM: u32 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<u32>,
    start_date: Option<String>,
    end_date: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    query: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<u32>,
    start_date: Option<String>,
    end_date: Option<String>,
    category: Option<String>,
    format: Option<String>,
    is_free: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TicketmasterQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<u32>,
    keyword: Option<String>,
    segment_id: Option<String>,
    start_date_time: Option<String>,
    end_date_time: Option<String>,
}

/// An Eventbrite event reshaped for the API.
#[derive(Debug, Serialize)]
pub(super) struct EventItem {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub timezone: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub venue: Option<EventVenue>,
    pub category: Option<EventCategory>,
    pub is_free: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct EventVenue {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<serde_json::Value>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct EventCategory {
    pub id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct EventList {
    pub events: Vec<EventItem>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct EventDetails {
    #[serde(flatten)]
    pub event: EventItem,
    pub organizer: Option<serde_json::Value>,
    pub tickets: Vec<TicketItem>,
    pub attendees: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct TicketItem {
    pub id: String,
    pub name: Option<String>,
    pub cost: Option<serde_json::Value>,
    pub quantity_total: Option<u64>,
    pub quantity_sold: Option<u64>,
    pub sales_end: Option<String>,
    pub is_free: Option<bool>,
}

/// A Ticketmaster event reshaped for the API.
#[derive(Debug, Serialize)]
pub(super) struct TicketmasterEventItem {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TicketmasterEventList {
    pub events: Vec<TicketmasterEventItem>,
    pub count: usize,
}

pub(super) async fn nearby_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<EventList>>, ApiError> {
    let origin = require_coords(&req_id.0, query.lat, query.lng)?;
    let eventbrite = require_configured(state.eventbrite.as_ref(), &req_id.0, "Eventbrite")?;

    let params = EventbriteSearchParams {
        query: None,
        location: Some((origin.lat, origin.lng, query.radius.unwrap_or(DEFAULT_RADIUS_KM))),
        start_date_range: query.start_date,
        end_date_range: query.end_date,
        categories: query.category,
        format: None,
        free_only: false,
    };
    let events = eventbrite
        .search_events(&params)
        .await
        .map_err(|e| map_events_error(req_id.0.clone(), &e))?;

    let events: Vec<EventItem> = events.into_iter().map(to_event_item).collect();
    let count = events.len();

    Ok(Json(ApiResponse {
        data: EventList { events, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<EventList>>, ApiError> {
    if query.query.is_none() && query.lat.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query or location is required",
        ));
    }
    let eventbrite = require_configured(state.eventbrite.as_ref(), &req_id.0, "Eventbrite")?;

    let location = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            Some((lat, lng, query.radius.unwrap_or(DEFAULT_RADIUS_KM)))
        }
        _ => None,
    };

    let params = EventbriteSearchParams {
        query: query.query.clone(),
        location,
        start_date_range: query.start_date.clone(),
        end_date_range: query.end_date.clone(),
        categories: query.category.clone(),
        format: query.format.clone(),
        free_only: query.is_free.unwrap_or(false),
    };
    let events = eventbrite
        .search_events(&params)
        .await
        .map_err(|e| map_events_error(req_id.0.clone(), &e))?;

    record_search(&state, &headers, &query).await;

    let events: Vec<EventItem> = events.into_iter().map(to_event_item).collect();
    let count = events.len();

    Ok(Json(ApiResponse {
        data: EventList { events, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn event_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<EventDetails>>, ApiError> {
    let eventbrite = require_configured(state.eventbrite.as_ref(), &req_id.0, "Eventbrite")?;

    let event = eventbrite
        .event_details(&event_id)
        .await
        .map_err(|e| map_events_error(req_id.0.clone(), &e))?;

    // Tickets and attendees are often restricted; treat failures as absent.
    let tickets = eventbrite
        .ticket_classes(&event_id)
        .await
        .unwrap_or_else(|e| {
            tracing::debug!(event_id = %event_id, error = %e, "tickets not available for this event");
            Vec::new()
        });
    let attendees = eventbrite
        .attendee_count(&event_id)
        .await
        .unwrap_or_else(|e| {
            tracing::debug!(event_id = %event_id, error = %e, "attendee information not available for this event");
            0
        });

    let organizer = event
        .organizer
        .as_ref()
        .map(|o| serde_json::json!({
            "id": o.id,
            "name": o.name,
            "description": o.description.as_ref().and_then(|d| d.text.clone()),
            "website": o.website,
            "logo": o.logo.as_ref().and_then(|l| l.url.clone()),
        }));

    let data = EventDetails {
        event: to_event_item(event),
        organizer,
        tickets: tickets.into_iter().map(to_ticket_item).collect(),
        attendees,
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn ticketmaster_nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TicketmasterQuery>,
) -> Result<Json<ApiResponse<TicketmasterEventList>>, ApiError> {
    let origin = require_coords(&req_id.0, query.lat, query.lng)?;
    let ticketmaster =
        require_configured(state.ticketmaster.as_ref(), &req_id.0, "Ticketmaster")?;

    let params = TicketmasterSearchParams {
        keyword: query.keyword,
        segment_id: query.segment_id,
        start_date_time: query.start_date_time,
        end_date_time: query.end_date_time,
    };
    let events = ticketmaster
        .nearby_events(
            origin.lat,
            origin.lng,
            query.radius.unwrap_or(DEFAULT_RADIUS_KM),
            &params,
        )
        .await
        .map_err(|e| map_events_error(req_id.0.clone(), &e))?;

    let events: Vec<TicketmasterEventItem> =
        events.into_iter().map(to_ticketmaster_item).collect();
    let count = events.len();

    Ok(Json(ApiResponse {
        data: TicketmasterEventList { events, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn ticketmaster_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(event_id): Path<String>,
) -> Result<Json<ApiResponse<TicketmasterEventItem>>, ApiError> {
    let ticketmaster =
        require_configured(state.ticketmaster.as_ref(), &req_id.0, "Ticketmaster")?;

    let event = ticketmaster
        .event_details(&event_id)
        .await
        .map_err(|e| map_events_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: to_ticketmaster_item(event),
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn record_search(state: &AppState, headers: &HeaderMap, query: &SearchQuery) {
    let Some(user) = optional_user(headers, &state.auth) else {
        return;
    };
    let Some(ref text) = query.query else {
        return;
    };

    let filters = serde_json::json!({
        "category": query.category,
        "format": query.format,
        "is_free": query.is_free,
    })
    .to_string();
    let location = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some(format!("{lat},{lng}")),
        _ => None,
    };

    if let Err(e) = search_history::record_search(
        &state.pool,
        Some(user.id),
        text,
        location.as_deref(),
        Some(&filters),
    )
    .await
    {
        tracing::warn!(error = %e, "failed to record search history");
    }
}

fn to_event_item(event: EbEvent) -> EventItem {
    EventItem {
        id: event.id,
        name: event.name.and_then(|n| n.text),
        description: event.description.and_then(|d| d.text),
        start: event.start.as_ref().and_then(|s| s.local.clone()),
        end: event.end.as_ref().and_then(|e| e.local.clone()),
        timezone: event.start.and_then(|s| s.timezone),
        url: event.url,
        logo: event.logo.and_then(|l| l.url),
        venue: event.venue.map(|v| EventVenue {
            id: v.id,
            name: v.name,
            address: v.address,
            latitude: v.latitude,
            longitude: v.longitude,
        }),
        category: event.category.map(|c| EventCategory {
            id: c.id,
            name: c.name,
            short_name: c.short_name,
        }),
        is_free: event.is_free,
        status: event.status,
    }
}

fn to_ticket_item(ticket: EbTicketClass) -> TicketItem {
    TicketItem {
        id: ticket.id,
        name: ticket.name,
        cost: ticket.cost,
        quantity_total: ticket.quantity_total,
        quantity_sold: ticket.quantity_sold,
        sales_end: ticket.sales_end,
        is_free: ticket.free,
    }
}

fn to_ticketmaster_item(event: TmEvent) -> TicketmasterEventItem {
    let venue = event.venue().cloned();
    let start = event.dates.as_ref().and_then(|d| d.start.clone());

    TicketmasterEventItem {
        category: event.segment_name().map(ToOwned::to_owned),
        id: event.id,
        name: event.name,
        url: event.url,
        image: event.images.first().map(|i| i.url.clone()),
        date: start.as_ref().and_then(|s| s.local_date.clone()),
        time: start.and_then(|s| s.local_time),
        venue: venue.as_ref().and_then(|v| v.name.clone()),
        address: venue
            .as_ref()
            .and_then(|v| v.address.as_ref())
            .and_then(|a| a.line1.clone()),
        city: venue
            .as_ref()
            .and_then(|v| v.city.as_ref())
            .and_then(|c| c.name.clone()),
        country: venue
            .as_ref()
            .and_then(|v| v.country.as_ref())
            .and_then(|c| c.name.clone()),
    }
}
