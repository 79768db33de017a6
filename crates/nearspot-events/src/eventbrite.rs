//! HTTP client for the Eventbrite API.
//!
//! Auth is a bearer token. Searches always expand `venue,category` and pin
//! `status=live`; detail lookups additionally expand the organizer. Ticket
//! classes and attendee counts are fetched best-effort by the caller.

use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};

use crate::error::EventsError;
use crate::retry::retry_with_backoff;
use crate::types::{
    EbAttendeesResponse, EbErrorResponse, EbEvent, EbSearchResponse, EbTicketClass,
    EbTicketClassesResponse,
};

const DEFAULT_BASE_URL: &str = "https://www.eventbriteapi.com/v3/";

/// Filters for an event search.
#[derive(Debug, Clone, Default)]
pub struct EventbriteSearchParams {
    /// Free-text query (`q`).
    pub query: Option<String>,
    /// Center of a location-bounded search plus its radius in km.
    pub location: Option<(f64, f64, u32)>,
    pub start_date_range: Option<String>,
    pub end_date_range: Option<String>,
    pub categories: Option<String>,
    pub format: Option<String>,
    pub free_only: bool,
}

/// Client for the Eventbrite API.
#[derive(Clone)]
pub struct EventbriteClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl EventbriteClient {
    /// Creates a new client pointed at the production Eventbrite API.
    ///
    /// # Errors
    ///
    /// Returns [`EventsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, EventsError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`EventsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`EventsError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, EventsError> {
        let mut default_headers = header::HeaderMap::new();
        if let Ok(mut value) = header::HeaderValue::from_str(&format!("Bearer {api_key}")) {
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(default_headers)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| EventsError::InvalidUrl {
            url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Live events matching the given filters.
    ///
    /// # Errors
    ///
    /// - [`EventsError::ApiError`] if the API returns an error body.
    /// - [`EventsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`EventsError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search_events(
        &self,
        params: &EventbriteSearchParams,
    ) -> Result<Vec<EbEvent>, EventsError> {
        let mut pairs: Vec<(&str, String)> = vec![
            ("expand", "venue,category".to_string()),
            ("status", "live".to_string()),
        ];
        if let Some(ref query) = params.query {
            pairs.push(("q", query.clone()));
        }
        if let Some((latitude, longitude, radius_km)) = params.location {
            pairs.push(("location.latitude", latitude.to_string()));
            pairs.push(("location.longitude", longitude.to_string()));
            pairs.push(("location.within", format!("{radius_km}km")));
        }
        if let Some(ref start) = params.start_date_range {
            pairs.push(("start_date_range", start.clone()));
        }
        if let Some(ref end) = params.end_date_range {
            pairs.push(("end_date_range", end.clone()));
        }
        if let Some(ref categories) = params.categories {
            pairs.push(("categories", categories.clone()));
        }
        if let Some(ref format) = params.format {
            pairs.push(("format", format.clone()));
        }
        if params.free_only {
            pairs.push(("is_free", "true".to_string()));
        }

        let url = self.build_url("events/search/", &pairs)?;
        let body = self.request_text(&url, None).await?;

        let parsed: EbSearchResponse =
            serde_json::from_str(&body).map_err(|e| EventsError::Deserialize {
                context: "event search".to_owned(),
                source: e,
            })?;
        Ok(parsed.events)
    }

    /// Fetches a single event with venue, category, and organizer expanded.
    ///
    /// # Errors
    ///
    /// - [`EventsError::NotFound`] if the event does not exist.
    /// - [`EventsError::ApiError`] if the API returns an error body.
    /// - [`EventsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`EventsError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn event_details(&self, event_id: &str) -> Result<EbEvent, EventsError> {
        let url = self.build_url(
            &format!("events/{event_id}/"),
            &[("expand", "venue,category,organizer".to_string())],
        )?;
        let body = self.request_text(&url, Some(event_id)).await?;

        serde_json::from_str(&body).map_err(|e| EventsError::Deserialize {
            context: format!("event details for {event_id}"),
            source: e,
        })
    }

    /// Ticket classes for an event.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::event_details`]. Callers treat failures
    /// as "tickets not available" rather than failing the whole lookup.
    pub async fn ticket_classes(&self, event_id: &str) -> Result<Vec<EbTicketClass>, EventsError> {
        let url = self.build_url(&format!("events/{event_id}/ticket_classes/"), &[])?;
        let body = self.request_text(&url, Some(event_id)).await?;

        let parsed: EbTicketClassesResponse =
            serde_json::from_str(&body).map_err(|e| EventsError::Deserialize {
                context: format!("ticket classes for {event_id}"),
                source: e,
            })?;
        Ok(parsed.ticket_classes)
    }

    /// Number of attendees, where the event's organizer exposes them.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::event_details`]. Callers treat failures
    /// as "attendee information not available".
    pub async fn attendee_count(&self, event_id: &str) -> Result<usize, EventsError> {
        let url = self.build_url(&format!("events/{event_id}/attendees/"), &[])?;
        let body = self.request_text(&url, Some(event_id)).await?;

        let parsed: EbAttendeesResponse =
            serde_json::from_str(&body).map_err(|e| EventsError::Deserialize {
                context: format!("attendees for {event_id}"),
                source: e,
            })?;
        Ok(parsed.attendees.len())
    }

    fn build_url(&self, path: &str, extra: &[(&str, String)]) -> Result<Url, EventsError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| EventsError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        if !extra.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with retry and returns the body text.
    async fn request_text(
        &self,
        url: &Url,
        not_found_id: Option<&str>,
    ) -> Result<String, EventsError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                if let Some(event_id) = not_found_id {
                    return Err(EventsError::NotFound {
                        event_id: event_id.to_owned(),
                    });
                }
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                let body = response.text().await?;
                let message = serde_json::from_str::<EbErrorResponse>(&body)
                    .ok()
                    .and_then(|e| e.error_description)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                return Err(EventsError::ApiError(message));
            }

            let response = response.error_for_status()?;
            Ok(response.text().await?)
        })
        .await
    }
}
