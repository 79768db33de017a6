//! HTTP client for the Ticketmaster Discovery API.
//!
//! Auth is an `apikey` query parameter on every request. Searches are pinned
//! to 20 results sorted by date ascending, matching what the discovery pages
//! render.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::EventsError;
use crate::retry::retry_with_backoff;
use crate::types::{TmEvent, TmFaultResponse, TmSearchResponse};

const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com/";

const PAGE_SIZE: u32 = 20;

/// Optional filters for a nearby-events search.
#[derive(Debug, Clone, Default)]
pub struct TicketmasterSearchParams {
    pub keyword: Option<String>,
    pub segment_id: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
}

/// Client for the Ticketmaster Discovery API.
#[derive(Clone)]
pub struct TicketmasterClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TicketmasterClient {
    /// Creates a new client pointed at the production Discovery API.
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
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| EventsError::InvalidUrl {
            url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Events around a coordinate, soonest first.
    ///
    /// `radius_km` is passed through with `unit=km`. An absent `_embedded`
    /// block (no events in range) is an empty vector.
    ///
    /// # Errors
    ///
    /// - [`EventsError::ApiError`] if the API returns a fault body.
    /// - [`EventsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`EventsError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn nearby_events(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: u32,
        params: &TicketmasterSearchParams,
    ) -> Result<Vec<TmEvent>, EventsError> {
        let mut pairs: Vec<(&str, String)> = vec![
            ("latlong", format!("{latitude},{longitude}")),
            ("radius", radius_km.to_string()),
            ("unit", "km".to_string()),
            ("size", PAGE_SIZE.to_string()),
            ("sort", "date,asc".to_string()),
        ];
        if let Some(ref keyword) = params.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(ref segment_id) = params.segment_id {
            pairs.push(("segmentId", segment_id.clone()));
        }
        if let Some(ref start) = params.start_date_time {
            pairs.push(("startDateTime", start.clone()));
        }
        if let Some(ref end) = params.end_date_time {
            pairs.push(("endDateTime", end.clone()));
        }

        let url = self.build_url("discovery/v2/events.json", &pairs)?;
        let body = self.request_text(&url, None).await?;

        let parsed: TmSearchResponse =
            serde_json::from_str(&body).map_err(|e| EventsError::Deserialize {
                context: "discovery event search".to_owned(),
                source: e,
            })?;
        Ok(parsed.embedded.map(|e| e.events).unwrap_or_default())
    }

    /// Fetches a single event by Discovery API id.
    ///
    /// # Errors
    ///
    /// - [`EventsError::NotFound`] if the event does not exist.
    /// - [`EventsError::ApiError`] if the API returns a fault body.
    /// - [`EventsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`EventsError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn event_details(&self, event_id: &str) -> Result<TmEvent, EventsError> {
        let url = self.build_url(&format!("discovery/v2/events/{event_id}.json"), &[])?;
        let body = self.request_text(&url, Some(event_id)).await?;

        serde_json::from_str(&body).map_err(|e| EventsError::Deserialize {
            context: format!("event details for {event_id}"),
            source: e,
        })
    }

    fn build_url(&self, path: &str, extra: &[(&str, String)]) -> Result<Url, EventsError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| EventsError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apikey", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with retry and returns the body text.
    ///
    /// A 404 with `not_found_id` set becomes [`EventsError::NotFound`]; a 401
    /// with a fault body becomes [`EventsError::ApiError`].
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
                let message = serde_json::from_str::<TmFaultResponse>(&body)
                    .ok()
                    .and_then(|f| f.fault)
                    .and_then(|f| f.faultstring)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                return Err(EventsError::ApiError(message));
            }

            let response = response.error_for_status()?;
            Ok(response.text().await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> TicketmasterClient {
        TicketmasterClient::with_base_url("tm-key", 30, "nearspot/0.1 (test)", 0, 0, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_pins_size_and_sort() {
        let client = test_client("https://app.ticketmaster.com");
        let url = client
            .build_url(
                "discovery/v2/events.json",
                &[
                    ("latlong", "30.2672,-97.7431".to_string()),
                    ("radius", "10".to_string()),
                    ("unit", "km".to_string()),
                    ("size", PAGE_SIZE.to_string()),
                    ("sort", "date,asc".to_string()),
                ],
            )
            .expect("url");
        let s = url.as_str();
        assert!(s.starts_with("https://app.ticketmaster.com/discovery/v2/events.json?apikey=tm-key"));
        assert!(s.contains("size=20"));
        assert!(s.contains("sort=date%2Casc"));
    }

    #[test]
    fn event_detail_path_embeds_the_id() {
        let client = test_client("https://app.ticketmaster.com/");
        let url = client
            .build_url("discovery/v2/events/abc123.json", &[])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://app.ticketmaster.com/discovery/v2/events/abc123.json?apikey=tm-key"
        );
    }
}
