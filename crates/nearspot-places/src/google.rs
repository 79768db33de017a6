//! HTTP client for the Google Maps Platform web services used by the API:
//! Places nearby search and details, Places autocomplete, Geocoding, and
//! Directions.
//!
//! Every endpoint shares the same envelope convention: HTTP 200 with a
//! `status` field. `OK` and `ZERO_RESULTS` are successes (the latter an
//! empty list); anything else surfaces as [`PlacesError::Status`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{
    DirectionsResponse, DirectionsSummary, GeocodeResponse, GeocodedLocation,
    GoogleAutocompleteResponse, GoogleDetailsResponse, GoogleListResponse, GooglePlace,
    GooglePlaceDetails, LatLng, PlacePrediction,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Field mask requested on detail lookups; keeps the response (and billing
/// tier) bounded to what the API layer actually reshapes.
const DETAILS_FIELDS: &str = "place_id,name,formatted_address,geometry,rating,\
                              user_ratings_total,price_level,types,photos,opening_hours,\
                              formatted_phone_number,website,url,reviews";

/// Parameters for a nearby search.
#[derive(Debug, Clone, Default)]
pub struct NearbySearchParams {
    pub radius_m: Option<u32>,
    pub place_type: Option<String>,
    pub keyword: Option<String>,
    pub open_now: bool,
}

/// Client for the Google Maps Platform web services.
///
/// Use [`GooglePlacesClient::new`] for production or
/// [`GooglePlacesClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GooglePlacesClient {
    /// Creates a new client pointed at the production Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PlacesError> {
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
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: a single trailing slash so Url::join appends rather
        // than replaces the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidUrl {
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

    /// Searches for places of `place_type` around `location`.
    ///
    /// `ZERO_RESULTS` is an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if Google reports a non-OK status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn nearby_search(
        &self,
        location: LatLng,
        params: &NearbySearchParams,
    ) -> Result<Vec<GooglePlace>, PlacesError> {
        let mut pairs: Vec<(&str, String)> = vec![(
            "location",
            format!("{},{}", location.lat, location.lng),
        )];
        if let Some(radius) = params.radius_m {
            pairs.push(("radius", radius.to_string()));
        }
        if let Some(ref place_type) = params.place_type {
            pairs.push(("type", place_type.clone()));
        }
        if let Some(ref keyword) = params.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if params.open_now {
            pairs.push(("opennow", "true".to_string()));
        }

        let url = self.build_url("place/nearbysearch/json", &pairs)?;
        let body: GoogleListResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.results),
            status => Err(status_error(status, body.error_message)),
        }
    }

    /// Fetches the full detail record for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if Google reports a non-OK status
    ///   (`NOT_FOUND` is detectable via [`PlacesError::is_not_found`]).
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<GooglePlaceDetails, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[
                ("place_id", place_id.to_string()),
                ("fields", DETAILS_FIELDS.to_string()),
            ],
        )?;
        let body: GoogleDetailsResponse = self.request_json(&url).await?;

        match (body.status.as_str(), body.result) {
            ("OK", Some(result)) => Ok(result),
            ("OK", None) => Err(status_error("OK", Some("missing result".to_string()))),
            (status, _) => Err(status_error(status, body.error_message)),
        }
    }

    /// Address predictions for a partial input string.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::nearby_search`].
    pub async fn autocomplete(&self, input: &str) -> Result<Vec<PlacePrediction>, PlacesError> {
        let url = self.build_url("place/autocomplete/json", &[("input", input.to_string())])?;
        let body: GoogleAutocompleteResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.predictions),
            status => Err(status_error(status, body.error_message)),
        }
    }

    /// Resolves a free-form address or a `place_id` to a coordinate.
    ///
    /// Returns the first (best) geocoding hit, or `None` on `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::nearby_search`].
    pub async fn geocode(
        &self,
        address: Option<&str>,
        place_id: Option<&str>,
    ) -> Result<Option<GeocodedLocation>, PlacesError> {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(address) = address {
            pairs.push(("address", address.to_string()));
        }
        if let Some(place_id) = place_id {
            pairs.push(("place_id", place_id.to_string()));
        }

        let url = self.build_url("geocode/json", &pairs)?;
        let body: GeocodeResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().next().map(|r| GeocodedLocation {
                formatted_address: r.formatted_address,
                location: r.geometry.location,
            })),
            "ZERO_RESULTS" => Ok(None),
            status => Err(status_error(status, body.error_message)),
        }
    }

    /// Driving directions summary (duration/distance text of the first leg).
    ///
    /// Returns `None` when no route exists between the endpoints.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::nearby_search`].
    pub async fn directions(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<DirectionsSummary>, PlacesError> {
        let url = self.build_url(
            "directions/json",
            &[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("mode", "driving".to_string()),
            ],
        )?;
        let body: DirectionsResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body
                .routes
                .into_iter()
                .next()
                .and_then(|route| route.legs.into_iter().next())
                .map(|leg| DirectionsSummary {
                    duration_text: leg.duration.text,
                    distance_text: leg.distance.map(|d| d.text),
                })),
            status => Err(status_error(status, body.error_message)),
        }
    }

    /// Builds a fetchable photo URL from a `photo_reference`.
    ///
    /// List endpoints use width 400, detail endpoints 800, mirroring what
    /// the web client renders.
    #[must_use]
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        let mut url = self
            .base_url
            .join("place/photo")
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut()
            .append_pair("maxwidth", &max_width.to_string())
            .append_pair("photoreference", photo_reference)
            .append_pair("key", &self.api_key);
        url.to_string()
    }

    /// Builds the full request URL with the API key and properly
    /// percent-encoded query parameters.
    fn build_url(&self, path: &str, extra: &[(&str, String)]) -> Result<Url, PlacesError> {
        let mut url = self.base_url.join(path).map_err(|e| PlacesError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request with retry, asserts a 2xx HTTP status, and parses
    /// the response body.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<T, PlacesError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || async {
            let response = self.client.get(url.clone()).send().await?;
            let response = response.error_for_status()?;
            Ok(response.text().await?)
        })
        .await?;

        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: redacted(url),
            source: e,
        })
    }
}

fn status_error(status: &str, message: Option<String>) -> PlacesError {
    PlacesError::Status {
        status: status.to_owned(),
        message: message.unwrap_or_else(|| "no error message".to_owned()),
    }
}

/// URL without its query string, safe for error contexts (the query carries
/// the API key).
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GooglePlacesClient {
        GooglePlacesClient::with_base_url("test-key", 30, "nearspot/0.1 (test)", 0, 0, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_key_and_encodes_params() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        let url = client
            .build_url(
                "place/nearbysearch/json",
                &[("location", "30.2672,-97.7431".to_string())],
            )
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/nearbysearch/json?location=30.2672%2C-97.7431&key=test-key"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slash_in_base() {
        let client = test_client("https://maps.googleapis.com/maps/api/");
        let url = client
            .build_url("geocode/json", &[("address", "austin".to_string())])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/geocode/json?address=austin&key=test-key"
        );
    }

    #[test]
    fn photo_url_carries_width_reference_and_key() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        let url = client.photo_url("ref-123", 400);
        assert!(url.contains("maxwidth=400"));
        assert!(url.contains("photoreference=ref-123"));
        assert!(url.contains("key=test-key"));
    }

    #[test]
    fn redacted_strips_the_query_string() {
        let url = Url::parse("https://example.com/geocode/json?address=x&key=secret").expect("url");
        let shown = redacted(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.ends_with("/geocode/json"));
    }
}
