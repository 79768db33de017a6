//! HTTP client for the Yelp Fusion business search API.
//!
//! Used to enrich Google results: one narrow-radius, single-result search
//! per place, keyed by the place name and coordinate.

use std::time::Duration;

use reqwest::{header, Client, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{LatLng, YelpBusiness, YelpSearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/";

/// Client for the Yelp Fusion API. Auth is a bearer token on every request.
#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YelpClient {
    /// Creates a new client pointed at the production Yelp API.
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
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidUrl {
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

    /// Searches businesses near a coordinate.
    ///
    /// `radius_m` is capped by Yelp at 40 km; callers here use 100 m to pin
    /// down the one business matching a Google result.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn business_search(
        &self,
        term: &str,
        location: LatLng,
        radius_m: u32,
        limit: u32,
    ) -> Result<Vec<YelpBusiness>, PlacesError> {
        let mut url =
            self.base_url
                .join("businesses/search")
                .map_err(|e| PlacesError::InvalidUrl {
                    url: format!("{}businesses/search", self.base_url),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("latitude", &location.lat.to_string())
            .append_pair("longitude", &location.lng.to_string())
            .append_pair("radius", &radius_m.to_string())
            .append_pair("limit", &limit.to_string());

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || async {
            let response = self.client.get(url.clone()).send().await?;
            let response = response.error_for_status()?;
            Ok(response.text().await?)
        })
        .await?;

        let parsed: YelpSearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("business search for \"{term}\""),
                source: e,
            })?;
        Ok(parsed.businesses)
    }

    /// The single best business match for a place, if Yelp knows one.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::business_search`].
    pub async fn best_match(
        &self,
        term: &str,
        location: LatLng,
    ) -> Result<Option<YelpBusiness>, PlacesError> {
        let businesses = self.business_search(term, location, 100, 1).await?;
        Ok(businesses.into_iter().next())
    }
}
