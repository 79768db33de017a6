use thiserror::Error;

/// Errors returned by the place-provider clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google answered 200 but with a non-OK `status` field in the body.
    #[error("Google Places status {status}: {message}")]
    Status { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request URL could not be built from the configured base URL.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl PlacesError {
    /// True when the provider reported that the requested place does not
    /// exist (`NOT_FOUND` / `ZERO_RESULTS` on a detail lookup).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PlacesError::Status { status, .. } if status == "NOT_FOUND" || status == "ZERO_RESULTS"
        )
    }
}
