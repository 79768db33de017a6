use thiserror::Error;

/// Errors returned by the event-provider clients.
#[derive(Debug, Error)]
pub enum EventsError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an application-level error body.
    #[error("event provider error: {0}")]
    ApiError(String),

    /// The requested event does not exist.
    #[error("event not found: {event_id}")]
    NotFound { event_id: String },

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
