use thiserror::Error;

/// Errors returned by the upstream shop source client.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or TLS failure, or a non-2xx status from the source.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid source base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// No source URL is configured (`SHOPMATCH_SOURCE_URL`).
    #[error("no shop source URL configured")]
    MissingSourceUrl,
}
