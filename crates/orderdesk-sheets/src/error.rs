use thiserror::Error;

/// Errors returned by the Google Sheets client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// Token minting or exchange failed.
    #[error("Google auth error: {0}")]
    Auth(String),

    #[error("invalid service account key {path}: {reason}")]
    ServiceAccountKey { path: String, reason: String },

    /// The worksheet header lacks a column the order log depends on.
    #[error("worksheet has no \"{0}\" column")]
    MissingColumn(String),

    #[error("invalid Sheets API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
