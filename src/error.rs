//! Error types for the species gallery pipeline

use thiserror::Error;

/// Faults raised while talking to the MediaWiki API.
///
/// Image probes never produce one of these; they fall back to the
/// placeholder instead.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-level failure (DNS, connection refused, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{what} request returned HTTP {status}")]
    Status { what: &'static str, status: u16 },

    /// The body could not be decoded as JSON
    #[error("Failed to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The API reported an error object instead of a result
    #[error("MediaWiki API error {code}: {info}")]
    Api { code: String, info: String },

    /// The JSON body did not have the expected shape
    #[error("Unexpected {what} response: missing `{field}`")]
    Structure {
        what: &'static str,
        field: &'static str,
    },

    /// The configured API endpoint is not a valid URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, FetchError>;
