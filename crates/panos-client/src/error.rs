//! PAN-OS client errors

use thiserror::Error;

/// Errors that can occur when interacting with a PAN-OS device
#[derive(Debug, Error)]
pub enum PanosError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with `status="error"`
    #[error("PAN-OS API error (code {code}): {message}")]
    Api {
        /// Response code attribute, 0 when the device sent none
        code: u32,
        /// Joined `msg` lines from the response
        message: String,
    },

    /// A read of an entry path returned no entry
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Malformed XML payload
    #[error("XML error: {0}")]
    Xml(String),

    /// A well-formed payload carried a field that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Device software version string could not be parsed
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Unknown interface mode name
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON credentials file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The first phase of a two-phase operation committed, the second failed.
    ///
    /// `committed` lists the names whose first-phase effect is in place on
    /// the device. Nothing is rolled back.
    #[error("{operation} partially applied to {committed:?}: {source}")]
    Partial {
        /// Operation name, e.g. "set" or "delete"
        operation: &'static str,
        /// Names committed by the first phase
        committed: Vec<String>,
        /// Second-phase failure
        source: Box<PanosError>,
    },
}

impl PanosError {
    /// Returns true when this error left the first phase of a write committed.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}
