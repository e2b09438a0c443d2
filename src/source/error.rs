//! Error types for the track data sources.

use thiserror::Error;

/// Errors surfaced by the catalog and local-library sources.
///
/// The `Display` output is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Server answered with an error status or an error payload
    #[error("Network error: {0}")]
    Network(String),

    /// Transport failure (connect, timeout, broken body)
    #[error("IO error: {0}")]
    Io(String),

    /// Anything else, e.g. an unexpected response shape
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Error loading local tracks: {0}")]
    LocalLoad(String),

    #[error("Error searching local tracks: {0}")]
    LocalSearch(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            SourceError::Network(format!("HTTP {}", status))
        } else if error.is_decode() {
            SourceError::Unknown(error.to_string())
        } else {
            SourceError::Io(error.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(error: serde_json::Error) -> Self {
        SourceError::Unknown(error.to_string())
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_their_category() {
        assert_eq!(
            SourceError::Network("HTTP 500 Internal Server Error".into()).to_string(),
            "Network error: HTTP 500 Internal Server Error"
        );
        assert_eq!(SourceError::Io("timed out".into()).to_string(), "IO error: timed out");
        assert_eq!(SourceError::Unknown("bad".into()).to_string(), "Unknown error: bad");
        assert_eq!(
            SourceError::LocalLoad("missing".into()).to_string(),
            "Error loading local tracks: missing"
        );
        assert_eq!(
            SourceError::LocalSearch("missing".into()).to_string(),
            "Error searching local tracks: missing"
        );
    }

    #[test]
    fn json_errors_are_unknown() {
        let error = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(SourceError::from(error), SourceError::Unknown(_)));
    }
}
