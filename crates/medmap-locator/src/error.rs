use thiserror::Error;

use crate::device::PositionError;

/// Copy shown when a place search cannot reach the geocoding provider.
pub const LOCATION_SEARCH_FAILED_MESSAGE: &str = "Error searching for location. Please try again.";

/// Copy shown when neither geocoding stage matched anything.
pub const LOCATION_NOT_FOUND_MESSAGE: &str =
    "Location not found. Please try a different address or hospital name.";

#[derive(Debug, Error)]
pub enum LocatorError {
    /// Caller supplied something unusable: a blank query, no reference
    /// coordinate, a bad radius. Carries the user-facing copy.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("device location failed: {0}")]
    Position(#[from] PositionError),

    #[error("no place matched \"{query}\"")]
    NotFound { query: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl LocatorError {
    /// Text suitable for the location status banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::Position(err) => err.user_message().to_string(),
            Self::NotFound { .. } => LOCATION_NOT_FOUND_MESSAGE.to_string(),
            Self::Http(_)
            | Self::UnexpectedStatus { .. }
            | Self::Deserialize { .. }
            | Self::InvalidBaseUrl { .. } => LOCATION_SEARCH_FAILED_MESSAGE.to_string(),
        }
    }

    /// `true` for failures of the network or the remote service, as opposed
    /// to input or device problems.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Deserialize { .. }
        )
    }
}
