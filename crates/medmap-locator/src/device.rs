//! Device geolocation seam.
//!
//! The platform location service is abstracted behind [`PositionProvider`];
//! the resolver bounds every request with its own timeout so a provider that
//! never answers still resolves into [`PositionError::Timeout`].

use std::future::Future;
use std::time::Duration;

use medmap_core::Coordinate;
use thiserror::Error;

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the provider may return. Zero means a fresh fix.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    pub coordinate: Coordinate,
    /// Reported accuracy radius in metres, when the provider knows it.
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl PositionError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location access denied. Please enable location services.",
            Self::PositionUnavailable => "Location information unavailable.",
            Self::Timeout => "Location request timed out.",
            Self::Unknown(_) => "An unknown error occurred while getting location.",
        }
    }
}

/// A source of the user's current position.
pub trait PositionProvider {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<DevicePosition, PositionError>> + Send;
}

/// Reports a configured coordinate, e.g. from `MEDMAP_DEVICE_POSITION`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider {
    position: DevicePosition,
}

impl FixedPositionProvider {
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            position: DevicePosition {
                coordinate,
                accuracy_m: None,
            },
        }
    }
}

impl PositionProvider for FixedPositionProvider {
    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<DevicePosition, PositionError>> + Send {
        let position = self.position;
        async move { Ok(position) }
    }
}

/// Stand-in for hosts without any location service.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePositionProvider;

impl PositionProvider for UnavailablePositionProvider {
    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<DevicePosition, PositionError>> + Send {
        async { Err(PositionError::PositionUnavailable) }
    }
}

/// Runs one position request bounded by `options.timeout`.
pub(crate) async fn request_position<P>(
    provider: &P,
    options: &PositionOptions,
) -> Result<DevicePosition, PositionError>
where
    P: PositionProvider,
{
    match tokio::time::timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(PositionError::Timeout),
    }
}
