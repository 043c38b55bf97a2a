//! Location Resolver: device position or free-text place search.

use crate::device::{request_position, PositionOptions, PositionProvider};
use crate::error::LocatorError;
use crate::geocode::{GeocodeStage, NominatimClient};
use crate::state::{LocatorState, ReferenceOrigin, ReferencePoint};

/// Copy shown when a place search is submitted blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter an address, city, or ZIP code.";

const DEVICE_LABEL: &str = "Your Location";

pub struct LocationResolver {
    geocoder: NominatimClient,
    position_options: PositionOptions,
}

impl LocationResolver {
    #[must_use]
    pub fn new(geocoder: NominatimClient, position_options: PositionOptions) -> Self {
        Self {
            geocoder,
            position_options,
        }
    }

    /// One-shot device fix. No automatic retry.
    ///
    /// # Errors
    ///
    /// [`LocatorError::Position`] carrying the classified failure.
    pub async fn resolve_by_device<P: PositionProvider>(
        &self,
        provider: &P,
        state: &mut LocatorState,
    ) -> Result<ReferencePoint, LocatorError> {
        let position = request_position(provider, &self.position_options)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "device geolocation failed"))?;
        tracing::info!(
            latitude = position.coordinate.latitude,
            longitude = position.coordinate.longitude,
            accuracy_m = position.accuracy_m,
            "device position resolved"
        );
        let point = ReferencePoint {
            coordinate: position.coordinate,
            label: DEVICE_LABEL.to_string(),
            origin: ReferenceOrigin::Device,
        };
        Ok(state.replace_reference(point).clone())
    }

    /// Geocodes `text` with the two-stage place search.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::InvalidInput`] when `text` is blank. No request is sent.
    /// - [`LocatorError::NotFound`] when neither stage matched.
    /// - A transport-class error when the provider could not be reached.
    pub async fn resolve_by_query(
        &self,
        state: &mut LocatorState,
        text: &str,
    ) -> Result<ReferencePoint, LocatorError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(LocatorError::InvalidInput(EMPTY_QUERY_MESSAGE.to_string()));
        }

        let found = self
            .geocoder
            .locate(query)
            .await
            .inspect_err(|err| tracing::warn!(query, error = %err, "place search failed"))?;

        let origin = match found.stage {
            GeocodeStage::NamedFacility => ReferenceOrigin::NamedPlace,
            GeocodeStage::Place => ReferenceOrigin::Geocoded,
        };
        let point = ReferencePoint {
            coordinate: found.coordinate,
            label: found.display_name,
            origin,
        };
        Ok(state.replace_reference(point).clone())
    }
}
