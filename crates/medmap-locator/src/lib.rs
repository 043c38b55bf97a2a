//! Facility locator: resolve a reference point, search nearby medical
//! facilities with a primary API and an Overpass fallback, and render the
//! result onto a map layer and a result list that share one view model.

pub mod device;
pub mod error;
pub mod geocode;
pub mod http;
pub mod links;
pub mod list;
pub mod map;
pub mod resolver;
pub mod search;
pub mod session;
pub mod state;
pub mod view;

pub use device::{
    DevicePosition, FixedPositionProvider, PositionError, PositionOptions, PositionProvider,
    UnavailablePositionProvider,
};
pub use error::LocatorError;
pub use geocode::{GeocodeMatch, GeocodeStage, NominatimClient};
pub use http::build_client;
pub use list::{ListContent, ListItem, ResultList};
pub use map::{FacilityMarker, MapLayer, Viewport};
pub use resolver::LocationResolver;
pub use search::{FacilityApiClient, FacilitySearch, OverpassClient, SearchOutcome};
pub use session::FacilityLocator;
pub use state::{LocatorState, ReferenceOrigin, ReferencePoint, SearchTicket};
pub use view::{FacilityView, ResultView};
