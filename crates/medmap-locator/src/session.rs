//! The locator session: one owner for the reference point, the current view
//! and both renderers.

use medmap_core::{AppConfig, CategoryFilter, SearchQuery};

use crate::device::{PositionOptions, PositionProvider};
use crate::error::LocatorError;
use crate::geocode::NominatimClient;
use crate::http::build_client;
use crate::list::ResultList;
use crate::map::{FacilityMarker, MapLayer};
use crate::resolver::LocationResolver;
use crate::search::{FacilityApiClient, FacilitySearch, OverpassClient, SearchOutcome};
use crate::state::{LocatorState, ReferencePoint, SearchTicket};
use crate::view::ResultView;

/// Copy for a search attempted before any location was resolved.
pub const NO_REFERENCE_MESSAGE: &str = "Please find your location first.";

/// Which list copy a settled outcome is rendered with.
#[derive(Debug, Clone, Copy)]
enum RenderKind {
    Nearby,
    Defaults,
}

pub struct FacilityLocator {
    resolver: LocationResolver,
    search: FacilitySearch,
    state: LocatorState,
    view: ResultView,
    map: MapLayer,
    list: ResultList,
}

impl FacilityLocator {
    #[must_use]
    pub fn new(resolver: LocationResolver, search: FacilitySearch) -> Self {
        Self {
            resolver,
            search,
            state: LocatorState::new(),
            view: ResultView::default(),
            map: MapLayer::new(),
            list: ResultList::new(),
        }
    }

    /// Wires every client from `config`, sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Http`] if the HTTP client cannot be built, or
    /// [`LocatorError::InvalidBaseUrl`] for an unparseable endpoint.
    pub fn from_config(config: &AppConfig) -> Result<Self, LocatorError> {
        let client = build_client(config.request_timeout_secs, &config.user_agent)?;
        let geocoder = NominatimClient::new(
            client.clone(),
            &config.nominatim_url,
            &config.country_code,
            &config.country_name,
        )?;
        let options = PositionOptions {
            timeout: config.geolocation_timeout(),
            ..PositionOptions::default()
        };
        let search = FacilitySearch::new(
            FacilityApiClient::new(client.clone(), &config.facilities_api_url)?,
            OverpassClient::new(client, &config.overpass_url)?,
        );
        Ok(Self::new(LocationResolver::new(geocoder, options), search))
    }

    #[must_use]
    pub fn state(&self) -> &LocatorState {
        &self.state
    }

    #[must_use]
    pub fn view(&self) -> &ResultView {
        &self.view
    }

    #[must_use]
    pub fn map(&self) -> &MapLayer {
        &self.map
    }

    #[must_use]
    pub fn list(&self) -> &ResultList {
        &self.list
    }

    /// # Errors
    ///
    /// Propagates the resolver's [`LocatorError`]; the previous reference
    /// point is kept on failure.
    pub async fn locate_with_device<P: PositionProvider>(
        &mut self,
        provider: &P,
    ) -> Result<ReferencePoint, LocatorError> {
        let point = self
            .resolver
            .resolve_by_device(provider, &mut self.state)
            .await?;
        self.adopt_reference(&point);
        Ok(point)
    }

    /// # Errors
    ///
    /// Propagates the resolver's [`LocatorError`]; the previous reference
    /// point is kept on failure.
    pub async fn locate_by_query(&mut self, text: &str) -> Result<ReferencePoint, LocatorError> {
        let point = self.resolver.resolve_by_query(&mut self.state, text).await?;
        self.adopt_reference(&point);
        Ok(point)
    }

    fn adopt_reference(&mut self, point: &ReferencePoint) {
        self.view = ResultView::empty(Some(point.coordinate));
        self.map.show_reference(point);
    }

    /// Issues a ticket and builds the query for a search around the current
    /// reference point. The list switches to its loading state.
    ///
    /// # Errors
    ///
    /// [`LocatorError::InvalidInput`] when no location has been resolved yet
    /// or the radius is not a positive number.
    pub fn prepare_search(
        &mut self,
        radius_miles: f64,
        filter: CategoryFilter,
    ) -> Result<(SearchTicket, SearchQuery), LocatorError> {
        let reference = self
            .state
            .coordinate()
            .ok_or_else(|| LocatorError::InvalidInput(NO_REFERENCE_MESSAGE.to_string()))?;
        let query = SearchQuery::new(reference, radius_miles, filter)
            .map_err(|err| LocatorError::InvalidInput(err.to_string()))?;
        let ticket = self.state.begin_search();
        self.list.set_loading();
        Ok((ticket, query))
    }

    /// An owned handle on the search clients, so a search can run while the
    /// session issues further tickets.
    #[must_use]
    pub fn searcher(&self) -> FacilitySearch {
        self.search.clone()
    }

    /// Renders `outcome` if `ticket` is still the latest search. Returns
    /// whether anything was rendered.
    pub fn apply(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        self.apply_as(ticket, outcome, RenderKind::Nearby)
    }

    fn apply_as(&mut self, ticket: SearchTicket, outcome: SearchOutcome, kind: RenderKind) -> bool {
        if !self.state.is_current(ticket) {
            tracing::debug!(?ticket, "discarding stale search result");
            return false;
        }

        let reference = self.state.reference().cloned();
        let coordinate = reference.as_ref().map(|r| r.coordinate);
        let failure = match outcome {
            SearchOutcome::Found { records, .. } => {
                self.view = ResultView::build(records, coordinate);
                None
            }
            SearchOutcome::NoResults => {
                self.view = ResultView::empty(coordinate);
                None
            }
            SearchOutcome::Failed { message } => {
                self.view = ResultView::empty(coordinate);
                Some(message)
            }
        };

        self.map.render(&self.view, reference.as_ref());
        match (failure, kind) {
            (Some(message), _) => self.list.render_failure(&message),
            (None, RenderKind::Nearby) => self.list.render(&self.view),
            (None, RenderKind::Defaults) => self.list.render_defaults(&self.view),
        }
        true
    }

    /// Searches around the current reference point and renders the result.
    ///
    /// # Errors
    ///
    /// Only the input errors of [`Self::prepare_search`]; remote failures
    /// come back as [`SearchOutcome::Failed`].
    pub async fn search(
        &mut self,
        radius_miles: f64,
        filter: CategoryFilter,
    ) -> Result<SearchOutcome, LocatorError> {
        let (ticket, query) = self.prepare_search(radius_miles, filter)?;
        let outcome = self.search.search(&query).await;
        self.apply(ticket, outcome.clone());
        Ok(outcome)
    }

    /// Geocodes `text` and, once the new reference point is in place,
    /// searches around it.
    ///
    /// # Errors
    ///
    /// The resolver's error when the place cannot be found, or the input
    /// errors of [`Self::prepare_search`].
    pub async fn locate_and_search(
        &mut self,
        text: &str,
        radius_miles: f64,
        filter: CategoryFilter,
    ) -> Result<(ReferencePoint, SearchOutcome), LocatorError> {
        let point = self.locate_by_query(text).await?;
        let outcome = self.search(radius_miles, filter).await?;
        Ok((point, outcome))
    }

    /// Loads the unfiltered default set. Counts as a search for staleness.
    pub async fn load_defaults(&mut self) -> SearchOutcome {
        let ticket = self.state.begin_search();
        self.list.set_loading();
        let outcome = self.search.load_defaults().await;
        self.apply_as(ticket, outcome.clone(), RenderKind::Defaults);
        outcome
    }

    /// Focuses the marker for a clicked list item.
    pub fn select(&mut self, display_index: usize) -> Option<&FacilityMarker> {
        self.map.focus(display_index)
    }
}
