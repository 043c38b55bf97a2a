//! Result List Synchronizer: the sidebar list beside the map.

use serde::Serialize;

use crate::links::{call_url, directions_url};
use crate::view::{FacilityView, ResultView};

pub const NO_FACILITIES_HEADING: &str = "No facilities found";
pub const NO_FACILITIES_HINT: &str =
    "Try increasing the search radius or selecting a different facility type.";
pub const SEARCH_FAILED_HEADING: &str = "Search Error";
pub const RETRY_LABEL: &str = "Try Again";
pub const LOADING_MESSAGE: &str = "Loading medical facilities...";
pub const DISTANCE_UNKNOWN: &str = "Distance unknown";
pub const EMPTY_DEFAULTS_MESSAGE: &str = "No medical facilities found in the database.";
/// Area named in the default-load summary; matches the initial map view.
pub const DEFAULT_AREA: &str = "Delhi";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub display_index: usize,
    pub name: String,
    pub category_label: &'static str,
    pub address: String,
    /// `"14.4 km away"` or [`DISTANCE_UNKNOWN`].
    pub distance: String,
    pub hours: Option<String>,
    pub directions_url: String,
    pub call_url: Option<String>,
}

impl ListItem {
    fn from_view(item: &FacilityView, view: &ResultView) -> Self {
        let record = &item.record;
        Self {
            display_index: item.display_index,
            name: record.name.clone(),
            category_label: record.category.label(),
            address: record.address.clone(),
            distance: format_distance(item.distance_km),
            hours: record.hours.clone(),
            directions_url: directions_url(view.reference(), record.coordinate),
            call_url: record.phone.as_deref().map(call_url),
        }
    }
}

#[must_use]
pub fn format_distance(distance_km: Option<f64>) -> String {
    distance_km.map_or_else(|| DISTANCE_UNKNOWN.to_string(), |d| format!("{d:.1} km away"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListContent {
    Loading,
    Items { items: Vec<ListItem> },
    /// Nothing within the search area.
    NoFacilities,
    /// The unfiltered default load came back empty.
    NoDefaultFacilities,
    /// Something broke; offer a retry.
    SearchFailed { message: String },
}

impl ListContent {
    /// Heading and body copy for the placeholder states.
    #[must_use]
    pub fn placeholder(&self) -> Option<(&'static str, String)> {
        match self {
            Self::Loading => Some(("", LOADING_MESSAGE.to_string())),
            Self::Items { .. } => None,
            Self::NoFacilities => Some((NO_FACILITIES_HEADING, NO_FACILITIES_HINT.to_string())),
            Self::NoDefaultFacilities => Some(("", EMPTY_DEFAULTS_MESSAGE.to_string())),
            Self::SearchFailed { message } => Some((SEARCH_FAILED_HEADING, message.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultList {
    content: ListContent,
    summary: Option<String>,
}

impl Default for ResultList {
    fn default() -> Self {
        Self {
            content: ListContent::Loading,
            summary: None,
        }
    }
}

impl ResultList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content(&self) -> &ListContent {
        &self.content
    }

    /// "Found N medical facilities near your location", once a search settles.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn set_loading(&mut self) {
        self.content = ListContent::Loading;
    }

    /// Rebuilds the list from `view`; an empty view shows the
    /// [`ListContent::NoFacilities`] placeholder.
    pub fn render(&mut self, view: &ResultView) {
        self.summary = Some(format!(
            "Found {} medical facilities near your location",
            view.len()
        ));
        self.fill(view, ListContent::NoFacilities);
    }

    /// Rebuilds the list from the unfiltered default load. There is no
    /// search radius yet, so the empty state has its own copy.
    pub fn render_defaults(&mut self, view: &ResultView) {
        self.summary = Some(format!(
            "Showing {} medical facilities in {DEFAULT_AREA} area",
            view.len()
        ));
        self.fill(view, ListContent::NoDefaultFacilities);
    }

    fn fill(&mut self, view: &ResultView, empty: ListContent) {
        if view.is_empty() {
            self.content = empty;
            return;
        }
        let items = view
            .items()
            .iter()
            .map(|item| ListItem::from_view(item, view))
            .collect();
        self.content = ListContent::Items { items };
    }

    pub fn render_failure(&mut self, message: &str) {
        self.content = ListContent::SearchFailed {
            message: message.to_string(),
        };
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        match &self.content {
            ListContent::Items { items } => items,
            _ => &[],
        }
    }
}
