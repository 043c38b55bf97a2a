//! Facility Search Orchestrator.
//!
//! Runs the primary facility API, then the Overpass fallback, and reduces
//! them to exactly one [`SearchOutcome`]. Each stage reports a
//! [`StageOutcome`]; the fallthrough rules live in [`FacilitySearch::search`]:
//!
//! | primary          | fallback         | outcome      |
//! |------------------|------------------|--------------|
//! | records          | not run          | `Found`      |
//! | empty / failed   | records          | `Found`      |
//! | empty / failed   | empty            | `NoResults`  |
//! | empty / failed   | failed           | `Failed`     |

mod overpass;
mod primary;

pub use overpass::{build_overpass_query, normalize_elements, OverpassClient};
pub use primary::FacilityApiClient;

use medmap_core::{FacilityRecord, FacilitySource, SearchQuery};
use serde::Serialize;

use crate::error::LocatorError;

/// Copy for a terminal search failure. Paired with a retry affordance.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search for facilities. Please try again.";

/// Copy for a failed initial (unfiltered) load.
pub const DEFAULT_LOAD_FAILED_MESSAGE: &str = "Unable to load medical facilities. Please try again.";

/// Result of a single source stage.
#[derive(Debug)]
pub enum StageOutcome {
    Records(Vec<FacilityRecord>),
    Empty,
    Failed(LocatorError),
}

impl StageOutcome {
    pub(crate) fn from_records(records: Vec<FacilityRecord>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Records(records)
        }
    }
}

/// Terminal result of a search. Never an `Err`: every path resolves to one
/// of these three.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found {
        records: Vec<FacilityRecord>,
        source: FacilitySource,
    },
    NoResults,
    Failed {
        message: String,
    },
}

impl SearchOutcome {
    /// Whether the UI should offer "Try Again".
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn records(&self) -> &[FacilityRecord] {
        match self {
            Self::Found { records, .. } => records,
            Self::NoResults | Self::Failed { .. } => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FacilitySearch {
    primary: FacilityApiClient,
    fallback: OverpassClient,
}

impl FacilitySearch {
    #[must_use]
    pub fn new(primary: FacilityApiClient, fallback: OverpassClient) -> Self {
        Self { primary, fallback }
    }

    /// Searches around `query.reference`.
    ///
    /// Primary failures are logged and fall through silently; only the
    /// fallback's result reaches the caller.
    pub async fn search(&self, query: &SearchQuery) -> SearchOutcome {
        tracing::info!(
            latitude = query.reference.latitude,
            longitude = query.reference.longitude,
            radius_miles = query.radius_miles,
            filter = query.filter.as_param(),
            "searching nearby facilities"
        );

        match self.primary.nearby(query).await {
            StageOutcome::Records(records) => {
                tracing::info!(count = records.len(), "primary facility API returned results");
                return SearchOutcome::Found {
                    records,
                    source: FacilitySource::Primary,
                };
            }
            StageOutcome::Empty => {
                tracing::debug!("primary facility API returned nothing usable; using Overpass");
            }
            StageOutcome::Failed(err) => {
                tracing::warn!(error = %err, "primary facility API failed; using Overpass");
            }
        }

        match self.fallback.around(query).await {
            StageOutcome::Records(records) => {
                tracing::info!(count = records.len(), "Overpass returned results");
                SearchOutcome::Found {
                    records,
                    source: FacilitySource::Overpass,
                }
            }
            StageOutcome::Empty => {
                tracing::info!("no facilities found by either source");
                SearchOutcome::NoResults
            }
            StageOutcome::Failed(err) => {
                tracing::error!(error = %err, "Overpass fallback failed");
                SearchOutcome::Failed {
                    message: SEARCH_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Unfiltered initial load from the primary API. There is no reference
    /// coordinate yet, so there is no fallback.
    pub async fn load_defaults(&self) -> SearchOutcome {
        match self.primary.defaults().await {
            StageOutcome::Records(records) => {
                tracing::info!(count = records.len(), "loaded default facilities");
                SearchOutcome::Found {
                    records,
                    source: FacilitySource::Primary,
                }
            }
            StageOutcome::Empty => SearchOutcome::NoResults,
            StageOutcome::Failed(err) => {
                tracing::error!(error = %err, "loading default facilities failed");
                SearchOutcome::Failed {
                    message: DEFAULT_LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}
