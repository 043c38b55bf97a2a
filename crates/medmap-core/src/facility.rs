//! Facility records and search queries shared by every locator stage.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::CoreError;

/// Address shown when a source provides nothing usable.
pub const ADDRESS_PLACEHOLDER: &str = "Address not available";

/// Strings upstream sources use in place of a missing value.
const MISSING_VALUE_MARKERS: &[&str] = &[
    "not available",
    "hours not specified",
    "hours not available",
    "unknown",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityCategory {
    Hospital,
    Clinic,
    Pharmacy,
    Dentist,
    Doctors,
    Unknown,
}

impl FacilityCategory {
    /// The five categories a search can be restricted to.
    pub const SEARCHABLE: [FacilityCategory; 5] = [
        FacilityCategory::Hospital,
        FacilityCategory::Clinic,
        FacilityCategory::Doctors,
        FacilityCategory::Pharmacy,
        FacilityCategory::Dentist,
    ];

    /// Lenient parse used on source data: anything unrecognised is `Unknown`.
    #[must_use]
    pub fn from_source(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hospital" => Self::Hospital,
            "clinic" => Self::Clinic,
            "pharmacy" => Self::Pharmacy,
            "dentist" => Self::Dentist,
            "doctors" => Self::Doctors,
            _ => Self::Unknown,
        }
    }

    /// Tag value used by OpenStreetMap's `amenity` key and the facility API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Clinic => "clinic",
            Self::Pharmacy => "pharmacy",
            Self::Dentist => "dentist",
            Self::Doctors => "doctors",
            Self::Unknown => "unknown",
        }
    }

    /// Capitalised label shown under the facility name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hospital => "Hospital",
            Self::Clinic => "Clinic",
            Self::Pharmacy => "Pharmacy",
            Self::Dentist => "Dentist",
            Self::Doctors => "Doctors",
            Self::Unknown => "Unknown",
        }
    }

    /// Font Awesome class for the marker badge.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Hospital => "fas fa-hospital",
            Self::Clinic => "fas fa-clinic-medical",
            Self::Doctors => "fas fa-user-md",
            Self::Pharmacy => "fas fa-pills",
            Self::Dentist => "fas fa-tooth",
            Self::Unknown => "fas fa-map-marker-alt",
        }
    }
}

impl std::fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facility-type restriction for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(FacilityCategory),
}

impl CategoryFilter {
    /// Value sent as the facility API's `type` parameter.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }

    /// Categories this filter admits.
    #[must_use]
    pub fn categories(self) -> Vec<FacilityCategory> {
        match self {
            Self::All => FacilityCategory::SEARCHABLE.to_vec(),
            Self::Only(category) => vec![category],
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match FacilityCategory::from_source(trimmed) {
            FacilityCategory::Unknown => Err(CoreError::UnknownCategory(trimmed.to_string())),
            category => Ok(Self::Only(category)),
        }
    }
}

/// Which data source produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilitySource {
    /// The platform's own `/health/api/nearby-facilities` endpoint.
    Primary,
    /// OpenStreetMap data via the Overpass API.
    Overpass,
}

/// A medical facility, normalised from whichever source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: String,
    pub name: String,
    pub category: FacilityCategory,
    pub address: String,
    pub coordinate: Coordinate,
    pub phone: Option<String>,
    pub hours: Option<String>,
    /// OSM `wheelchair` tag value (`yes`, `limited`, `no`).
    pub wheelchair: Option<String>,
    pub website: Option<String>,
    pub source: FacilitySource,
}

impl FacilityRecord {
    /// Normalises an optional free-text field: trims, drops empties and the
    /// placeholder strings sources send instead of null.
    #[must_use]
    pub fn clean_optional(raw: Option<&str>) -> Option<String> {
        let value = raw?.trim();
        if value.is_empty() {
            return None;
        }
        let lowered = value.to_ascii_lowercase();
        if MISSING_VALUE_MARKERS.contains(&lowered.as_str()) {
            return None;
        }
        Some(value.to_string())
    }

    /// Address text, falling back to [`ADDRESS_PLACEHOLDER`].
    #[must_use]
    pub fn clean_address(raw: Option<&str>) -> String {
        Self::clean_optional(raw).unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string())
    }
}

/// A facility search centred on a resolved reference coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchQuery {
    pub reference: Coordinate,
    /// Search radius in miles.
    pub radius_miles: f64,
    pub filter: CategoryFilter,
}

impl SearchQuery {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] unless `radius_miles` is finite
    /// and positive.
    pub fn new(
        reference: Coordinate,
        radius_miles: f64,
        filter: CategoryFilter,
    ) -> Result<Self, CoreError> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(CoreError::InvalidRadius(radius_miles));
        }
        Ok(Self {
            reference,
            radius_miles,
            filter,
        })
    }

    #[must_use]
    pub fn radius_meters(&self) -> f64 {
        self.radius_miles * crate::geo::MILES_TO_METERS
    }
}
