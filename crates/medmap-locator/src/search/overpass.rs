//! Fallback stage: OpenStreetMap amenities via the Overpass API.
//!
//! Elements come back as either points (`lat`/`lon`) or ways/relations with
//! a computed `center`. Tags are free-form and any of them may be missing, so
//! each element is read field by field from raw JSON rather than through a
//! strict schema.

use medmap_core::{
    CategoryFilter, Coordinate, FacilityCategory, FacilityRecord, FacilitySource, SearchQuery,
};
use reqwest::{Client, Url};
use serde_json::Value;

use super::StageOutcome;
use crate::error::LocatorError;
use crate::http::{endpoint_url, send_json};

const DEFAULT_NAME: &str = "Medical Facility";
const ADDRESS_TAGS: [&str; 4] = ["addr:housenumber", "addr:street", "addr:city", "addr:postcode"];

/// Overpass QL tag selector for a category filter.
fn amenity_selector(filter: CategoryFilter) -> String {
    match filter {
        CategoryFilter::Only(category) => format!("[\"amenity\"=\"{}\"]", category.as_str()),
        CategoryFilter::All => {
            let names: Vec<&str> = CategoryFilter::All
                .categories()
                .into_iter()
                .map(FacilityCategory::as_str)
                .collect();
            format!("[\"amenity\"~\"^({})$\"]", names.join("|"))
        }
    }
}

/// Builds the Overpass QL query for nodes, ways and relations within the
/// query radius. Ways and relations are returned with their centroid.
#[must_use]
pub fn build_overpass_query(query: &SearchQuery) -> String {
    let selector = amenity_selector(query.filter);
    let around = format!(
        "(around:{:.1},{},{})",
        query.radius_meters(),
        query.reference.latitude,
        query.reference.longitude
    );
    format!(
        "[out:json][timeout:25];\n(\n  node{selector}{around};\n  way{selector}{around};\n  relation{selector}{around};\n);\nout center meta;"
    )
}

fn tag<'a>(tags: Option<&'a Value>, key: &str) -> Option<&'a str> {
    tags?.get(key)?.as_str()
}

fn number(value: Option<&Value>) -> Option<f64> {
    let v = value?;
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

fn element_coordinate(element: &Value) -> Option<Coordinate> {
    let point = number(element.get("lat")).zip(number(element.get("lon")));
    let (lat, lon) = point.or_else(|| {
        let center = element.get("center")?;
        number(center.get("lat")).zip(number(center.get("lon")))
    })?;
    Coordinate::new(lat, lon).ok()
}

fn format_address(tags: Option<&Value>) -> String {
    let parts: Vec<&str> = ADDRESS_TAGS
        .iter()
        .filter_map(|key| tag(tags, key))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    FacilityRecord::clean_address(Some(&parts.join(", ")))
}

fn normalize_element(element: &Value, filter: CategoryFilter) -> Option<FacilityRecord> {
    let coordinate = element_coordinate(element)?;
    let tags = element.get("tags");

    let kind = element.get("type").and_then(Value::as_str).unwrap_or("node");
    let id = match element.get("id")? {
        Value::Number(n) => format!("osm:{kind}/{n}"),
        Value::String(s) => format!("osm:{kind}/{s}"),
        _ => return None,
    };

    let category = match tag(tags, "amenity").map(FacilityCategory::from_source) {
        Some(category) if category != FacilityCategory::Unknown => category,
        _ => match filter {
            CategoryFilter::Only(requested) => requested,
            CategoryFilter::All => FacilityCategory::Unknown,
        },
    };

    Some(FacilityRecord {
        id,
        name: FacilityRecord::clean_optional(tag(tags, "name"))
            .unwrap_or_else(|| DEFAULT_NAME.to_string()),
        category,
        address: format_address(tags),
        coordinate,
        phone: FacilityRecord::clean_optional(
            tag(tags, "phone").or_else(|| tag(tags, "contact:phone")),
        ),
        hours: FacilityRecord::clean_optional(tag(tags, "opening_hours")),
        wheelchair: FacilityRecord::clean_optional(tag(tags, "wheelchair")),
        website: FacilityRecord::clean_optional(
            tag(tags, "website").or_else(|| tag(tags, "contact:website")),
        ),
        source: FacilitySource::Overpass,
    })
}

/// Maps an Overpass JSON response to facility records. Elements without a
/// usable coordinate or id are dropped.
#[must_use]
pub fn normalize_elements(response: &Value, filter: CategoryFilter) -> Vec<FacilityRecord> {
    let Some(elements) = response.get("elements").and_then(Value::as_array) else {
        return vec![];
    };
    elements
        .iter()
        .filter_map(|element| normalize_element(element, filter))
        .collect()
}

/// Client for an Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    interpreter_url: Url,
}

impl OverpassClient {
    /// `interpreter_url` is the full endpoint, e.g.
    /// `https://overpass-api.de/api/interpreter`.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidBaseUrl`] if the URL does not parse.
    pub fn new(client: Client, interpreter_url: &str) -> Result<Self, LocatorError> {
        Ok(Self {
            client,
            interpreter_url: endpoint_url(interpreter_url, "")?,
        })
    }

    /// Facilities matching the query filter within its radius.
    pub async fn around(&self, query: &SearchQuery) -> StageOutcome {
        let ql = build_overpass_query(query);
        tracing::debug!(query = ql.as_str(), "overpass query");

        let request = self
            .client
            .post(self.interpreter_url.clone())
            .form(&[("data", ql.as_str())]);
        let response: Value = match send_json(request, "overpass interpreter").await {
            Ok(body) => body,
            Err(err) => return StageOutcome::Failed(err),
        };

        let records = normalize_elements(&response, query.filter);
        tracing::debug!(count = records.len(), "normalised overpass elements");
        StageOutcome::from_records(records)
    }
}

#[cfg(test)]
#[path = "overpass_test.rs"]
mod tests;
