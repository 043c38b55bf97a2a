//! Primary stage: the platform's `/health/api/nearby-facilities` endpoint.

use medmap_core::{Coordinate, FacilityCategory, FacilityRecord, FacilitySource, SearchQuery};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::StageOutcome;
use crate::error::LocatorError;
use crate::http::{endpoint_url, send_json};

const NEARBY_PATH: &str = "health/api/nearby-facilities";

#[derive(Debug, Deserialize)]
struct NearbyFacilitiesResponse {
    /// Absent on older deployments; only an explicit `false` is a failure.
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    facilities: Vec<ApiFacility>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiFacility {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    hours: Option<String>,
    #[serde(default)]
    wheelchair: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

impl ApiFacility {
    fn into_record(self) -> Option<FacilityRecord> {
        let coordinate = Coordinate::new(self.lat?, self.lng?).ok()?;
        let id = match &self.id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => return None,
            other => other.to_string(),
        };
        Some(FacilityRecord {
            id,
            name: FacilityRecord::clean_optional(self.name.as_deref())
                .unwrap_or_else(|| "Medical Facility".to_string()),
            category: self
                .kind
                .as_deref()
                .map_or(FacilityCategory::Unknown, FacilityCategory::from_source),
            address: FacilityRecord::clean_address(self.address.as_deref()),
            coordinate,
            phone: FacilityRecord::clean_optional(self.phone.as_deref()),
            hours: FacilityRecord::clean_optional(self.hours.as_deref()),
            wheelchair: FacilityRecord::clean_optional(self.wheelchair.as_deref()),
            website: FacilityRecord::clean_optional(self.website.as_deref()),
            source: FacilitySource::Primary,
        })
    }
}

/// Client for the platform facility API.
#[derive(Debug, Clone)]
pub struct FacilityApiClient {
    client: Client,
    nearby_url: Url,
}

impl FacilityApiClient {
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(client: Client, base_url: &str) -> Result<Self, LocatorError> {
        Ok(Self {
            client,
            nearby_url: endpoint_url(base_url, NEARBY_PATH)?,
        })
    }

    fn nearby_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.nearby_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &query.reference.latitude.to_string())
            .append_pair("lng", &query.reference.longitude.to_string())
            .append_pair("radius", &query.radius_miles.to_string())
            .append_pair("type", query.filter.as_param());
        url
    }

    /// Facilities around the query's reference coordinate.
    pub async fn nearby(&self, query: &SearchQuery) -> StageOutcome {
        self.fetch(self.nearby_url(query)).await
    }

    /// The endpoint's unfiltered default set (no `lat`/`lng`).
    pub async fn defaults(&self) -> StageOutcome {
        self.fetch(self.nearby_url.clone()).await
    }

    async fn fetch(&self, url: Url) -> StageOutcome {
        let response: NearbyFacilitiesResponse =
            match send_json(self.client.get(url), "nearby facilities").await {
                Ok(body) => body,
                Err(err) => return StageOutcome::Failed(err),
            };

        if response.success == Some(false) {
            tracing::debug!(
                error = response.error.as_deref().unwrap_or("unspecified"),
                "facility API reported success=false"
            );
            return StageOutcome::Empty;
        }

        let total = response.facilities.len();
        let records: Vec<FacilityRecord> = response
            .facilities
            .into_iter()
            .filter_map(ApiFacility::into_record)
            .collect();
        if records.len() < total {
            tracing::debug!(
                dropped = total - records.len(),
                "skipped facility API entries without a usable id or coordinate"
            );
        }
        StageOutcome::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use medmap_core::CategoryFilter;

    use super::*;

    fn facility(json: serde_json::Value) -> ApiFacility {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn nearby_url_carries_query_parameters() {
        let api = FacilityApiClient::new(Client::new(), "http://127.0.0.1:5000").unwrap();
        let query = SearchQuery::new(
            Coordinate::new(28.6139, 77.209).unwrap(),
            5.0,
            CategoryFilter::Only(FacilityCategory::Clinic),
        )
        .unwrap();
        let url = api.nearby_url(&query);
        assert_eq!(url.path(), "/health/api/nearby-facilities");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("lat".to_string(), "28.6139".to_string()),
                ("lng".to_string(), "77.209".to_string()),
                ("radius".to_string(), "5".to_string()),
                ("type".to_string(), "clinic".to_string()),
            ]
        );
    }

    #[test]
    fn api_placeholders_normalise_to_none() {
        let record = facility(serde_json::json!({
            "id": 7,
            "name": "Safdarjung Hospital",
            "type": "Hospital",
            "address": null,
            "lat": 28.5687,
            "lng": 77.2066,
            "phone": "Not available",
            "hours": "Hours not available",
            "services": "General medical services"
        }))
        .into_record()
        .unwrap();
        assert_eq!(record.id, "7");
        assert_eq!(record.category, FacilityCategory::Hospital);
        assert_eq!(record.address, medmap_core::ADDRESS_PLACEHOLDER);
        assert!(record.phone.is_none());
        assert!(record.hours.is_none());
        assert_eq!(record.source, FacilitySource::Primary);
    }

    #[test]
    fn entry_without_coordinate_is_dropped() {
        let entry = facility(serde_json::json!({"id": "x", "name": "Nowhere Clinic", "lat": 28.5}));
        assert!(entry.into_record().is_none());
    }

    #[test]
    fn unrecognised_service_type_maps_to_unknown() {
        let record = facility(serde_json::json!({
            "id": "mh-1", "name": "Wellness Centre", "type": "mental health",
            "lat": 28.6, "lng": 77.2
        }))
        .into_record()
        .unwrap();
        assert_eq!(record.category, FacilityCategory::Unknown);
    }
}
