//! Nominatim place search.

use medmap_core::Coordinate;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::LocatorError;
use crate::http::{endpoint_url, send_json};

/// Which lookup a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeStage {
    /// Points of interest only, so a facility name wins over a street or
    /// district of the same name.
    NamedFacility,
    /// Unrestricted place-name geocode.
    Place,
}

impl GeocodeStage {
    fn limit(self) -> u32 {
        match self {
            Self::NamedFacility => 10,
            Self::Place => 1,
        }
    }
}

/// One ranked Nominatim match. Coordinates arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl NominatimPlace {
    /// Parsed coordinate, or `None` when the strings are not valid degrees.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        Coordinate::new(lat, lon).ok()
    }
}

/// A geocoded match carried forward into the locator state.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub coordinate: Coordinate,
    pub display_name: String,
    pub stage: GeocodeStage,
}

/// Country-scoped client for Nominatim's `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    search_url: Url,
    country_code: String,
    country_name: String,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        client: Client,
        base_url: &str,
        country_code: &str,
        country_name: &str,
    ) -> Result<Self, LocatorError> {
        Ok(Self {
            client,
            search_url: endpoint_url(base_url, "search")?,
            country_code: country_code.to_ascii_lowercase(),
            country_name: country_name.to_string(),
        })
    }

    fn stage_url(&self, text: &str, stage: GeocodeStage) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("format", "json")
                .append_pair("q", &format!("{text} {}", self.country_name))
                .append_pair("limit", &stage.limit().to_string())
                .append_pair("addressdetails", "1")
                .append_pair("countrycodes", &self.country_code);
            if stage == GeocodeStage::NamedFacility {
                pairs.append_pair("layer", "poi");
            }
        }
        url
    }

    /// Runs one stage and returns every match in provider rank order.
    ///
    /// # Errors
    ///
    /// Returns a transport-class [`LocatorError`] on network failure,
    /// non-2xx status or an undecodable body.
    pub async fn search(
        &self,
        text: &str,
        stage: GeocodeStage,
    ) -> Result<Vec<NominatimPlace>, LocatorError> {
        let url = self.stage_url(text, stage);
        tracing::debug!(%url, ?stage, "nominatim search");
        send_json(self.client.get(url), "nominatim search").await
    }

    /// Two-stage lookup: named facility first, then a general place geocode.
    ///
    /// `text` must already be trimmed and non-empty.
    ///
    /// # Errors
    ///
    /// [`LocatorError::NotFound`] when both stages come back empty; a
    /// transport-class error if either request fails.
    pub async fn locate(&self, text: &str) -> Result<GeocodeMatch, LocatorError> {
        for stage in [GeocodeStage::NamedFacility, GeocodeStage::Place] {
            let places = self.search(text, stage).await?;
            if let Some((place, coordinate)) = places
                .iter()
                .find_map(|p| p.coordinate().map(|c| (p, c)))
            {
                tracing::info!(
                    query = text,
                    ?stage,
                    display_name = place.display_name.as_str(),
                    "geocoded place"
                );
                return Ok(GeocodeMatch {
                    coordinate,
                    display_name: place.display_name.clone(),
                    stage,
                });
            }
            tracing::debug!(query = text, ?stage, "geocode stage returned no usable match");
        }
        Err(LocatorError::NotFound {
            query: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NominatimClient {
        NominatimClient::new(
            Client::new(),
            "https://nominatim.openstreetmap.org",
            "IN",
            "India",
        )
        .unwrap()
    }

    #[test]
    fn named_facility_stage_restricts_to_points_of_interest() {
        let url = client().stage_url("AIIMS", GeocodeStage::NamedFacility);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "AIIMS India".into())));
        assert!(pairs.contains(&("limit".into(), "10".into())));
        assert!(pairs.contains(&("countrycodes".into(), "in".into())));
        assert!(pairs.contains(&("layer".into(), "poi".into())));
        assert_eq!(url.path(), "/search");
    }

    #[test]
    fn place_stage_takes_a_single_unrestricted_match() {
        let url = client().stage_url("Karol Bagh", GeocodeStage::Place);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("limit".into(), "1".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "layer"));
    }

    #[test]
    fn place_with_unparseable_coordinate_has_none() {
        let place = NominatimPlace {
            lat: "north".into(),
            lon: "77.2".into(),
            display_name: String::new(),
            class: None,
            kind: None,
        };
        assert!(place.coordinate().is_none());
    }
}
