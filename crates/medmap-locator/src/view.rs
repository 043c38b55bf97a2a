//! One ordered view model shared by the map and the result list.

use medmap_core::{haversine_km, Coordinate, FacilityRecord};
use serde::Serialize;

/// A record with its display index and distance, computed once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityView {
    /// 1-based position shown on both the marker badge and the list item.
    pub display_index: usize,
    pub record: FacilityRecord,
    /// Distance from the reference point; `None` when there is no reference.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultView {
    reference: Option<Coordinate>,
    items: Vec<FacilityView>,
}

impl ResultView {
    /// Assigns display indices in input order. The previous view is never
    /// merged into a new one.
    #[must_use]
    pub fn build(records: Vec<FacilityRecord>, reference: Option<Coordinate>) -> Self {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| FacilityView {
                display_index: i + 1,
                distance_km: reference.map(|r| haversine_km(r, record.coordinate)),
                record,
            })
            .collect();
        Self { reference, items }
    }

    #[must_use]
    pub fn empty(reference: Option<Coordinate>) -> Self {
        Self {
            reference,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn reference(&self) -> Option<Coordinate> {
        self.reference
    }

    #[must_use]
    pub fn items(&self) -> &[FacilityView] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, display_index: usize) -> Option<&FacilityView> {
        display_index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use medmap_core::{Coordinate, FacilityCategory, FacilityRecord, FacilitySource};

    pub(crate) fn record(id: &str, name: &str, lat: f64, lng: f64) -> FacilityRecord {
        FacilityRecord {
            id: id.to_string(),
            name: name.to_string(),
            category: FacilityCategory::Hospital,
            address: "New Delhi".to_string(),
            coordinate: Coordinate::new(lat, lng).unwrap(),
            phone: Some("+91 11 2345 6789".to_string()),
            hours: None,
            wheelchair: None,
            website: None,
            source: FacilitySource::Primary,
        }
    }

    pub(crate) fn delhi() -> Coordinate {
        Coordinate::new(28.6139, 77.209).unwrap()
    }
}
