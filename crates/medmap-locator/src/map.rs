//! Map Render Layer.
//!
//! Holds the markers currently on the map and the viewport. Rendering always
//! clears and rebuilds; nothing is diffed.

use medmap_core::{BoundingBox, Coordinate, FacilityCategory};
use serde::Serialize;

use crate::links::{call_url, directions_url};
use crate::state::{ReferenceOrigin, ReferencePoint};
use crate::view::{FacilityView, ResultView};

/// Fraction of the marker span added on each side when fitting bounds.
pub const FIT_PADDING: f64 = 0.1;
/// Zoom used when centring on a single facility.
pub const FOCUS_ZOOM: u8 = 16;
pub const DEFAULT_ZOOM: u8 = 11;

/// Initial view over central New Delhi.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 28.6139,
    longitude: 77.2090,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Center { center: Coordinate, zoom: u8 },
    Bounds(BoundingBox),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceMarker {
    pub coordinate: Coordinate,
    pub popup: String,
    pub origin: ReferenceOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub category_label: &'static str,
    pub address: String,
    pub phone: Option<String>,
    pub directions_url: String,
    pub call_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityMarker {
    /// Number drawn on the badge; equals the list item's display index.
    pub display_index: usize,
    pub coordinate: Coordinate,
    pub name: String,
    pub category: FacilityCategory,
    pub icon: &'static str,
    pub popup: Popup,
}

impl FacilityMarker {
    fn from_view(item: &FacilityView, reference: Option<Coordinate>) -> Self {
        let record = &item.record;
        Self {
            display_index: item.display_index,
            coordinate: record.coordinate,
            name: record.name.clone(),
            category: record.category,
            icon: record.category.icon(),
            popup: Popup {
                title: record.name.clone(),
                category_label: record.category.label(),
                address: record.address.clone(),
                phone: record.phone.clone(),
                directions_url: directions_url(reference, record.coordinate),
                call_url: record.phone.as_deref().map(call_url),
            },
        }
    }
}

fn zoom_for(origin: ReferenceOrigin) -> u8 {
    match origin {
        ReferenceOrigin::NamedPlace => 16,
        ReferenceOrigin::Device | ReferenceOrigin::Geocoded => 15,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    reference: Option<ReferenceMarker>,
    markers: Vec<FacilityMarker>,
    viewport: Viewport,
    open_popup: Option<usize>,
}

impl Default for MapLayer {
    fn default() -> Self {
        Self {
            reference: None,
            markers: Vec::new(),
            viewport: Viewport::Center {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            open_popup: None,
        }
    }
}

impl MapLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn markers(&self) -> &[FacilityMarker] {
        &self.markers
    }

    #[must_use]
    pub fn reference_marker(&self) -> Option<&ReferenceMarker> {
        self.reference.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Display index of the marker whose popup is open.
    #[must_use]
    pub fn open_popup(&self) -> Option<usize> {
        self.open_popup
    }

    /// Removes every marker, including the reference marker.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.reference = None;
        self.open_popup = None;
    }

    /// Recentres on a freshly resolved reference point and drops the
    /// facility markers of the previous location.
    pub fn show_reference(&mut self, point: &ReferencePoint) {
        self.clear();
        self.reference = Some(Self::reference_marker_for(point));
        self.viewport = Viewport::Center {
            center: point.coordinate,
            zoom: zoom_for(point.origin),
        };
    }

    fn reference_marker_for(point: &ReferencePoint) -> ReferenceMarker {
        ReferenceMarker {
            coordinate: point.coordinate,
            popup: point.label.clone(),
            origin: point.origin,
        }
    }

    /// Replaces all facility markers with one per view item, restores the
    /// reference marker and fits the viewport to everything shown.
    pub fn render(&mut self, view: &ResultView, reference: Option<&ReferencePoint>) {
        self.clear();
        self.reference = reference.map(Self::reference_marker_for);
        self.markers = view
            .items()
            .iter()
            .map(|item| FacilityMarker::from_view(item, view.reference()))
            .collect();

        if let Some(bounds) = self.fitted_bounds() {
            self.viewport = Viewport::Bounds(bounds);
        }
        tracing::debug!(
            markers = self.markers.len(),
            has_reference = self.reference.is_some(),
            "map rendered"
        );
    }

    /// Padded bounds over the reference and facility markers. `None` when
    /// there are no facility markers.
    fn fitted_bounds(&self) -> Option<BoundingBox> {
        if self.markers.is_empty() {
            return None;
        }
        let coords = self
            .reference
            .iter()
            .map(|r| r.coordinate)
            .chain(self.markers.iter().map(|m| m.coordinate));
        BoundingBox::enclosing(coords).map(|b| b.pad(FIT_PADDING))
    }

    /// Centres on marker `display_index` and opens its popup.
    pub fn focus(&mut self, display_index: usize) -> Option<&FacilityMarker> {
        let marker = display_index
            .checked_sub(1)
            .and_then(|i| self.markers.get(i))?;
        self.viewport = Viewport::Center {
            center: marker.coordinate,
            zoom: FOCUS_ZOOM,
        };
        self.open_popup = Some(display_index);
        Some(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::fixtures::{delhi, record};

    fn reference() -> ReferencePoint {
        ReferencePoint {
            coordinate: delhi(),
            label: "Your Location".to_string(),
            origin: ReferenceOrigin::Device,
        }
    }

    #[test]
    fn render_assigns_badges_in_order_and_restores_reference() {
        let mut map = MapLayer::new();
        let view = ResultView::build(
            vec![
                record("a", "Lok Nayak", 28.6390, 77.2390),
                record("b", "RML", 28.6260, 77.2010),
            ],
            Some(delhi()),
        );
        map.render(&view, Some(&reference()));

        assert_eq!(map.markers().len(), 2);
        assert_eq!(map.markers()[0].display_index, 1);
        assert_eq!(map.markers()[0].name, "Lok Nayak");
        assert_eq!(map.markers()[1].display_index, 2);
        assert_eq!(map.markers()[0].icon, "fas fa-hospital");
        assert!(map.reference_marker().is_some());
        assert_eq!(
            map.markers()[0].popup.call_url.as_deref(),
            Some("tel:+911123456789")
        );
    }

    #[test]
    fn viewport_covers_reference_and_markers_with_padding() {
        let mut map = MapLayer::new();
        let view = ResultView::build(vec![record("a", "North", 28.7041, 77.1025)], Some(delhi()));
        map.render(&view, Some(&reference()));

        let Viewport::Bounds(bounds) = map.viewport() else {
            panic!("expected fitted bounds, got {:?}", map.viewport());
        };
        let lat_span = 28.7041 - 28.6139;
        assert!((bounds.south - (28.6139 - lat_span * FIT_PADDING)).abs() < 1e-9);
        assert!((bounds.north - (28.7041 + lat_span * FIT_PADDING)).abs() < 1e-9);
        assert!(bounds.contains(delhi()));
    }

    #[test]
    fn empty_render_leaves_viewport_unchanged() {
        let mut map = MapLayer::new();
        let before = map.viewport();
        map.render(&ResultView::empty(None), None);
        assert_eq!(map.viewport(), before);
        assert!(map.markers().is_empty());
    }

    #[test]
    fn second_render_replaces_first_without_leaks() {
        let mut map = MapLayer::new();
        let first = ResultView::build(
            vec![
                record("a", "A", 28.60, 77.20),
                record("b", "B", 28.61, 77.21),
                record("c", "C", 28.62, 77.22),
            ],
            Some(delhi()),
        );
        let second = ResultView::build(vec![record("d", "D", 28.63, 77.23)], Some(delhi()));
        map.render(&first, Some(&reference()));
        map.render(&second, Some(&reference()));

        assert_eq!(map.markers().len(), 1);
        assert_eq!(map.markers()[0].name, "D");
        assert_eq!(map.markers()[0].display_index, 1);
    }

    #[test]
    fn focus_centres_and_opens_popup() {
        let mut map = MapLayer::new();
        let view = ResultView::build(
            vec![record("a", "A", 28.60, 77.20), record("b", "B", 28.65, 77.25)],
            None,
        );
        map.render(&view, None);
        let marker = map.focus(2).expect("marker 2 exists");
        assert_eq!(marker.name, "B");
        assert_eq!(map.open_popup(), Some(2));
        assert_eq!(
            map.viewport(),
            Viewport::Center {
                center: Coordinate::new(28.65, 77.25).unwrap(),
                zoom: FOCUS_ZOOM
            }
        );
        assert!(map.focus(0).is_none());
        assert!(map.focus(3).is_none());
        assert_eq!(map.open_popup(), Some(2));
    }

    #[test]
    fn show_reference_clears_facilities_and_recentres() {
        let mut map = MapLayer::new();
        map.render(
            &ResultView::build(vec![record("a", "A", 28.60, 77.20)], None),
            None,
        );
        let point = ReferencePoint {
            coordinate: delhi(),
            label: "AIIMS".to_string(),
            origin: ReferenceOrigin::NamedPlace,
        };
        map.show_reference(&point);
        assert!(map.markers().is_empty());
        assert_eq!(
            map.viewport(),
            Viewport::Center {
                center: delhi(),
                zoom: 16
            }
        );
    }
}
