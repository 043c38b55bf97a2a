//! The single owned locator state: current reference point plus the search
//! counter used to discard stale completions.

use medmap_core::Coordinate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceOrigin {
    /// Reported by the device location service.
    Device,
    /// A point of interest matched by name.
    NamedPlace,
    /// A general place-name geocode.
    Geocoded,
}

/// The coordinate searches are centred on, with how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub coordinate: Coordinate,
    pub label: String,
    pub origin: ReferenceOrigin,
}

impl ReferencePoint {
    /// Copy for the location status banner.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self.origin {
            ReferenceOrigin::Device => format!("Location found: {}", self.coordinate),
            ReferenceOrigin::NamedPlace => format!("Hospital found: {}", self.label),
            ReferenceOrigin::Geocoded => format!("Location found: {}", self.label),
        }
    }
}

/// Identifies one initiated search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

#[derive(Debug, Default)]
pub struct LocatorState {
    reference: Option<ReferencePoint>,
    last_issued: u64,
}

impl LocatorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reference(&self) -> Option<&ReferencePoint> {
        self.reference.as_ref()
    }

    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.reference.as_ref().map(|r| r.coordinate)
    }

    /// Replaces the reference point wholesale. Searches issued around the
    /// previous point become stale.
    pub fn replace_reference(&mut self, point: ReferencePoint) -> &ReferencePoint {
        self.invalidate_searches();
        self.reference.insert(point)
    }

    /// Makes every ticket issued so far stale.
    pub fn invalidate_searches(&mut self) {
        self.last_issued += 1;
    }

    /// Issues the ticket for a newly initiated search. Every earlier ticket
    /// becomes stale.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.last_issued += 1;
        SearchTicket(self.last_issued)
    }

    /// `true` only for the most recently issued ticket.
    #[must_use]
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.last_issued
    }
}
