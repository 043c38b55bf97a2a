//! Outbound action links attached to markers and list items.

use medmap_core::Coordinate;

/// Google Maps directions from the reference point, or a plain location
/// search when there is no reference yet.
#[must_use]
pub fn directions_url(reference: Option<Coordinate>, destination: Coordinate) -> String {
    match reference {
        Some(from) => format!(
            "https://www.google.com/maps/dir/{},{}/{},{}",
            from.latitude, from.longitude, destination.latitude, destination.longitude
        ),
        None => format!(
            "https://www.google.com/maps/search/{},{}",
            destination.latitude, destination.longitude
        ),
    }
}

/// `tel:` URI with whitespace stripped.
#[must_use]
pub fn call_url(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_with_and_without_reference() {
        let from = Coordinate::new(28.6139, 77.209).unwrap();
        let to = Coordinate::new(28.7041, 77.1025).unwrap();
        assert_eq!(
            directions_url(Some(from), to),
            "https://www.google.com/maps/dir/28.6139,77.209/28.7041,77.1025"
        );
        assert_eq!(
            directions_url(None, to),
            "https://www.google.com/maps/search/28.7041,77.1025"
        );
    }

    #[test]
    fn call_url_strips_spaces() {
        assert_eq!(call_url("+91 11 2658 8500"), "tel:+911126588500");
    }
}
