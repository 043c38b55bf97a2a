use clap::Parser;
use medmap_core::{CategoryFilter, FacilityCategory};
use medmap_locator::list::{ListContent, ListItem, NO_FACILITIES_HEADING, RETRY_LABEL};

use super::*;

#[test]
fn parses_locate_by_query() {
    let cli = Cli::try_parse_from(["medmap", "locate", "--query", "AIIMS Delhi"])
        .expect("expected valid cli args");

    let Commands::Locate { location } = cli.command else {
        panic!("expected locate");
    };
    assert_eq!(location.query.as_deref(), Some("AIIMS Delhi"));
    assert!(!location.device);
}

#[test]
fn search_defaults_to_five_miles_and_all_types() {
    let cli = Cli::try_parse_from(["medmap", "search", "--device"]).expect("expected valid cli args");

    let Commands::Search {
        location,
        radius,
        filter,
        json,
    } = cli.command
    else {
        panic!("expected search");
    };
    assert!(location.device);
    assert!((radius - 5.0).abs() < f64::EPSILON);
    assert_eq!(filter, CategoryFilter::All);
    assert!(!json);
}

#[test]
fn search_accepts_explicit_coordinate_and_type() {
    let cli = Cli::try_parse_from([
        "medmap", "search", "--at", "28.6139,77.2090", "--type", "pharmacy", "--radius", "2",
        "--json",
    ])
    .expect("expected valid cli args");

    let Commands::Search {
        location,
        filter,
        json,
        ..
    } = cli.command
    else {
        panic!("expected search");
    };
    let at = location.at.expect("coordinate parsed");
    assert!((at.latitude - 28.6139).abs() < 1e-9);
    assert_eq!(filter, CategoryFilter::Only(FacilityCategory::Pharmacy));
    assert!(json);
}

#[test]
fn search_rejects_unknown_type() {
    let result = Cli::try_parse_from(["medmap", "search", "--device", "--type", "spa"]);
    assert!(result.is_err());
}

#[test]
fn location_source_is_required_and_exclusive() {
    assert!(Cli::try_parse_from(["medmap", "search"]).is_err());
    assert!(Cli::try_parse_from(["medmap", "locate", "--device", "--query", "Delhi"]).is_err());
}

#[test]
fn text_output_lists_items_with_links() {
    let content = ListContent::Items {
        items: vec![ListItem {
            display_index: 1,
            name: "Lok Nayak Hospital".to_string(),
            category_label: "Hospital",
            address: "Jawaharlal Nehru Marg".to_string(),
            distance: "2.9 km away".to_string(),
            hours: Some("24/7".to_string()),
            directions_url: "https://www.google.com/maps/search/28.639,77.239".to_string(),
            call_url: Some("tel:01123232400".to_string()),
        }],
    };
    let text = output::render_text(
        Some("Found 1 medical facilities near your location"),
        &content,
    );

    assert!(text.starts_with("Found 1 medical facilities near your location\n"));
    assert!(text.contains(" 1. Lok Nayak Hospital (Hospital)"));
    assert!(text.contains("2.9 km away | 24/7"));
    assert!(text.contains("Call: tel:01123232400"));
}

#[test]
fn text_output_distinguishes_empty_from_failure() {
    let empty = output::render_text(None, &ListContent::NoFacilities);
    let failed = output::render_text(
        None,
        &ListContent::SearchFailed {
            message: "Failed to search for facilities. Please try again.".to_string(),
        },
    );

    assert!(empty.starts_with(NO_FACILITIES_HEADING));
    assert!(!empty.contains(RETRY_LABEL));
    assert!(failed.contains(RETRY_LABEL));
}
