use serde_json::json;

use super::*;

fn query(filter: CategoryFilter) -> SearchQuery {
    SearchQuery::new(Coordinate::new(28.6139, 77.209).unwrap(), 5.0, filter).unwrap()
}

#[test]
fn query_for_single_category_uses_exact_match() {
    let ql = build_overpass_query(&query(CategoryFilter::Only(FacilityCategory::Pharmacy)));
    assert!(ql.starts_with("[out:json][timeout:25];"));
    assert!(ql.contains("node[\"amenity\"=\"pharmacy\"](around:8046.7,28.6139,77.209);"));
    assert!(ql.contains("way[\"amenity\"=\"pharmacy\"]"));
    assert!(ql.contains("relation[\"amenity\"=\"pharmacy\"]"));
    assert!(ql.trim_end().ends_with("out center meta;"));
}

#[test]
fn query_for_all_matches_the_five_categories() {
    let ql = build_overpass_query(&query(CategoryFilter::All));
    assert!(ql.contains("[\"amenity\"~\"^(hospital|clinic|doctors|pharmacy|dentist)$\"]"));
}

#[test]
fn normalises_point_and_area_elements() {
    let response = json!({
        "elements": [
            {
                "type": "node",
                "id": 101,
                "lat": 28.5672,
                "lon": 77.2100,
                "tags": {
                    "amenity": "hospital",
                    "name": "AIIMS",
                    "addr:street": "Ansari Nagar",
                    "addr:city": "New Delhi",
                    "addr:postcode": "110029",
                    "phone": "+91 11 2658 8500",
                    "opening_hours": "24/7",
                    "wheelchair": "yes"
                }
            },
            {
                "type": "way",
                "id": 202,
                "center": {"lat": 28.6448, "lon": 77.2167},
                "tags": {"amenity": "clinic"}
            }
        ]
    });
    let records = normalize_elements(&response, CategoryFilter::All);
    assert_eq!(records.len(), 2);

    let aiims = &records[0];
    assert_eq!(aiims.id, "osm:node/101");
    assert_eq!(aiims.name, "AIIMS");
    assert_eq!(aiims.category, FacilityCategory::Hospital);
    assert_eq!(aiims.address, "Ansari Nagar, New Delhi, 110029");
    assert_eq!(aiims.phone.as_deref(), Some("+91 11 2658 8500"));
    assert_eq!(aiims.hours.as_deref(), Some("24/7"));
    assert_eq!(aiims.wheelchair.as_deref(), Some("yes"));
    assert_eq!(aiims.source, FacilitySource::Overpass);

    let clinic = &records[1];
    assert_eq!(clinic.id, "osm:way/202");
    assert_eq!(clinic.name, "Medical Facility");
    assert_eq!(clinic.address, medmap_core::ADDRESS_PLACEHOLDER);
    assert!((clinic.coordinate.latitude - 28.6448).abs() < 1e-9);
    assert!(clinic.phone.is_none());
}

#[test]
fn elements_without_coordinates_are_dropped() {
    let response = json!({
        "elements": [
            {"type": "relation", "id": 1, "tags": {"amenity": "hospital", "name": "No Geometry"}},
            {"type": "node", "id": 2, "lat": 28.6, "tags": {"amenity": "clinic"}},
            {"type": "node", "id": 3, "lat": 28.6, "lon": 77.2}
        ]
    });
    let records = normalize_elements(&response, CategoryFilter::All);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "osm:node/3");
}

#[test]
fn missing_amenity_falls_back_to_requested_category() {
    let response = json!({"elements": [{"type": "node", "id": 9, "lat": 28.6, "lon": 77.2}]});
    let only_dentist = normalize_elements(
        &response,
        CategoryFilter::Only(FacilityCategory::Dentist),
    );
    assert_eq!(only_dentist[0].category, FacilityCategory::Dentist);
    let any = normalize_elements(&response, CategoryFilter::All);
    assert_eq!(any[0].category, FacilityCategory::Unknown);
}

#[test]
fn response_without_elements_is_empty() {
    assert!(normalize_elements(&json!({"remark": "runtime error"}), CategoryFilter::All).is_empty());
    assert!(normalize_elements(&json!({"elements": "oops"}), CategoryFilter::All).is_empty());
}
