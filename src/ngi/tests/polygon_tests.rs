//! POLYGON rule: part counts, ring validation and opt-in orientation

use super::*;
use crate::config::DecoderConfig;
use crate::diagnostics::DiagnosticKind;
use crate::ngi::NgiParser;
use crate::ring::{winding_direction, WindingDirection, WindingRule};

const CLOCKWISE_SQUARE: [&str; 6] = ["5", "0 0", "0 10", "10 10", "10 0", "0 0"];

fn polygon_record(id: &str, block: &[&str]) -> Vec<String> {
    let mut body = vec![format!("$RECORD {}", id), "POLYGON".to_string()];
    body.extend(block.iter().map(|s| s.to_string()));
    body
}

fn parcel_layer(records: Vec<Vec<String>>) -> Vec<String> {
    let mut input = layer("PARCEL", &[]);
    for record in records {
        input.extend(record);
    }
    input
}

#[test]
fn test_polygon_stored_in_file_order() {
    let input = parcel_layer(vec![polygon_record("1", &CLOCKWISE_SQUARE)]);

    let result = NgiParser::new().parse_lines(&input);

    let ring = outer_ring(&result.layers["PARCEL"]["1"]);
    assert_eq!(ring[1], point(0.0, 10.0));
    assert_eq!(winding_direction(&ring), WindingDirection::Cw);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_polygon_is_closed_when_input_is_open() {
    let input = parcel_layer(vec![polygon_record(
        "1",
        &["4", "0 0", "4 0", "4 3", "0 3"],
    )]);

    let result = NgiParser::new().parse_lines(&input);

    let ring = outer_ring(&result.layers["PARCEL"]["1"]);
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
}

#[test]
fn test_forced_ccw_orientation() {
    let config = DecoderConfig::default().with_forced_ccw_polygons();
    let input = parcel_layer(vec![polygon_record("1", &CLOCKWISE_SQUARE)]);

    let result = NgiParser::from_config(&config).parse_lines(&input);

    let ring = outer_ring(&result.layers["PARCEL"]["1"]);
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert_eq!(winding_direction(&ring), WindingDirection::Ccw);
}

#[test]
fn test_numparts_one_is_accepted() {
    let mut block = vec!["NUMPARTS 1"];
    block.extend(CLOCKWISE_SQUARE);
    let input = parcel_layer(vec![polygon_record("1", &block)]);

    let result = NgiParser::new().parse_lines(&input);

    assert_eq!(outer_ring(&result.layers["PARCEL"]["1"]).len(), 5);
}

#[test]
fn test_multipart_polygon_is_rejected() {
    let mut multipart = vec!["NUMPARTS 2"];
    multipart.extend(CLOCKWISE_SQUARE);
    multipart.extend(["4", "2 2", "2 4", "4 4", "2 2"]);
    let input = parcel_layer(vec![
        polygon_record("1", &multipart),
        polygon_record("2", &CLOCKWISE_SQUARE),
    ]);

    let result = NgiParser::new().parse_lines(&input);

    let parcel = &result.layers["PARCEL"];
    assert!(!parcel.contains_key("1"));
    assert!(parcel.contains_key("2"));
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::UnsupportedPartCount), 1);
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_huge_part_count_stops_at_next_record() {
    let mut input = parcel_layer(vec![polygon_record("1", &["NUMPARTS 100000000000"])]);
    input.extend(lines(&["$RECORD 2", "POINT", "1 1"]));

    let result = NgiParser::new().parse_lines(&input);

    let parcel = &result.layers["PARCEL"];
    assert!(!parcel.contains_key("1"));
    assert_eq!(parcel["2"], Geometry::Point(point(1.0, 1.0)));
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::UnsupportedPartCount), 1);
}

#[test]
fn test_ring_with_too_few_points_is_skipped() {
    let input = parcel_layer(vec![
        polygon_record("1", &["3", "0 0", "1 0", "0 0"]),
        polygon_record("2", &CLOCKWISE_SQUARE),
    ]);

    let result = NgiParser::new().parse_lines(&input);

    assert!(!result.layers["PARCEL"].contains_key("1"));
    assert!(result.layers["PARCEL"].contains_key("2"));
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::TooFewRingPoints), 1);
    assert_eq!(result.stats.records_skipped, 1);
    assert_eq!(result.stats.records_stored, 1);
}

#[test]
fn test_degenerate_ring_is_skipped() {
    let input = parcel_layer(vec![polygon_record(
        "1",
        &["4", "0 0", "1 0", "2 0", "0 0"],
    )]);

    let result = NgiParser::new().parse_lines(&input);

    assert!(result.layers["PARCEL"].is_empty());
    assert_eq!(result.diagnostics.count_of(DiagnosticKind::DegenerateRing), 1);
}

#[test]
fn test_legacy_winding_rule_is_applied() {
    // Headings of this triangle sum to zero, which the legacy rule rejects
    let triangle = ["4", "0 0", "2 0", "1 1.7320508075688772", "0 0"];
    let input = parcel_layer(vec![polygon_record("1", &triangle)]);

    let signed_area = NgiParser::new().parse_lines(&input);
    assert!(signed_area.layers["PARCEL"].contains_key("1"));

    let config = DecoderConfig::default().with_winding_rule(WindingRule::LegacyHeadingSum);
    let legacy = NgiParser::from_config(&config).parse_lines(&input);
    assert!(legacy.layers["PARCEL"].is_empty());
    assert_eq!(legacy.diagnostics.count_of(DiagnosticKind::DegenerateRing), 1);
}
