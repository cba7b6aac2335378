//! Scenario tests for the row parser.
//!
//! These tests run complete geotable exports through [`crate::parse`] and
//! [`crate::parse_rows`] and check the resulting alignment model and the
//! diagnostics reported for unusable rows.

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use crate::{
    GeotableInput, Row,
    error::{Diagnostic, ErrorCode},
    parse, parse_rows,
};

fn row(label: &str, value: &str) -> Row {
    Row::new(label, value)
}

fn row3(label: &str, value: &str, third: &str) -> Row {
    Row::with_third(label, value, third)
}

/// The Codman_Final vertical alignment export.
fn codman_rows() -> Vec<Row> {
    vec![
        row("Project Name:", "Codman_Final"),
        row("Description:", ""),
        row("Horizontal Alignment Name:", "Prop_AshNB"),
        row("Description:", ""),
        row("Style:", "Default"),
        row("Vertical Alignment Name:", "Prop_AshNB"),
        row("Description:", ""),
        row("Style:", "Default"),
        row3("", "STATION", "ELEVATION"),
        row3("Element: Linear", "", ""),
        row3("POB", "641+44.67", "42.97"),
        row3("PVI", "641+95.67", "41.74"),
        row3("Tangent Grade:", "-2.411", ""),
        row3("Tangent Length:", "51.01", ""),
    ]
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<Option<ErrorCode>> {
    diagnostics.iter().map(Diagnostic::code).collect()
}

#[test]
fn test_codman_final_scenario() {
    let (alignment, diagnostics) = parse_rows(&codman_rows());

    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    assert_eq!(alignment.name(), "Prop_AshNB");
    assert_eq!(alignment.project_name(), "Codman_Final");
    assert_eq!(alignment.horizontal_alignment(), "Prop_AshNB");
    assert_eq!(alignment.vertical_alignment(), "Prop_AshNB");
    assert_eq!(alignment.style(), "Default");
    assert_eq!(alignment.description(), "");

    assert_eq!(alignment.elements().len(), 1);
    let element = &alignment.elements()[0];
    assert_eq!(element.element_type(), "Linear");

    let stations = element.stations();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].point_type(), "POB");
    assert_approx_eq!(f64, stations[0].station(), 64144.67, epsilon = 1e-9);
    assert_eq!(stations[0].elevation(), Some(42.97));
    assert_eq!(stations[1].point_type(), "PVI");
    assert_approx_eq!(f64, stations[1].station(), 64195.67, epsilon = 1e-9);
    assert_eq!(stations[1].elevation(), Some(41.74));
    assert_approx_eq!(f64, stations[1].x(), 0.0);
    assert_approx_eq!(f64, stations[1].y(), 0.0);

    assert_eq!(
        element.properties().get("Tangent Grade:").map(String::as_str),
        Some("-2.411")
    );
    assert_eq!(
        element.properties().get("Tangent Length:").map(String::as_str),
        Some("51.01")
    );
}

#[test]
fn test_derived_samples_and_range() {
    let (alignment, _) = parse_rows(&codman_rows());

    assert_eq!(alignment.samples().len(), 2);
    assert_approx_eq!(f64, alignment.samples()[0].z(), 42.97);
    assert_approx_eq!(f64, alignment.start_station(), 64144.67, epsilon = 1e-9);
    assert_approx_eq!(f64, alignment.end_station(), 64195.67, epsilon = 1e-9);
    assert!(alignment.has_elevation_data());
    assert!(!alignment.has_planar_data());
}

#[test]
fn test_multiple_elements_in_order() {
    let mut rows = codman_rows();
    rows.extend([
        row3("Element: Linear", "", ""),
        row3("PVI", "641+95.67", "41.74"),
        row3("PVC", "642+07.29", "41.46"),
        row3("Tangent Grade:", "-2.411", ""),
        row3("Element: Parabola", "", ""),
        row3("PVC", "642+07.29", "41.46"),
        row3("PVI", "642+57.29", "40.25"),
        row3("PVT", "643+07.29", "40.21"),
        row3("Length:", "100.00", ""),
        row3("r = ( g2 - g1 ) / L:", "2.336", ""),
    ]);

    let (alignment, diagnostics) = parse_rows(&rows);
    assert!(diagnostics.is_empty());

    let types: Vec<_> = alignment
        .elements()
        .iter()
        .map(|element| element.element_type())
        .collect();
    assert_eq!(types, vec!["Linear", "Linear", "Parabola"]);

    let parabola = &alignment.elements()[2];
    let points: Vec<_> = parabola.stations().iter().map(|p| p.point_type()).collect();
    assert_eq!(points, vec!["PVC", "PVI", "PVT"]);
    assert_eq!(
        parabola.properties().keys().collect::<Vec<_>>(),
        vec!["Length:", "r = ( g2 - g1 ) / L:"]
    );
    // Length inside an element is a property, not the alignment length.
    assert_approx_eq!(f64, alignment.length(), 0.0);
    assert_approx_eq!(f64, alignment.end_station(), 64307.29, epsilon = 1e-9);
}

#[test]
fn test_duplicate_property_last_write_wins() {
    let rows = vec![
        row("Element: Linear", ""),
        row3("Tangent Grade:", "-2.411", ""),
        row3("Tangent Length:", "51.01", ""),
        row3("Tangent Grade:", "-1.000", ""),
    ];

    let (alignment, _) = parse_rows(&rows);
    let properties = alignment.elements()[0].properties();
    assert_eq!(properties.len(), 2);
    assert_eq!(
        properties
            .get_index(0)
            .map(|(name, value)| (name.as_str(), value.as_str())),
        Some(("Tangent Grade:", "-1.000"))
    );
}

#[test]
fn test_horizontal_name_only_sets_default_name() {
    let rows = vec![
        row("Horizontal Alignment Name:", "First"),
        row("Horizontal Alignment Name:", "Second"),
    ];

    let (alignment, _) = parse_rows(&rows);
    assert_eq!(alignment.name(), "First");
    assert_eq!(alignment.horizontal_alignment(), "Second");
}

#[test]
fn test_rows_before_element_are_discarded_with_warning() {
    let rows = vec![
        row("Report Created:", "2025-11-10"),
        row3("POB", "641+44.67", "42.97"),
        row("Element: Linear", ""),
        row3("POB", "641+44.67", "42.97"),
    ];

    let (alignment, diagnostics) = parse_rows(&rows);
    assert_eq!(alignment.elements()[0].stations().len(), 1);
    assert_eq!(codes(&diagnostics), vec![Some(ErrorCode::E001), Some(ErrorCode::E001)]);
    assert!(diagnostics.iter().all(|d| d.severity().is_warning()));
    assert_eq!(diagnostics[1].labels()[0].row().row(), 1);
}

#[test]
fn test_blank_and_column_header_rows_are_silent() {
    let rows = vec![
        row3("", "", ""),
        row3("", "NORTHING", "EASTING"),
        row("Element: Linear", ""),
        row3("", "", ""),
    ];

    let (alignment, diagnostics) = parse_rows(&rows);
    assert!(diagnostics.is_empty());
    assert_eq!(alignment.elements().len(), 1);
}

#[test]
fn test_non_numeric_station_reads_zero_and_warns() {
    let rows = vec![
        row("Element: Linear", ""),
        row3("PVI", "641+4x.67", "41.74"),
    ];

    let (alignment, diagnostics) = parse_rows(&rows);
    let point = &alignment.elements()[0].stations()[0];
    assert_approx_eq!(f64, point.station(), 0.0);
    assert_eq!(point.elevation(), Some(41.74));

    assert_eq!(codes(&diagnostics), vec![Some(ErrorCode::E002)]);
    let labels = diagnostics[0].labels();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].row().row(), 1);
    assert!(labels[1].is_secondary());
    assert_eq!(labels[1].row().row(), 0);
}

#[test]
fn test_zero_station_is_a_station_point() {
    let rows = vec![row("Element: Linear", ""), row3("POB", "0+00.00", "0.00")];

    let (alignment, diagnostics) = parse_rows(&rows);
    assert!(diagnostics.is_empty());
    assert!(alignment.elements()[0].properties().is_empty());
    assert_eq!(alignment.elements()[0].stations().len(), 1);
}

#[test]
fn test_header_fallbacks() {
    let rows = vec![
        row("Horizontal Alignment Name:", "Main_Rail_Line"),
        row("Alignment ID:", "4F2A"),
        row("Length:", "1520.25"),
        row("Start Station:", "10+00.00"),
        row("End Station:", "25+20.25"),
    ];

    let (alignment, diagnostics) = parse_rows(&rows);
    assert!(diagnostics.is_empty());
    assert_eq!(alignment.id(), "4F2A");
    assert_approx_eq!(f64, alignment.length(), 1520.25);
    assert_approx_eq!(f64, alignment.start_station(), 1000.0);
    assert_approx_eq!(f64, alignment.end_station(), 2520.25, epsilon = 1e-9);
}

#[test]
fn test_explicit_start_station_is_kept() {
    let mut rows = vec![row("Start Station:", "600+00.00")];
    rows.extend(codman_rows());

    let (alignment, _) = parse_rows(&rows);
    assert_approx_eq!(f64, alignment.start_station(), 60000.0);
    assert_approx_eq!(f64, alignment.end_station(), 64195.67, epsilon = 1e-9);
}

#[test]
fn test_non_numeric_header_value_warns() {
    let rows = vec![row("Length:", "1520.25"), row("Length:", "n/a")];

    let (alignment, diagnostics) = parse_rows(&rows);
    assert_approx_eq!(f64, alignment.length(), 1520.25);
    assert_eq!(codes(&diagnostics), vec![Some(ErrorCode::E003)]);
    assert!(
        diagnostics[0]
            .help()
            .is_some_and(|help| help.contains("length"))
    );
}

#[test]
fn test_parse_tables_labels_table_index() {
    let input = GeotableInput::Tables(vec![
        codman_rows(),
        vec![row("Horizontal Alignment Name:", "Second"), row("Mystery", "row")],
    ]);

    let output = parse(&input).unwrap();
    let set = output.alignments();
    assert_eq!(set.len(), 2);
    assert_eq!(set.alignments()[1].name(), "Second");
    assert_eq!(set.project_name(), "Codman_Final");

    assert_eq!(output.diagnostics().len(), 1);
    assert_eq!(output.diagnostics()[0].table(), Some(1));
}

#[test]
fn test_parse_report_envelope() {
    let input = GeotableInput::from_json(
        r#"{
            "project_name": "Rail Corridor",
            "timestamp": "2025-11-10 12:00:00",
            "alignments": [
                [["Horizontal Alignment Name:", "Prop_AshNB"], ["Element: Linear", "", ""], ["POB", "641+44.67", "42.97"]],
                {"name": "Main_Rail_Line", "id": "4F2A", "length": 120.5, "stations": [{"station": 1000.0}]}
            ]
        }"#,
    )
    .unwrap();

    let output = parse(&input).unwrap();
    let set = output.alignments();
    assert_eq!(set.project_name(), "Rail Corridor");
    assert_eq!(set.timestamp(), Some("2025-11-10 12:00:00"));
    assert_eq!(set.alignments()[0].name(), "Prop_AshNB");

    let passed = &set.alignments()[1];
    assert_eq!(passed.name(), "Main_Rail_Line");
    assert_eq!(passed.samples().len(), 1);
    assert!(passed.elements().is_empty());
}

#[test]
fn test_parse_alignment_passthrough() {
    let input = GeotableInput::from_json(r#"{"name": "Main_Rail_Line", "start_station": 0.0}"#)
        .unwrap();

    let output = parse(&input).unwrap();
    let alignment = &output.alignments().alignments()[0];
    assert_eq!(alignment.name(), "Main_Rail_Line");
    assert!(alignment.samples().is_empty());
}

#[test]
fn test_parse_empty_rows_fails() {
    let err = parse(&GeotableInput::Rows(Vec::new())).unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
}

// ===================
// Strategies
// ===================

fn element_type_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Linear", "Parabola", "Spiral", "Arc"]).prop_map(str::to_string)
}

fn element_body_strategy() -> impl Strategy<Value = Vec<Row>> {
    let station = (1u32..1000, 0u32..100, 0u32..100, 0u32..100).prop_map(|(h, r, c, e)| {
        Row::with_third("PVI", format!("{h}+{r:02}.{c:02}"), format!("{e}.5"))
    });
    let property = ("[A-Z][a-z]{2,8}:", "-?[0-9]{1,3}\\.[0-9]{2}")
        .prop_map(|(name, value)| Row::with_third(name, value, ""));
    prop::collection::vec(prop_oneof![station, property], 0..6)
}

fn export_strategy() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((element_type_strategy(), element_body_strategy()), 0..6).prop_map(
        |elements| {
            let mut rows = vec![Row::new("Horizontal Alignment Name:", "Generated")];
            for (element_type, body) in elements {
                rows.push(Row::with_third(format!("Element: {element_type}"), "", ""));
                rows.extend(body);
            }
            rows
        },
    )
}

// ===================
// Property Test Functions
// ===================

/// Element count equals the number of `Element:` rows.
fn check_element_count(rows: &[Row]) -> Result<(), TestCaseError> {
    let expected = rows
        .iter()
        .filter(|row| row.label().to_lowercase().starts_with("element:"))
        .count();
    let (alignment, _) = parse_rows(rows);
    prop_assert_eq!(alignment.elements().len(), expected);
    Ok(())
}

/// A row with a numeric third cell inside an element is a station, never a property.
fn check_station_rows_are_not_properties(rows: &[Row]) -> Result<(), TestCaseError> {
    let (alignment, diagnostics) = parse_rows(rows);
    prop_assert!(diagnostics.is_empty());

    let station_rows = rows.iter().filter(|row| row.third().is_some()).count();
    let station_points = alignment.station_points().count();
    prop_assert_eq!(station_points, station_rows);

    for element in alignment.elements() {
        prop_assert!(!element.properties().contains_key("PVI"));
    }
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn element_count_matches_headers(rows in export_strategy()) {
        check_element_count(&rows)?;
    }

    #[test]
    fn station_rows_are_not_properties(rows in export_strategy()) {
        check_station_rows_are_not_properties(&rows)?;
    }
}
