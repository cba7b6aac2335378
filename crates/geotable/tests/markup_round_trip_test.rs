//! A markup report read back as input must describe the same alignments and
//! render to the same document.

use float_cmp::assert_approx_eq;

use geotable::{
    ReportBuilder,
    model::{Alignment, AlignmentSet},
};

const CODMAN: &str = r#"[
    ["Project Name:", "Codman_Final"],
    ["Description:", "Ash Street northbound"],
    ["Vertical Alignment Name:", "Prop_AshNB"],
    ["Style:", "Default"],
    ["Element: Linear", "", ""],
    ["POB", "641+44.67", "42.97"],
    ["PVI", "641+95.67", "41.74"],
    ["Tangent Grade:", "-2.411", ""],
    ["Element: Parabola", "", ""],
    ["PVC", "642+07.29", "41.456"],
    ["PVI", "643+00.00", "39.2"],
    ["K Value:", "78.049", ""]
]"#;

fn builder() -> ReportBuilder {
    ReportBuilder::default().with_timestamp("2025-11-10 12:00:00")
}

fn main_rail() -> String {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../samples/main_rail_horizontal.json");
    std::fs::read_to_string(path).unwrap()
}

fn read_back(builder: &ReportBuilder, set: &AlignmentSet) -> (String, AlignmentSet) {
    let xml = builder.render_markup(set).unwrap();
    let output = builder.parse_xml(&xml).unwrap();
    assert!(output.diagnostics().is_empty());
    (xml, output.alignments().clone())
}

fn assert_same_elements(original: &Alignment, read: &Alignment) {
    assert_eq!(original.elements().len(), read.elements().len());
    for (expected, actual) in original.elements().iter().zip(read.elements()) {
        assert_eq!(expected.element_type(), actual.element_type());
        assert_eq!(expected.properties(), actual.properties());
        assert_eq!(expected.stations().len(), actual.stations().len());
        for (point, read_point) in expected.stations().iter().zip(actual.stations()) {
            assert_eq!(point.point_type(), read_point.point_type());
            assert_approx_eq!(f64, point.station(), read_point.station(), epsilon = 0.005);
            match (point.elevation(), read_point.elevation()) {
                (Some(expected), Some(actual)) => {
                    assert_approx_eq!(f64, expected, actual, epsilon = 0.005);
                }
                (expected, actual) => assert_eq!(expected, actual),
            }
        }
    }
}

#[test]
fn test_parsed_rows_survive_markup() {
    let builder = builder();
    let set = builder.parse_json(CODMAN).unwrap().alignments().clone();

    let (_, read) = read_back(&builder, &set);

    assert_eq!(read.project_name(), "Codman_Final");
    assert_eq!(read.timestamp(), Some("2025-11-10 12:00:00"));

    let (original, alignment) = (&set.alignments()[0], &read.alignments()[0]);
    assert_eq!(alignment.name(), original.name());
    assert_eq!(alignment.description(), "Ash Street northbound");
    assert_eq!(alignment.vertical_alignment(), "Prop_AshNB");
    assert_eq!(alignment.style(), "Default");
    assert_eq!(alignment.samples().len(), original.samples().len());
    assert_approx_eq!(f64, alignment.start_station(), 64144.67, epsilon = 1e-6);
    assert_approx_eq!(f64, alignment.end_station(), 64300.0, epsilon = 1e-6);
    assert_same_elements(original, alignment);
}

#[test]
fn test_extractor_alignment_survives_markup() {
    let builder = builder();
    let set = builder.parse_json(&main_rail()).unwrap().alignments().clone();

    let (_, read) = read_back(&builder, &set);
    let (original, alignment) = (&set.alignments()[0], &read.alignments()[0]);

    assert_eq!(alignment.id(), "4F2A");
    assert_eq!(alignment.samples().len(), 3);
    assert_eq!(alignment.samples()[1].point_type(), None);
    assert_eq!(alignment.entities().len(), original.entities().len());
    for (expected, actual) in original.entities().iter().zip(alignment.entities()) {
        assert_eq!(actual.index(), expected.index());
        assert_eq!(actual.entity_type(), expected.entity_type());
        assert_approx_eq!(f64, actual.start_station(), expected.start_station(), epsilon = 1e-6);
        assert_approx_eq!(f64, actual.end_station(), expected.end_station(), epsilon = 1e-6);
        assert_eq!(actual.geometry(), expected.geometry());
    }
    assert_eq!(alignment.superelevation(), original.superelevation());
    assert_eq!(
        alignment.elements()[0].properties().get("Direction:").map(String::as_str),
        Some("N 90° 00' 00.00\" E")
    );
}

#[test]
fn test_markup_is_stable_across_a_read_back() {
    let builder = builder();
    for source in [CODMAN.to_string(), main_rail()] {
        let set = builder.parse_json(&source).unwrap().alignments().clone();

        let (xml, read) = read_back(&builder, &set);

        assert_eq!(builder.render_markup(&read).unwrap(), xml);
    }
}
