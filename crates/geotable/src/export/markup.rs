//! Structured XML report backend.
//!
//! Produces one `GeotableReport` document holding every alignment of a set:
//! project information, alignment properties, sampled stations, the parsed
//! geometric elements, extractor geometry entities and superelevation
//! critical stations.

mod writer;

use log::debug;

use geotable_core::{
    model::{
        Alignment, AlignmentSet, CriticalStation, Element, EntityGeometry, GeometricEntity,
        StationSample,
    },
    station,
};

use crate::{
    config::MarkupConfig,
    export::{self, Exporter, layout},
};

use writer::XmlWriter;

type WriteResult = Result<(), export::Error>;

/// Markup exporter.
///
/// The generation date is passed in so that rendering is a pure function of
/// its inputs.
#[derive(Debug)]
pub struct Markup<'a> {
    config: &'a MarkupConfig,
    generated: String,
}

impl<'a> Markup<'a> {
    pub fn new(config: &'a MarkupConfig, generated: impl Into<String>) -> Self {
        Self {
            config,
            generated: generated.into(),
        }
    }

    fn write_document(&self, w: &mut XmlWriter, set: &AlignmentSet) -> WriteResult {
        w.open(
            "GeotableReport",
            &[("version", "1.0"), ("xmlns", self.config.namespace())],
        )?;

        w.open("ProjectInfo", &[])?;
        w.leaf("ProjectName", &[], set.project_name())?;
        w.leaf("GeneratedDate", &[], &self.generated)?;
        w.leaf("ReportType", &[], self.config.report_type())?;
        w.close()?;

        let count = set.len().to_string();
        w.open("Alignments", &[("count", count.as_str())])?;
        for alignment in set.alignments() {
            write_alignment(w, alignment)?;
        }
        w.close()?;

        w.close()
    }
}

impl Exporter for Markup<'_> {
    type Output = String;

    fn export_alignments(&mut self, set: &AlignmentSet) -> Result<String, export::Error> {
        let mut writer = XmlWriter::new(self.config.indent())?;
        self.write_document(&mut writer, set)?;
        let document = writer.finish()?;

        debug!(alignments = set.len(), bytes = document.len(); "Rendered markup report");
        Ok(document)
    }
}

fn write_alignment(w: &mut XmlWriter, alignment: &Alignment) -> WriteResult {
    w.open(
        "Alignment",
        &[("name", alignment.name()), ("id", alignment.id())],
    )?;

    write_properties(w, alignment)?;

    let count = alignment.samples().len().to_string();
    w.open("Stations", &[("count", count.as_str())])?;
    for sample in alignment.samples() {
        write_sample(w, sample)?;
    }
    w.close()?;

    let count = alignment.elements().len().to_string();
    w.open("GeometricElements", &[("count", count.as_str())])?;
    for (index, element) in alignment.elements().iter().enumerate() {
        write_element(w, index, element)?;
    }
    w.close()?;

    let count = alignment.entities().len().to_string();
    w.open("GeometricEntities", &[("count", count.as_str())])?;
    for entity in alignment.entities() {
        write_entity(w, entity)?;
    }
    w.close()?;

    if !alignment.superelevation().is_empty() {
        let count = alignment.superelevation().len().to_string();
        w.open("Superelevation", &[("count", count.as_str())])?;
        for critical in alignment.superelevation() {
            write_critical_station(w, critical)?;
        }
        w.close()?;
    }

    w.close()
}

fn write_properties(w: &mut XmlWriter, alignment: &Alignment) -> WriteResult {
    w.open("Properties", &[])?;
    w.leaf("Description", &[], alignment.description())?;

    let optional = [
        ("ProjectName", alignment.project_name()),
        ("HorizontalAlignment", alignment.horizontal_alignment()),
        ("VerticalAlignment", alignment.vertical_alignment()),
        ("Style", alignment.style()),
    ];
    for (name, value) in optional {
        if !value.is_empty() {
            w.leaf(name, &[], value)?;
        }
    }

    w.leaf("Length", &[], &layout::length(alignment.length()))?;
    w.leaf("StartStation", &[], &station::format(alignment.start_station()))?;
    w.leaf("EndStation", &[], &station::format(alignment.end_station()))?;
    w.close()
}

fn write_sample(w: &mut XmlWriter, sample: &StationSample) -> WriteResult {
    let value = station::format(sample.station());
    match sample.point_type() {
        Some(point_type) => w.open("Station", &[("value", value.as_str()), ("type", point_type)])?,
        None => w.open("Station", &[("value", value.as_str())])?,
    }

    w.open("Coordinates", &[])?;
    w.leaf("X", &[], &layout::planar(sample.x()))?;
    w.leaf("Y", &[], &layout::planar(sample.y()))?;
    w.leaf("Z", &[], &layout::elevation(sample.z()))?;
    w.close()?;

    if let Some(elevation) = sample.elevation() {
        w.leaf("Elevation", &[], &layout::elevation(elevation))?;
    }
    w.leaf("Direction", &[], &layout::angle(sample.direction()))?;
    w.leaf("Offset", &[], &layout::length(sample.offset()))?;
    w.close()
}

fn write_element(w: &mut XmlWriter, index: usize, element: &Element) -> WriteResult {
    let index = index.to_string();
    w.open(
        "Element",
        &[("type", element.element_type()), ("index", index.as_str())],
    )?;

    if !element.stations().is_empty() {
        w.open("Stations", &[])?;
        for point in element.stations() {
            let value = station::format(point.station());
            let attrs = [("type", point.point_type()), ("value", value.as_str())];
            match point.elevation() {
                Some(elevation) => {
                    w.open("Station", &attrs)?;
                    w.leaf("Elevation", &[], &layout::elevation(elevation))?;
                    w.close()?;
                }
                None => w.leaf("Station", &attrs, "")?,
            }
        }
        w.close()?;
    }

    if !element.properties().is_empty() {
        w.open("ElementProperties", &[])?;
        for (name, value) in element.properties() {
            w.leaf("Property", &[("name", name.as_str())], value)?;
        }
        w.close()?;
    }

    w.close()
}

fn write_entity(w: &mut XmlWriter, entity: &GeometricEntity) -> WriteResult {
    let index = entity.index().to_string();
    w.open(
        "Entity",
        &[("type", entity.entity_type()), ("index", index.as_str())],
    )?;

    w.leaf("StartStation", &[], &station::format(entity.start_station()))?;
    w.leaf("EndStation", &[], &station::format(entity.end_station()))?;
    w.leaf("Length", &[], &layout::length(entity.length()))?;

    match entity.geometry() {
        Some(EntityGeometry::Arc {
            radius,
            chord_length,
            direction,
        }) => {
            w.open("ArcProperties", &[])?;
            w.leaf("Radius", &[], &layout::length(radius))?;
            w.leaf("ChordLength", &[], &layout::length(chord_length))?;
            w.leaf("Direction", &[], direction)?;
            w.close()?;
        }
        Some(EntityGeometry::Spiral {
            radius_in,
            radius_out,
            spiral_type,
        }) => {
            w.open("SpiralProperties", &[])?;
            w.leaf("RadiusIn", &[], &layout::length(radius_in))?;
            w.leaf("RadiusOut", &[], &layout::length(radius_out))?;
            w.leaf("SpiralType", &[], spiral_type)?;
            w.close()?;
        }
        Some(EntityGeometry::Line { bearing }) => {
            w.open("LineProperties", &[])?;
            w.leaf("Bearing", &[], &layout::angle(bearing))?;
            w.close()?;
        }
        None => {}
    }

    w.close()
}

fn write_critical_station(w: &mut XmlWriter, critical: &CriticalStation) -> WriteResult {
    let value = station::format(critical.station());
    w.open("CriticalStation", &[("station", value.as_str())])?;
    w.leaf("TransitionType", &[], critical.transition_type())?;
    w.leaf("LeftSlope", &[], &layout::slope(critical.left_slope()))?;
    w.leaf("RightSlope", &[], &layout::slope(critical.right_slope()))?;
    w.close()
}

#[cfg(test)]
mod tests {
    use geotable_core::model::StationPoint;

    use super::*;

    fn render(set: &AlignmentSet) -> String {
        let config = MarkupConfig::default();
        Markup::new(&config, "2025-11-10 12:00:00")
            .export_alignments(set)
            .unwrap()
    }

    fn codman() -> Alignment {
        let mut alignment = Alignment::new();
        alignment.set_name("Prop_AshNB");
        alignment.set_project_name("Codman_Final");
        alignment.set_horizontal_alignment("Prop_AshNB");
        let mut element = Element::new("Linear");
        element.push_station(StationPoint::new("POB", 64144.67).with_elevation(42.97));
        element.push_station(StationPoint::new("PVI", 64195.67).with_elevation(41.74));
        element.insert_property("Tangent Grade:", "-2.411");
        alignment.push_element(element);
        alignment.derive_samples();
        alignment
    }

    #[test]
    fn test_document_skeleton() {
        let xml = render(&AlignmentSet::new(vec![codman()]));

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains(
            "<GeotableReport version=\"1.0\" xmlns=\"http://civil3d.autodesk.com/geotable\">"
        ));
        assert!(xml.contains("<ProjectName>Codman_Final</ProjectName>"));
        assert!(xml.contains("<GeneratedDate>2025-11-10 12:00:00</GeneratedDate>"));
        assert!(xml.contains("<ReportType>Rail Alignment Geotable</ReportType>"));
        assert!(xml.contains("<Alignments count=\"1\">"));
        assert!(xml.contains("<Alignment name=\"Prop_AshNB\" id=\"\">"));
        assert!(xml.ends_with("</GeotableReport>\n"));
    }

    #[test]
    fn test_element_stations_and_properties() {
        let xml = render(&AlignmentSet::new(vec![codman()]));

        assert!(xml.contains("<Element type=\"Linear\" index=\"0\">"));
        assert!(xml.contains("<Station type=\"POB\" value=\"641+44.67\">"));
        assert!(xml.contains("<Elevation>42.97</Elevation>"));
        assert!(xml.contains("<Property name=\"Tangent Grade:\">-2.411</Property>"));
        assert!(xml.contains("<GeometricElements count=\"1\">"));
        assert!(xml.contains("<GeometricEntities count=\"0\">"));
        assert!(!xml.contains("Superelevation"));
    }

    #[test]
    fn test_derived_properties() {
        let xml = render(&AlignmentSet::new(vec![codman()]));

        assert!(xml.contains("<Description/>"));
        assert!(xml.contains("<HorizontalAlignment>Prop_AshNB</HorizontalAlignment>"));
        assert!(!xml.contains("<VerticalAlignment>"));
        assert!(!xml.contains("<Style>"));
        assert!(xml.contains("<StartStation>641+44.67</StartStation>"));
        assert!(xml.contains("<EndStation>641+95.67</EndStation>"));
        assert!(xml.contains("<Stations count=\"2\">"));
        assert!(xml.contains("<Station value=\"641+44.67\" type=\"POB\">"));
        assert!(xml.contains("<Z>42.97</Z>"));
        assert!(xml.contains("<Direction>0.000000</Direction>"));
        assert!(xml.contains("<Offset>0.000</Offset>"));
    }

    #[test]
    fn test_entities_and_superelevation() {
        let mut alignment = Alignment::new();
        alignment.set_name("Main_Rail_Line");
        alignment.push_entity(
            GeometricEntity::new(0, "Arc")
                .with_range(1000.0, 1157.08, 157.08)
                .with_arc(500.0, 156.45, "CCW"),
        );
        alignment.push_entity(GeometricEntity::new(1, "Tangent").with_bearing(1.570796));
        alignment.push_critical_station(CriticalStation::new(1000.0, "Begin Full Super", -0.02, 0.06));

        let xml = render(&AlignmentSet::new(vec![alignment]));

        assert!(xml.contains("<Entity type=\"Arc\" index=\"0\">"));
        assert!(xml.contains("<StartStation>10+00.00</StartStation>"));
        assert!(xml.contains("<Radius>500.000</Radius>"));
        assert!(xml.contains("<ChordLength>156.450</ChordLength>"));
        assert!(xml.contains("<Direction>CCW</Direction>"));
        assert!(xml.contains("<Bearing>1.570796</Bearing>"));
        assert!(xml.contains("<Superelevation count=\"1\">"));
        assert!(xml.contains("<CriticalStation station=\"10+00.00\">"));
        assert!(xml.contains("<LeftSlope>-0.0200</LeftSlope>"));
    }

    #[test]
    fn test_custom_namespace_and_escaping() {
        let config = MarkupConfig::new("urn:test", "Custom & Co", 4);
        let mut alignment = Alignment::new();
        alignment.set_name("A<B>");

        let xml = Markup::new(&config, "now")
            .export_alignments(&AlignmentSet::new(vec![alignment]))
            .unwrap();

        assert!(xml.contains("xmlns=\"urn:test\""));
        assert!(xml.contains("<ReportType>Custom &amp; Co</ReportType>"));
        assert!(xml.contains("name=\"A&lt;B&gt;\""));
        assert!(xml.contains("\n    <ProjectInfo>"));
    }
}
