//! Reader for markup reports.
//!
//! A `GeotableReport` document written by the markup renderer is read back
//! into alignments. Formatted numbers are read at the precision they were
//! written with; station values go through the station codec.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use geotable_core::{
    model::{
        Alignment, CriticalStation, Element, GeometricEntity, StationPoint, StationSample,
        UNKNOWN_NAME,
    },
    station,
};

use crate::{
    error::ParseError,
    input::{Report, ReportEntry},
};

/// Root element of a markup report.
const ROOT: &str = "GeotableReport";

/// An element of the document with its attributes, text and children.
#[derive(Debug, Default)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn open(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let attributes = start
            .attributes()
            .map(|attribute| -> Result<(String, String), ParseError> {
                let attribute = attribute.map_err(|err| invalid(&name, err))?;
                let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
                let value = attribute
                    .unescape_value()
                    .map_err(|err| invalid(&name, err))?
                    .into_owned();
                Ok((key, value))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    /// Children of the `list` child named `item`, empty when `list` is absent.
    fn items<'a>(&'a self, list: &'a str, item: &'a str) -> impl Iterator<Item = &'a Node> {
        self.child(list).into_iter().flat_map(move |list| list.children(item))
    }
}

/// Read a markup report.
///
/// # Errors
///
/// Returns [`ParseError`] with `E101` when the text is not well-formed XML,
/// is not a `GeotableReport`, or holds a value that cannot be read back.
pub(crate) fn read_report(text: &str) -> Result<Report, ParseError> {
    let root = read_tree(text)?;
    if root.name != ROOT {
        return Err(ParseError::malformed(format!(
            "expected a `{ROOT}` document, found `{}`",
            root.name
        )));
    }

    let alignments = root
        .items("Alignments", "Alignment")
        .map(|node| read_alignment(node).map(ReportEntry::Alignment))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = Report::new(alignments);
    if let Some(info) = root.child("ProjectInfo") {
        if let Some(name) = info
            .child_text("ProjectName")
            .filter(|name| !name.is_empty() && *name != UNKNOWN_NAME)
        {
            report = report.with_project_name(name);
        }
        if let Some(date) = info.child_text("GeneratedDate").filter(|date| !date.is_empty()) {
            report = report.with_timestamp(date);
        }
    }
    Ok(report)
}

fn read_tree(text: &str) -> Result<Node, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Node> = Vec::new();
    let mut root = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            ParseError::malformed(format!(
                "markup is not well-formed at byte {}: {err}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(start) => open.push(Node::open(&start)?),
            Event::Empty(start) => {
                let node = Node::open(&start)?;
                attach(&mut open, &mut root, node);
            }
            Event::End(_) => {
                if let Some(node) = open.pop() {
                    attach(&mut open, &mut root, node);
                }
            }
            Event::Text(text) => {
                if let Some(node) = open.last_mut() {
                    let value = text.unescape().map_err(|err| invalid(&node.name, err))?;
                    node.text.push_str(&value);
                }
            }
            Event::CData(data) => {
                if let Some(node) = open.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(node) = open.last() {
        return Err(ParseError::malformed(format!(
            "markup ends inside `{}`",
            node.name
        )));
    }
    root.ok_or_else(|| ParseError::malformed("markup has no root element"))
}

fn attach(open: &mut [Node], root: &mut Option<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn read_alignment(node: &Node) -> Result<Alignment, ParseError> {
    let mut alignment = Alignment::new();
    if let Some(name) = node.attribute("name") {
        alignment.set_name(name);
    }
    if let Some(id) = node.attribute("id") {
        alignment.set_id(id);
    }

    if let Some(properties) = node.child("Properties") {
        if let Some(description) = properties.child_text("Description") {
            alignment.set_description(description);
        }
        if let Some(project_name) = properties.child_text("ProjectName") {
            alignment.set_project_name(project_name);
        }
        if let Some(name) = properties.child_text("HorizontalAlignment") {
            alignment.set_horizontal_alignment(name);
        }
        if let Some(name) = properties.child_text("VerticalAlignment") {
            alignment.set_vertical_alignment(name);
        }
        if let Some(style) = properties.child_text("Style") {
            alignment.set_style(style);
        }
        alignment.set_length(decimal(properties, "Length")?);
        alignment.set_start_station(chainage(properties, "StartStation")?);
        alignment.set_end_station(chainage(properties, "EndStation")?);
    }

    for sample in node.items("Stations", "Station") {
        alignment.push_sample(read_sample(sample)?);
    }
    for element in node.items("GeometricElements", "Element") {
        alignment.push_element(read_element(element)?);
    }
    for entity in node.items("GeometricEntities", "Entity") {
        alignment.push_entity(read_entity(entity)?);
    }
    for critical in node.items("Superelevation", "CriticalStation") {
        alignment.push_critical_station(read_critical_station(critical)?);
    }

    Ok(alignment)
}

fn read_sample(node: &Node) -> Result<StationSample, ParseError> {
    let mut sample = StationSample::new(station_attribute(node, "value")?);
    if let Some(point_type) = node.attribute("type") {
        sample = sample.with_point_type(point_type);
    }
    if let Some(coordinates) = node.child("Coordinates") {
        sample = sample.with_coordinates(
            decimal(coordinates, "X")?,
            decimal(coordinates, "Y")?,
            decimal(coordinates, "Z")?,
        );
    }
    if node.child("Elevation").is_some() {
        sample = sample.with_elevation(decimal(node, "Elevation")?);
    }
    Ok(sample
        .with_direction(decimal(node, "Direction")?)
        .with_offset(decimal(node, "Offset")?))
}

fn read_element(node: &Node) -> Result<Element, ParseError> {
    let mut element = Element::new(node.attribute("type").unwrap_or_default());

    for point in node.items("Stations", "Station") {
        let point_type = point.attribute("type").unwrap_or_default();
        let mut station = StationPoint::new(point_type, station_attribute(point, "value")?);
        if point.child("Elevation").is_some() {
            station = station.with_elevation(decimal(point, "Elevation")?);
        }
        element.push_station(station);
    }

    for property in node.items("ElementProperties", "Property") {
        let name = property.attribute("name").unwrap_or_default();
        element.insert_property(name, property.text.as_str());
    }

    Ok(element)
}

fn read_entity(node: &Node) -> Result<GeometricEntity, ParseError> {
    let index = match node.attribute("index") {
        Some(index) => index.trim().parse::<usize>().map_err(|err| {
            ParseError::malformed(format!("`Entity` index `{index}` is not an index: {err}"))
        })?,
        None => 0,
    };

    let mut entity = GeometricEntity::new(index, node.attribute("type").unwrap_or_default())
        .with_range(
            chainage(node, "StartStation")?,
            chainage(node, "EndStation")?,
            decimal(node, "Length")?,
        );

    if let Some(arc) = node.child("ArcProperties") {
        entity = entity.with_arc(
            decimal(arc, "Radius")?,
            decimal(arc, "ChordLength")?,
            arc.child_text("Direction").unwrap_or_default(),
        );
    }
    if let Some(spiral) = node.child("SpiralProperties") {
        entity = entity.with_spiral(
            decimal(spiral, "RadiusIn")?,
            decimal(spiral, "RadiusOut")?,
            spiral.child_text("SpiralType").unwrap_or_default(),
        );
    }
    if let Some(line) = node.child("LineProperties") {
        entity = entity.with_bearing(decimal(line, "Bearing")?);
    }

    Ok(entity)
}

fn read_critical_station(node: &Node) -> Result<CriticalStation, ParseError> {
    Ok(CriticalStation::new(
        station_attribute(node, "station")?,
        node.child_text("TransitionType").unwrap_or_default(),
        decimal(node, "LeftSlope")?,
        decimal(node, "RightSlope")?,
    ))
}

/// Decimal text of the `field` child; `0.0` when the child is absent or empty.
fn decimal(node: &Node, field: &str) -> Result<f64, ParseError> {
    let Some(text) = node.child_text(field).map(str::trim).filter(|text| !text.is_empty())
    else {
        return Ok(0.0);
    };
    text.parse().map_err(|_| {
        ParseError::malformed(format!(
            "`{}` field `{field}` value `{text}` is not a number",
            node.name
        ))
    })
}

/// Station text of the `field` child; `0.0` when the child is absent or empty.
fn chainage(node: &Node, field: &str) -> Result<f64, ParseError> {
    match node.child_text(field).filter(|text| !text.trim().is_empty()) {
        Some(text) => read_station(node, field, text),
        None => Ok(0.0),
    }
}

fn station_attribute(node: &Node, key: &str) -> Result<f64, ParseError> {
    match node.attribute(key) {
        Some(text) => read_station(node, key, text),
        None => Err(ParseError::malformed(format!(
            "`{}` has no `{key}` station",
            node.name
        ))),
    }
}

fn read_station(node: &Node, field: &str, text: &str) -> Result<f64, ParseError> {
    station::try_parse(text)
        .map_err(|err| ParseError::malformed(format!("`{}` field `{field}`: {err}", node.name)))
}

fn invalid(element: &str, err: impl std::fmt::Display) -> ParseError {
    ParseError::malformed(format!("invalid markup in `{element}`: {err}"))
}
