//! Alignment model types.
//!
//! The model is a tree built once per parse pass and read by every renderer:
//!
//! ```text
//! AlignmentSet
//!   └─ Alignment
//!        ├─ Element ─┬─ StationPoint (ordered)
//!        │           └─ properties (insertion-ordered map)
//!        ├─ StationSample      (alignment-level sampled stations)
//!        ├─ GeometricEntity    (arcs, spirals, lines)
//!        └─ CriticalStation    (superelevation)
//! ```
//!
//! Every type deserializes from the JSON shape produced by the upstream
//! alignment extractor, so an already-parsed alignment can be passed straight
//! through to the renderers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name given to an alignment until a header row supplies one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A single point of interest inside an element (`POB`, `PVI`, `PVC`, ...).
///
/// `x` and `y` default to `0.0` when the row shape carries no planar data.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationPoint {
    point_type: String,
    station: f64,
    elevation: Option<f64>,
    x: f64,
    y: f64,
}

impl StationPoint {
    /// Create a point with no elevation and no planar coordinates.
    pub fn new(point_type: impl Into<String>, station: f64) -> Self {
        Self {
            point_type: point_type.into(),
            station,
            ..Self::default()
        }
    }

    /// Attach an elevation.
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Attach planar coordinates (`x` is easting, `y` is northing).
    pub fn with_planar(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn point_type(&self) -> &str {
        &self.point_type
    }

    /// Absolute chainage of the point.
    pub fn station(&self) -> f64 {
        self.station
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    /// Easting.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Northing.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Whether the point carries a non-zero planar coordinate.
    pub fn has_planar(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}

/// A geometric element of an alignment report, opened by an `Element:` row.
///
/// The element type is an open tag: `Linear`, `Parabola` and `Spiral` are
/// common, but any text is accepted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Element {
    #[serde(rename = "type")]
    element_type: String,
    stations: Vec<StationPoint>,
    properties: IndexMap<String, String>,
}

impl Element {
    /// Create an empty element of the given type.
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            ..Self::default()
        }
    }

    /// Append a station point, keeping row order.
    pub fn push_station(&mut self, point: StationPoint) {
        self.stations.push(point);
    }

    /// Set a property; an existing key keeps its position and takes the new value.
    pub fn insert_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    pub fn stations(&self) -> &[StationPoint] {
        &self.stations
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}

/// A station sampled along the alignment, as written to the markup `Stations` list.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationSample {
    point_type: Option<String>,
    station: f64,
    x: f64,
    y: f64,
    z: f64,
    elevation: Option<f64>,
    direction: f64,
    offset: f64,
}

impl StationSample {
    /// Create a sample at a station with every other field zeroed.
    pub fn new(station: f64) -> Self {
        Self {
            station,
            ..Self::default()
        }
    }

    /// Derive a sample from a parsed station point.
    ///
    /// The elevation becomes `z`; direction and offset stay zero.
    pub fn from_point(point: &StationPoint) -> Self {
        Self {
            point_type: Some(point.point_type().to_string()),
            station: point.station(),
            x: point.x(),
            y: point.y(),
            z: point.elevation().unwrap_or(0.0),
            elevation: point.elevation(),
            direction: 0.0,
            offset: 0.0,
        }
    }

    pub fn with_point_type(mut self, point_type: impl Into<String>) -> Self {
        self.point_type = Some(point_type.into());
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_coordinates(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    pub fn with_direction(mut self, direction: f64) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Point tag carried over from the element row, if any.
    pub fn point_type(&self) -> Option<&str> {
        self.point_type.as_deref()
    }

    pub fn station(&self) -> f64 {
        self.station
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    /// Direction in radians.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// Type-specific geometry of a [`GeometricEntity`], selected from its type tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityGeometry<'a> {
    Arc {
        radius: f64,
        chord_length: f64,
        /// `CW` or `CCW`.
        direction: &'a str,
    },
    Spiral {
        radius_in: f64,
        radius_out: f64,
        spiral_type: &'a str,
    },
    Line {
        bearing: f64,
    },
}

/// A horizontal geometry entity (tangent, arc or spiral) of an alignment.
///
/// Type-specific values are stored flat, the way the extractor writes them;
/// [`GeometricEntity::geometry`] picks the ones that apply.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GeometricEntity {
    index: usize,
    #[serde(rename = "type")]
    entity_type: String,
    start_station: f64,
    end_station: f64,
    length: f64,
    radius: f64,
    chord_length: f64,
    direction: Option<String>,
    radius_in: f64,
    radius_out: f64,
    spiral_type: Option<String>,
    bearing: f64,
}

impl GeometricEntity {
    pub fn new(index: usize, entity_type: impl Into<String>) -> Self {
        Self {
            index,
            entity_type: entity_type.into(),
            ..Self::default()
        }
    }

    pub fn with_range(mut self, start_station: f64, end_station: f64, length: f64) -> Self {
        self.start_station = start_station;
        self.end_station = end_station;
        self.length = length;
        self
    }

    pub fn with_arc(mut self, radius: f64, chord_length: f64, direction: impl Into<String>) -> Self {
        self.radius = radius;
        self.chord_length = chord_length;
        self.direction = Some(direction.into());
        self
    }

    pub fn with_spiral(
        mut self,
        radius_in: f64,
        radius_out: f64,
        spiral_type: impl Into<String>,
    ) -> Self {
        self.radius_in = radius_in;
        self.radius_out = radius_out;
        self.spiral_type = Some(spiral_type.into());
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn start_station(&self) -> f64 {
        self.start_station
    }

    pub fn end_station(&self) -> f64 {
        self.end_station
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Type-specific geometry, chosen by substring of the type tag.
    ///
    /// `Arc` or `Curve` selects arc values, `Spiral` selects spiral values and
    /// `Tangent` or `Line` selects the bearing. The checks run in that order,
    /// so `SpiralCurveSpiral` is an arc. Other tags carry no geometry.
    pub fn geometry(&self) -> Option<EntityGeometry<'_>> {
        let tag = self.entity_type.as_str();
        if tag.contains("Arc") || tag.contains("Curve") {
            Some(EntityGeometry::Arc {
                radius: self.radius,
                chord_length: self.chord_length,
                direction: self.direction.as_deref().unwrap_or("CW"),
            })
        } else if tag.contains("Spiral") {
            Some(EntityGeometry::Spiral {
                radius_in: self.radius_in,
                radius_out: self.radius_out,
                spiral_type: self.spiral_type.as_deref().unwrap_or(UNKNOWN_NAME),
            })
        } else if tag.contains("Tangent") || tag.contains("Line") {
            Some(EntityGeometry::Line {
                bearing: self.bearing,
            })
        } else {
            None
        }
    }
}

/// A superelevation critical station.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CriticalStation {
    station: f64,
    #[serde(rename = "type")]
    transition_type: String,
    left_slope: f64,
    right_slope: f64,
}

impl CriticalStation {
    pub fn new(
        station: f64,
        transition_type: impl Into<String>,
        left_slope: f64,
        right_slope: f64,
    ) -> Self {
        Self {
            station,
            transition_type: transition_type.into(),
            left_slope,
            right_slope,
        }
    }

    pub fn station(&self) -> f64 {
        self.station
    }

    pub fn transition_type(&self) -> &str {
        &self.transition_type
    }

    pub fn left_slope(&self) -> f64 {
        self.left_slope
    }

    pub fn right_slope(&self) -> f64 {
        self.right_slope
    }
}

/// One alignment: header fields, ordered elements, and the extractor-level
/// samples, entities and superelevation data.
///
/// Serialized field names follow the extractor's JSON: sampled stations are
/// read from `stations` and geometric entities from `curves`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Alignment {
    name: String,
    id: String,
    project_name: String,
    description: String,
    horizontal_alignment: String,
    vertical_alignment: String,
    style: String,
    length: f64,
    start_station: f64,
    end_station: f64,
    elements: Vec<Element>,
    #[serde(rename = "stations")]
    samples: Vec<StationSample>,
    #[serde(rename = "curves")]
    entities: Vec<GeometricEntity>,
    superelevation: Vec<CriticalStation>,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            id: String::new(),
            project_name: String::new(),
            description: String::new(),
            horizontal_alignment: String::new(),
            vertical_alignment: String::new(),
            style: String::new(),
            length: 0.0,
            start_station: 0.0,
            end_station: 0.0,
            elements: Vec::new(),
            samples: Vec::new(),
            entities: Vec::new(),
            superelevation: Vec::new(),
        }
    }
}

impl Alignment {
    /// Create an alignment with default header fields and no content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the name is still the placeholder given at construction.
    pub fn has_default_name(&self) -> bool {
        self.name.is_empty() || self.name == UNKNOWN_NAME
    }

    /// Whether any station point of any element carries an elevation.
    pub fn has_elevation_data(&self) -> bool {
        self.station_points()
            .any(|point| point.elevation().is_some())
    }

    /// Whether any station point of any element carries a non-zero `x` or `y`.
    pub fn has_planar_data(&self) -> bool {
        self.station_points().any(StationPoint::has_planar)
    }

    /// Every station point of every element, in element then row order.
    pub fn station_points(&self) -> impl Iterator<Item = &StationPoint> {
        self.elements.iter().flat_map(|element| element.stations())
    }

    /// Collect every element station point into the alignment-level samples
    /// and fill unset start/end stations from their minimum and maximum.
    pub fn derive_samples(&mut self) {
        let derived: Vec<StationSample> =
            self.station_points().map(StationSample::from_point).collect();
        self.samples.extend(derived);

        let stations = self.samples.iter().map(StationSample::station);
        let min = stations.clone().reduce(f64::min);
        let max = stations.reduce(f64::max);

        if self.start_station == 0.0 {
            if let Some(min) = min {
                self.start_station = min;
            }
        }
        if self.end_station == 0.0 {
            if let Some(max) = max {
                self.end_station = max;
            }
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn set_project_name(&mut self, project_name: impl Into<String>) {
        self.project_name = project_name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_horizontal_alignment(&mut self, name: impl Into<String>) {
        self.horizontal_alignment = name.into();
    }

    pub fn set_vertical_alignment(&mut self, name: impl Into<String>) {
        self.vertical_alignment = name.into();
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    pub fn set_start_station(&mut self, station: f64) {
        self.start_station = station;
    }

    pub fn set_end_station(&mut self, station: f64) {
        self.end_station = station;
    }

    pub fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn push_sample(&mut self, sample: StationSample) {
        self.samples.push(sample);
    }

    pub fn push_entity(&mut self, entity: GeometricEntity) {
        self.entities.push(entity);
    }

    pub fn push_critical_station(&mut self, station: CriticalStation) {
        self.superelevation.push(station);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn horizontal_alignment(&self) -> &str {
        &self.horizontal_alignment
    }

    pub fn vertical_alignment(&self) -> &str {
        &self.vertical_alignment
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn start_station(&self) -> f64 {
        self.start_station
    }

    pub fn end_station(&self) -> f64 {
        self.end_station
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Alignment-level sampled stations.
    pub fn samples(&self) -> &[StationSample] {
        &self.samples
    }

    /// Horizontal geometry entities.
    pub fn entities(&self) -> &[GeometricEntity] {
        &self.entities
    }

    /// Superelevation critical stations.
    pub fn superelevation(&self) -> &[CriticalStation] {
        &self.superelevation
    }
}

/// The alignments of one report, with the report-level metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentSet {
    project_name: Option<String>,
    timestamp: Option<String>,
    alignments: Vec<Alignment>,
}

impl AlignmentSet {
    pub fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            ..Self::default()
        }
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Report project name: the set's own, else the first alignment's, else `Unknown`.
    pub fn project_name(&self) -> &str {
        self.project_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.alignments
                    .first()
                    .map(Alignment::project_name)
                    .filter(|name| !name.is_empty())
            })
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Generation timestamp carried by the input, if any.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.alignments.len()
    }
}
