//! Report orientation.
//!
//! A vertical report lists `STATION`/`ELEVATION` columns; a horizontal report
//! lists `STATION`/`NORTHING`/`EASTING`. [`Orientation::Auto`] picks one from
//! the data.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::model::Alignment;

/// Orientation selector, as requested by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Decide from the data (default)
    #[default]
    Auto,
    /// Station and elevation columns
    Vertical,
    /// Station, northing and easting columns
    Horizontal,
}

/// Orientation after `Auto` has been resolved against an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Resolve against an alignment.
    ///
    /// `Auto` becomes horizontal when any station point carries planar
    /// coordinates, and vertical when the points carry elevations only.
    /// An alignment with neither gets the vertical layout.
    pub fn resolve(self, alignment: &Alignment) -> Layout {
        match self {
            Self::Vertical => Layout::Vertical,
            Self::Horizontal => Layout::Horizontal,
            Self::Auto => match (alignment.has_elevation_data(), alignment.has_planar_data()) {
                (_, true) => Layout::Horizontal,
                (true, false) => Layout::Vertical,
                (false, false) => Layout::Vertical,
            },
        }
    }
}

impl Layout {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

impl FromStr for Orientation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            _ => Err("Unsupported orientation"),
        }
    }
}

impl From<Orientation> for &'static str {
    fn from(val: Orientation) -> Self {
        match val {
            Orientation::Auto => "auto",
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}
