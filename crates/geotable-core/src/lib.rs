//! Geotable Core Types
//!
//! This crate provides the foundational types shared by the geotable parser
//! and renderers:
//!
//! - **Station notation**: chainage parsing and formatting ([`station`] module)
//! - **Model**: the alignment tree built by the parser ([`model`] module)
//! - **Orientation**: vertical/horizontal report selection ([`orientation`] module)

pub mod model;
pub mod orientation;
pub mod station;
