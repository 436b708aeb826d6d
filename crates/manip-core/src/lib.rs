//! Scene Manipulator Core
//!
//! This crate contains the geometry side of scene manipulation:
//! - Types: object handles, world transforms, axis/target/direction enums
//! - Bounds: world-space bounding volumes and their aggregation
//! - Selection: ordered, de-duplicated object selections
//! - Scene: capability traits for the host scene graph, plus an in-memory scene
//! - Ops: positioning, rotation, alignment, arrangement, snapping and utilities
//! - Measurement: distance and bounds statistics for a selection

pub mod bounds;
pub mod measurement;
pub mod ops;
pub mod scene;
pub mod selection;
pub mod types;

pub use bounds::*;
pub use measurement::*;
pub use ops::{ManipError, ManipResult};
pub use scene::*;
pub use selection::*;
pub use types::*;
