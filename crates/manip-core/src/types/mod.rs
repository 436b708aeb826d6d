//! Core type definitions

mod axis;
mod object_id;
mod transform;

pub use axis::*;
pub use object_id::*;
pub use transform::*;
