//! SVG format writing operations for map rendering.

mod color;
mod geometry;
mod writer;

pub use color::{NO_DATA, Rgb, class_colors, coolwarm};
pub(crate) use geometry::*;
pub(crate) use writer::*;
