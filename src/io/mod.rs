//! Format-specific reading and writing.
//!
//! - `shp` - boundary shapefiles (geometry + dBASE code field)
//! - `csv` - delimited attribute tables in, joined tables out
//! - `svg` - choropleth and outline rendering
//! - `geojson` - joined layer export

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod shp;
pub(crate) mod svg;
