//! Tabular side of the pipeline: reading measures out of source tables, joining them
//! onto regions, and turning them into display classes.

mod attribute;
mod bins;
mod coerce;
mod join;
mod product;

pub use attribute::{AttributeRow, AttributeTable, ColumnLayout};
pub use bins::{BinScale, Bucket, InvalidBinScale};
pub use coerce::{coerce_column, coerce_decimal};
pub use join::{JoinReport, KeyMismatch, KeyMismatchPolicy, divergence, left_join};
pub use product::{INDEX_MAX, INDEX_MIN, ProductIndex, product_index};
