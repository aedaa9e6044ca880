//! Map assembly: load, join, classify, render.

mod builder;
mod choropleth;
mod render;

pub use builder::MapBuilder;
pub use choropleth::{
    Choropleth, GROWTH_CLASS_COLUMN, GROWTH_COLUMN, Legend, MapOptions, NO_DATA_LABEL,
    PRODUCT_COLUMN, SUPPORT_CLASS_COLUMN, SUPPORT_COLUMN,
};
pub use render::CanvasSize;
