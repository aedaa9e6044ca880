#![doc = "Polish administrative-unit choropleths: election support, natural growth, and their product index"]
mod common;
mod io;
mod maps;

pub mod config;
pub mod data;
pub mod party;
pub mod region;

#[doc(inline)]
pub use common::ensure_writable;

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use io::svg::{NO_DATA, Rgb};

#[doc(inline)]
pub use maps::{
    CanvasSize, Choropleth, GROWTH_CLASS_COLUMN, GROWTH_COLUMN, Legend, MapBuilder, MapOptions,
    NO_DATA_LABEL, PRODUCT_COLUMN, SUPPORT_CLASS_COLUMN, SUPPORT_COLUMN,
};

#[doc(inline)]
pub use party::{Party, UnknownParty};

#[doc(inline)]
pub use region::{AdminCode, RegionLayer};
