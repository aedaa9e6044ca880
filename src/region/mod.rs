mod code;
mod layer;

pub use code::{AdminCode, DEFAULT_CODE_WIDTH};
pub use layer::{CODE_COLUMN, RegionLayer};
