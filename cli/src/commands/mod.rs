pub mod outline;
pub mod render;
