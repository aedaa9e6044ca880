mod fs;

pub(crate) use fs::require_file_exists;
pub use fs::ensure_writable;
