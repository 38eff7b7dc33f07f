//! Command implementations.

pub mod analyze;
pub mod profile;

pub use self::analyze::{analyze_file, build_provider, execute_analyze};
pub use self::profile::execute_profile;
