//! Configuration system for kasba
//!
//! Settings come from built-in defaults, an optional YAML file in the
//! platform config directory, and environment variable overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{AddonsConfig, Config};
