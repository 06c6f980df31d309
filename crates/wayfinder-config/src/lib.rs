//! Wayfinder configuration system.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box. The engine credential
//! is not part of the file; the host reads it from the environment.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{WayfinderConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;
use wayfinder_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`,
/// and validate it. Validation failures are returned, not just logged.
pub fn load_config(path: Option<&Path>) -> Result<WayfinderConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
