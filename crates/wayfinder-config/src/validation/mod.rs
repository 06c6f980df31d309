//! Full configuration validation.
//!
//! Each section has its own check; this collects every problem into a
//! single `ConfigError` so the user sees them all at once.

mod helpers;
mod sections;


use crate::schema::WayfinderConfig;
use wayfinder_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WayfinderConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_engine(&mut errors, config);
    sections::validate_services(&mut errors, config);
    sections::validate_places(&mut errors, config);
    sections::validate_http(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
