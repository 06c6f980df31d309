//! Per-section validators.

use crate::schema::WayfinderConfig;

use super::helpers::{validate_range, validate_range_f64, validate_url};

pub(crate) fn validate_engine(errors: &mut Vec<String>, config: &WayfinderConfig) {
    validate_range_f64(
        errors,
        "engine.temperature",
        config.engine.temperature,
        0.0,
        2.0,
    );
    validate_range(errors, "engine.max_steps", config.engine.max_steps, 1, 50);
    validate_url(errors, "engine.base_url", &config.engine.base_url);
    if config.engine.model.trim().is_empty() {
        errors.push("engine.model must not be empty".into());
    }
    if config.engine.credential_env.trim().is_empty() {
        errors.push("engine.credential_env must not be empty".into());
    }
}

pub(crate) fn validate_services(errors: &mut Vec<String>, config: &WayfinderConfig) {
    validate_url(errors, "services.geocoding_url", &config.services.geocoding_url);
    validate_url(errors, "services.forecast_url", &config.services.forecast_url);
    validate_url(errors, "services.overpass_url", &config.services.overpass_url);
    if config.services.user_agent.trim().is_empty() {
        errors.push("services.user_agent must not be empty".into());
    }
}

pub(crate) fn validate_places(errors: &mut Vec<String>, config: &WayfinderConfig) {
    validate_range(errors, "places.radius_m", config.places.radius_m, 100, 100_000);
    validate_range(
        errors,
        "places.result_limit",
        config.places.result_limit,
        1,
        500,
    );
    if config.places.categories.is_empty() {
        errors.push("places.categories must list at least one category".into());
    }
    if config.places.max_results == Some(0) {
        errors.push("places.max_results must be at least 1 when set".into());
    }
}

pub(crate) fn validate_http(errors: &mut Vec<String>, config: &WayfinderConfig) {
    validate_range(errors, "http.retries", config.http.retries, 0, 5);
    if config.http.timeout_secs == Some(0) {
        errors.push("http.timeout_secs must be positive when set".into());
    }
}
