//! Startup wiring: config sections become the engine client, the shared
//! transport and resolver, and the capability registry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use wayfinder_agent::{CapabilityDescriptor, CapabilityRegistry, Orchestrator};
use wayfinder_ai::{OpenAiClient, OpenAiConfig};
use wayfinder_common::{ConfigError, WayfinderError};
use wayfinder_config::schema::{HttpConfig, PlacesConfig};
use wayfinder_config::WayfinderConfig;
use wayfinder_travel::{
    Capability, HttpPolicy, HttpTransport, PlacesCapability, PlacesSettings, ReqwestTransport,
    Resolver, WeatherCapability,
};

/// Pick the engine credential: the explicit flag first, then the env var
/// named in config. Blank values count as missing.
pub fn resolve_credential<F>(
    flag: Option<&str>,
    env_name: &str,
    lookup: F,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    flag.map(str::to_string)
        .or_else(|| lookup(env_name))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ConfigError::MissingCredential(env_name.to_string()))
}

pub fn engine_config(config: &WayfinderConfig, token: String) -> OpenAiConfig {
    let engine = &config.engine;
    OpenAiConfig::new(token)
        .with_base_url(engine.base_url.clone())
        .with_model(engine.model.clone())
        .with_max_tokens(engine.max_tokens)
        .with_temperature(engine.temperature)
        .with_timeout(config.http.timeout_secs.map(Duration::from_secs))
        .with_connect_timeout(config.http.connect_timeout_secs.map(Duration::from_secs))
}

pub fn http_policy(http: &HttpConfig) -> HttpPolicy {
    HttpPolicy {
        timeout: http.timeout_secs.map(Duration::from_secs),
        connect_timeout: http.connect_timeout_secs.map(Duration::from_secs),
        retries: http.retries,
    }
}

pub fn places_settings(places: &PlacesConfig) -> PlacesSettings {
    PlacesSettings {
        radius_m: places.radius_m,
        categories: places.categories.clone(),
        result_limit: places.result_limit,
        max_results: places.max_results.map(|n| n as usize),
    }
}

/// Weather and places, sharing one resolver and one transport.
pub fn build_registry(
    config: &WayfinderConfig,
    transport: Arc<dyn HttpTransport>,
) -> wayfinder_common::Result<CapabilityRegistry> {
    let services = &config.services;
    let resolver = Arc::new(Resolver::new(transport.clone(), services.geocoding_url.clone()));

    let weather =
        WeatherCapability::new(resolver.clone(), transport.clone(), services.forecast_url.clone());
    let places = PlacesCapability::new(
        resolver,
        transport,
        services.overpass_url.clone(),
        places_settings(&config.places),
    );

    let mut registry = CapabilityRegistry::new();
    for capability in [Capability::from(weather), Capability::from(places)] {
        registry
            .register(CapabilityDescriptor::from(capability))
            .map_err(|e| WayfinderError::Other(e.to_string()))?;
    }
    debug!(capabilities = ?registry.names(), "registry ready");
    Ok(registry)
}

/// Build a ready orchestrator from validated config and a credential.
pub fn build_orchestrator(
    config: &WayfinderConfig,
    token: String,
) -> wayfinder_common::Result<Orchestrator> {
    let engine = OpenAiClient::new(engine_config(config, token))
        .map_err(|e| WayfinderError::Ai(e.to_string()))?;

    let transport =
        ReqwestTransport::with_policy(&config.services.user_agent, &http_policy(&config.http))
            .map_err(|e| WayfinderError::Network(e.to_string()))?;
    let registry = build_registry(config, transport)?;

    info!(
        model = %config.engine.model,
        max_steps = config.engine.max_steps,
        "orchestrator ready"
    );
    Ok(Orchestrator::new(Arc::new(engine), Arc::new(registry))
        .with_max_steps(config.engine.max_steps))
}
