//! Configuration schema types for Wayfinder.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the assistant ships with.

mod engine;
mod http;
mod places;
mod services;
mod system;

pub use engine::*;
pub use http::*;
pub use places::*;
pub use services::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Wayfinder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WayfinderConfig {
    pub engine: EngineConfig,
    pub services: ServicesConfig,
    pub places: PlacesConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}
