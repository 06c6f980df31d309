//! Upstream data service endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub overpass_url: String,
    /// Sent on every upstream request; Nominatim rejects anonymous clients.
    pub user_agent: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://nominatim.openstreetmap.org/search".into(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".into(),
            overpass_url: "https://overpass-api.de/api/interpreter".into(),
            user_agent: "AI_Tourism_Agent/1.0".into(),
        }
    }
}
