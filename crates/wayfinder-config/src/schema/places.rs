//! Points-of-interest search settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Search radius in meters (valid range: 100-100000).
    pub radius_m: u32,
    /// `tourism=*` values queried as point geometries.
    pub categories: Vec<String>,
    /// Raw element limit passed to the query (valid range: 1-500).
    pub result_limit: u32,
    /// Optional cap on listed names. Unset lists every unique name.
    pub max_results: Option<u32>,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            radius_m: 15_000,
            categories: vec![
                "attraction".into(),
                "museum".into(),
                "zoo".into(),
                "viewpoint".into(),
            ],
            result_limit: 20,
            max_results: None,
        }
    }
}
