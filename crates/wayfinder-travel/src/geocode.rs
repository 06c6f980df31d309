//! Place name → coordinate resolution.
//!
//! One shared [`Resolver`] is handed to every capability so weather and
//! places agree on the coordinate for a given name.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::http::{HttpTransport, UpstreamError};

/// A resolved location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodeError {
    #[error("no match for {0:?}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Geocoding client for a Nominatim-compatible `/search` endpoint.
pub struct Resolver {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl Resolver {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Resolve `place` to the best single match. One request, no retries
    /// beyond what the transport policy allows.
    pub async fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let query = [
            ("q", place.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        let body = self.transport.get_json(&self.endpoint, &query).await?;
        let coordinate = parse_matches(place, &body)?;
        debug!(%place, %coordinate, "resolved place");
        Ok(coordinate)
    }
}

fn parse_matches(place: &str, body: &serde_json::Value) -> Result<Coordinate, GeocodeError> {
    let matches = body
        .as_array()
        .ok_or_else(|| UpstreamError::Shape("geocoding response is not a list".into()))?;
    let first = matches
        .first()
        .ok_or_else(|| GeocodeError::NotFound(place.to_string()))?;

    Ok(Coordinate {
        latitude: decimal_field(first, "lat")?,
        longitude: decimal_field(first, "lon")?,
    })
}

/// Nominatim sends coordinates as decimal strings; plain numbers are accepted too.
fn decimal_field(entry: &serde_json::Value, key: &str) -> Result<f64, UpstreamError> {
    let value = &entry[key];
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
        .ok_or_else(|| UpstreamError::Shape(format!("geocoding match has no decimal `{key}`")))
}
