//! Current conditions for a place.

use std::fmt;
use std::sync::Arc;

use chrono::Timelike;
use tracing::debug;

use crate::capability::{place_name, CapabilityError, Step};
use crate::geocode::{Coordinate, Resolver};
use crate::http::{HttpTransport, UpstreamError};

/// Supplies the local hour-of-day (0..=23) used to index the hourly series.
pub type HourSource = Arc<dyn Fn() -> u32 + Send + Sync>;

fn local_hour() -> u32 {
    chrono::Local::now().hour()
}

/// Conditions derived from one forecast response. Never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// °C as reported upstream; `None` when the field is missing.
    pub temperature: Option<f64>,
    /// Percentage 0-100.
    pub precipitation_probability: u8,
    pub hour_index: u32,
}

impl WeatherSnapshot {
    /// Read a snapshot out of an Open-Meteo response body.
    ///
    /// A series shorter than `hour_index`, or a null entry, reads as 0%.
    pub fn from_forecast(body: &serde_json::Value, hour_index: u32) -> Result<Self, UpstreamError> {
        if !body.is_object() {
            return Err(UpstreamError::Shape("forecast response is not an object".into()));
        }

        let temperature = body["current"]["temperature_2m"].as_f64();
        let precipitation_probability = body["hourly"]["precipitation_probability"]
            .as_array()
            .and_then(|series| series.get(hour_index as usize))
            .and_then(|v| v.as_f64())
            .map(|p| p.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0);

        Ok(Self {
            temperature,
            precipitation_probability,
            hour_index,
        })
    }

    /// The reply sentence for `place`.
    pub fn describe(&self, place: &str) -> String {
        format!(
            "In {place} it's currently {}°C with a chance of {}% to rain.",
            Temperature(self.temperature),
            self.precipitation_probability
        )
    }
}

struct Temperature(Option<f64>);

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "{t}"),
            None => f.write_str("unknown"),
        }
    }
}

/// Weather capability: place → coordinate → Open-Meteo forecast → sentence.
pub struct WeatherCapability {
    resolver: Arc<Resolver>,
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    hour_source: HourSource,
}

impl WeatherCapability {
    pub fn new(
        resolver: Arc<Resolver>,
        transport: Arc<dyn HttpTransport>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            transport,
            endpoint: endpoint.into(),
            hour_source: Arc::new(local_hour),
        }
    }

    pub fn with_hour_source(mut self, hour_source: HourSource) -> Self {
        self.hour_source = hour_source;
        self
    }

    /// Reply text for `place`; failures become explanatory sentences.
    pub async fn fetch(&self, place: &str) -> String {
        match self.try_fetch(place).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }

    pub async fn try_fetch(&self, query: &str) -> Result<String, CapabilityError> {
        let place = place_name(query)?;
        let snapshot = self.snapshot(place).await?;
        Ok(snapshot.describe(place))
    }

    /// Resolve `place` and read its current conditions.
    pub async fn snapshot(&self, place: &str) -> Result<WeatherSnapshot, CapabilityError> {
        let coordinate = self
            .resolver
            .resolve(place)
            .await
            .map_err(|e| CapabilityError::from_geocode(place, e))?;

        let hour = (self.hour_source)();
        let snapshot = self
            .transport
            .get_json(&self.endpoint, &forecast_query(coordinate))
            .await
            .and_then(|body| WeatherSnapshot::from_forecast(&body, hour))
            .map_err(|source| CapabilityError::Upstream {
                step: Step::Weather,
                source,
            })?;

        debug!(%place, hour, ?snapshot, "weather snapshot");
        Ok(snapshot)
    }
}

fn forecast_query(coordinate: Coordinate) -> [(&'static str, String); 5] {
    [
        ("latitude", coordinate.latitude.to_string()),
        ("longitude", coordinate.longitude.to_string()),
        ("current", "temperature_2m,precipitation_probability".to_string()),
        ("hourly", "precipitation_probability".to_string()),
        ("forecast_days", "1".to_string()),
    ]
}
