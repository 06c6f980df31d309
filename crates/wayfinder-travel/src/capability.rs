//! The closed set of capabilities and their text-only invocation boundary.

use std::fmt;

use tracing::{debug, warn};

use crate::geocode::GeocodeError;
use crate::http::UpstreamError;
use crate::places::PlacesCapability;
use crate::weather::WeatherCapability;

/// Pipeline stage that failed, named in the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Coordinates,
    Weather,
    Places,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Coordinates => "coordinates",
            Step::Weather => "weather",
            Step::Places => "places",
        };
        f.write_str(s)
    }
}

/// Domain-level failure of a capability pipeline. The `Display` text is the
/// sentence shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapabilityError {
    #[error("I need the name of a city or place to look that up.")]
    EmptyInput,
    #[error("I don't know if {place} exists or I couldn't find information about this place.")]
    NotFound { place: String },
    #[error("Error fetching {step}: {source}")]
    Upstream {
        step: Step,
        #[source]
        source: UpstreamError,
    },
}

impl CapabilityError {
    pub(crate) fn from_geocode(place: &str, err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(_) => CapabilityError::NotFound {
                place: place.to_string(),
            },
            GeocodeError::Upstream(source) => CapabilityError::Upstream {
                step: Step::Coordinates,
                source,
            },
        }
    }
}

/// Normalize a raw capability query into a place name.
pub(crate) fn place_name(query: &str) -> Result<&str, CapabilityError> {
    let place = query
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    if place.is_empty() {
        Err(CapabilityError::EmptyInput)
    } else {
        Ok(place)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Weather,
    Places,
}

impl CapabilityKind {
    /// Stable name the reasoning engine selects the capability by.
    pub fn default_name(self) -> &'static str {
        match self {
            CapabilityKind::Weather => "WeatherAgent",
            CapabilityKind::Places => "PlacesAgent",
        }
    }

    /// One-line selection hint shown to the reasoning engine.
    pub fn default_description(self) -> &'static str {
        match self {
            CapabilityKind::Weather => {
                "Useful for answering questions about weather, temperature, rain, or climate. \
                 Input should be the name of the city or place."
            }
            CapabilityKind::Places => {
                "Useful for answering questions about tourist attractions, places to visit, \
                 sightseeing, or trip planning. Input should be the name of the city or place."
            }
        }
    }
}

/// Every capability the assistant can run.
pub enum Capability {
    Weather(WeatherCapability),
    Places(PlacesCapability),
}

impl Capability {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Capability::Weather(_) => CapabilityKind::Weather,
            Capability::Places(_) => CapabilityKind::Places,
        }
    }

    /// Run the capability. Never fails: every error becomes reply text.
    pub async fn invoke(&self, query: &str) -> String {
        let kind = self.kind();
        let result = match self {
            Capability::Weather(weather) => weather.try_fetch(query).await,
            Capability::Places(places) => places.try_fetch(query).await,
        };
        match result {
            Ok(text) => {
                debug!(capability = ?kind, "capability succeeded");
                text
            }
            Err(e) => {
                warn!(capability = ?kind, "capability failed: {e}");
                e.to_string()
            }
        }
    }
}

impl From<WeatherCapability> for Capability {
    fn from(weather: WeatherCapability) -> Self {
        Capability::Weather(weather)
    }
}

impl From<PlacesCapability> for Capability {
    fn from(places: PlacesCapability) -> Self {
        Capability::Places(places)
    }
}
