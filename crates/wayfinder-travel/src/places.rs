//! Points of interest around a place.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::capability::{place_name, CapabilityError, Step};
use crate::geocode::{Coordinate, Resolver};
use crate::http::{HttpTransport, UpstreamError};

/// One named point of interest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceRecord {
    pub name: String,
}

/// Search parameters for the Overpass query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesSettings {
    pub radius_m: u32,
    /// `tourism=*` values searched as points.
    pub categories: Vec<String>,
    /// Raw element limit (`out center N`).
    pub result_limit: u32,
    /// Cap on names listed in the reply; `None` lists every unique name.
    pub max_results: Option<usize>,
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            radius_m: 15_000,
            categories: ["attraction", "museum", "zoo", "viewpoint"]
                .into_iter()
                .map(String::from)
                .collect(),
            result_limit: 20,
            max_results: None,
        }
    }
}

/// Drop repeated names, keeping the first occurrence of each.
pub fn dedup_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Build the Overpass QL query: every category as nodes, plus attraction
/// areas (ways) reported by their center.
pub fn overpass_query(coordinate: Coordinate, settings: &PlacesSettings) -> String {
    let around = format!(
        "(around:{},{},{})",
        settings.radius_m, coordinate.latitude, coordinate.longitude
    );
    let mut clauses: Vec<String> = settings
        .categories
        .iter()
        .map(|category| format!("  node[\"tourism\"=\"{category}\"]{around};"))
        .collect();
    clauses.push(format!("  way[\"tourism\"=\"attraction\"]{around};"));

    format!(
        "[out:json];\n(\n{}\n);\nout center {};",
        clauses.join("\n"),
        settings.result_limit
    )
}

fn element_names(body: &serde_json::Value) -> Result<Vec<String>, UpstreamError> {
    if !body.is_object() {
        return Err(UpstreamError::Shape("overpass response is not an object".into()));
    }
    let names = body["elements"]
        .as_array()
        .map(|elements| {
            elements
                .iter()
                .filter_map(|e| e["tags"]["name"].as_str())
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    Ok(names)
}

/// Places capability: place → coordinate → Overpass → bulleted list.
pub struct PlacesCapability {
    resolver: Arc<Resolver>,
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    settings: PlacesSettings,
}

impl PlacesCapability {
    pub fn new(
        resolver: Arc<Resolver>,
        transport: Arc<dyn HttpTransport>,
        endpoint: impl Into<String>,
        settings: PlacesSettings,
    ) -> Self {
        Self {
            resolver,
            transport,
            endpoint: endpoint.into(),
            settings,
        }
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
        let records = self.find(place).await?;
        Ok(describe(place, &records))
    }

    /// Resolve `place` and list the unique named attractions around it.
    pub async fn find(&self, place: &str) -> Result<Vec<PlaceRecord>, CapabilityError> {
        let coordinate = self
            .resolver
            .resolve(place)
            .await
            .map_err(|e| CapabilityError::from_geocode(place, e))?;

        let query = [("data", overpass_query(coordinate, &self.settings))];
        let names = self
            .transport
            .get_json(&self.endpoint, &query)
            .await
            .and_then(|body| element_names(&body))
            .map_err(|source| CapabilityError::Upstream {
                step: Step::Places,
                source,
            })?;

        let raw = names.len();
        let mut unique = dedup_names(names);
        if let Some(max) = self.settings.max_results {
            unique.truncate(max);
        }
        debug!(%place, raw, unique = unique.len(), "places found");

        Ok(unique.into_iter().map(|name| PlaceRecord { name }).collect())
    }
}

fn describe(place: &str, records: &[PlaceRecord]) -> String {
    if records.is_empty() {
        return format!(
            "I couldn't find any tourist attractions in {place}. \
             This might be a small town or the data might be limited."
        );
    }
    let list = records
        .iter()
        .map(|r| format!("* {}", r.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Here are some places to visit in {place}:\n{list}")
}
