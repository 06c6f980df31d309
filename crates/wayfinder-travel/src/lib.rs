//! Travel data capabilities for Wayfinder.
//!
//! Every capability runs the same pipeline: resolve the place name to a
//! coordinate, query one upstream service at that coordinate, and format a
//! single text reply. Failures are turned into reply text at the
//! [`Capability`] boundary and never escape as errors.

pub mod capability;
pub mod geocode;
pub mod http;
pub mod places;
pub mod weather;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use capability::{Capability, CapabilityError, CapabilityKind, Step};
pub use geocode::{Coordinate, GeocodeError, Resolver};
pub use http::{HttpPolicy, HttpTransport, ReqwestTransport, Retrying, UpstreamError};
pub use places::{dedup_names, PlaceRecord, PlacesCapability, PlacesSettings};
pub use weather::{WeatherCapability, WeatherSnapshot};
