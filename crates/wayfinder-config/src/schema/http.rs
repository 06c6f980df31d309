//! Outbound HTTP policy.

use serde::{Deserialize, Serialize};

/// Timeouts and retries for upstream calls. The defaults perform a single
/// attempt with no timeout.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    /// Extra attempts after a transport failure (valid range: 0-5).
    pub retries: u32,
}
