//! Scripted in-memory transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::http::{HttpTransport, UpstreamError};

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that answers each URL with a fixed, scripted result and records
/// every call. Unscripted URLs fail with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, Result<serde_json::Value, UpstreamError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: serde_json::Value) -> &Self {
        self.script(url, Ok(body))
    }

    pub fn fail(&self, url: &str, err: UpstreamError) -> &Self {
        self.script(url, Err(err))
    }

    fn script(&self, url: &str, result: Result<serde_json::Value, UpstreamError>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.url == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, UpstreamError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(UpstreamError::Transport {
                    url: url.to_string(),
                    message: "no scripted response".into(),
                })
            })
    }
}
