use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

/// Thin JSON-over-HTTP wrapper around a shared `ureq` agent. Cheap to
/// clone.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let mut response = self.agent.get(&url).call()?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        if !response.status().is_success() {
            return Err(status_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a JSON body. Returns the response body when it is a non-empty
    /// JSON document.
    pub fn send_json(&self, method: Method, path: &str, payload: &Value) -> Result<Option<Value>, ClientError> {
        let url = self.url(path);
        let bytes = serde_json::to_vec(payload)?;
        debug!(%url, ?method, bytes = bytes.len(), "sending JSON");

        let request = match method {
            Method::Post => self.agent.post(&url),
            Method::Put => self.agent.put(&url),
        };
        let mut response = request
            .header("Content-Type", "application/json")
            .send(&bytes[..])?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        if !response.status().is_success() {
            return Err(status_error(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}

fn status_error(status: u16, body: &str) -> ClientError {
    ClientError::Status {
        status,
        message: rejection_message(status, body),
    }
}

/// The user-facing message for a failed response: the body's `error` or
/// `message` field when present, otherwise a generic line with the status.
pub fn rejection_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["error", "message"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"))
}
