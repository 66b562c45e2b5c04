pub mod collector_service;
pub mod detail_service;
pub mod series_service;
pub mod task_service;
pub mod topology_service;

use crate::core::domain::error::{ProxmoxError, ProxmoxResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes an upstream `data` payload, naming the path on failure.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, value: Value) -> ProxmoxResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ProxmoxError::Decode(format!("unexpected payload from '{}': {}", path, e)))
}

/// Decodes a list payload. A `null` list is empty.
pub(crate) fn decode_list<T: DeserializeOwned>(path: &str, value: Value) -> ProxmoxResult<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => decode(path, other),
    }
}
