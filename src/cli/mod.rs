pub mod config_cmd;
pub mod embed;
pub mod mask;

use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt;

use crate::config::MaskConfig;
use crate::error::{MaskError, Result};

/// Load config from an explicit path, or the global location.
pub fn load_config(path: Option<&Path>) -> Result<MaskConfig> {
    match path {
        Some(path) => MaskConfig::load_from(path),
        None => MaskConfig::load_global(),
    }
}

/// Read a JSON request body from a file or stdin. An empty body is an empty
/// request; anything that is not JSON is rejected.
pub async fn read_body<T: DeserializeOwned + Default>(input: Option<&Path>) -> Result<T> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    parse_body(&raw)
}

pub fn parse_body<T: DeserializeOwned + Default>(raw: &str) -> Result<T> {
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(|e| MaskError::MalformedRequest {
        reason: e.to_string(),
    })
}
