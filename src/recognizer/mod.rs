pub mod gazetteer;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::RecognizerConfig;
use crate::error::Result;

/// A labeled span over one text. Offsets are character positions, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Entity {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// External named-entity recognizer.
///
/// Returns one entity list per input text, in input order. Must be
/// deterministic for identical text; the result for a text may not depend on
/// which other texts share its batch.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, texts: &[String]) -> Result<Vec<Vec<Entity>>>;

    /// Name of this backend (for logging).
    fn name(&self) -> &str;
}

/// Recognizer that never finds anything. Used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecognizer;

#[async_trait]
impl EntityRecognizer for NoopRecognizer {
    async fn recognize(&self, texts: &[String]) -> Result<Vec<Vec<Entity>>> {
        Ok(vec![Vec::new(); texts.len()])
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Build the configured recognizer. Called once at startup.
pub fn from_config(config: &RecognizerConfig) -> Result<Arc<dyn EntityRecognizer>> {
    match config {
        RecognizerConfig::None => {
            tracing::warn!("no entity recognizer configured; named-entity redaction is disabled");
            Ok(Arc::new(NoopRecognizer))
        }
        RecognizerConfig::Gazetteer { entries } => {
            Ok(Arc::new(gazetteer::GazetteerRecognizer::new(entries)?))
        }
        RecognizerConfig::Http {
            url,
            batch_size,
            timeout_secs,
        } => Ok(Arc::new(http::HttpRecognizer::new(
            url.clone(),
            *batch_size,
            Duration::from_secs(*timeout_secs),
        )?)),
    }
}
