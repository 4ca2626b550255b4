pub mod entity;
pub mod html;
pub mod noise;
pub mod patterns;
pub mod placeholder;

use std::sync::Arc;

use crate::config::MaskConfig;
use crate::error::Result;
use crate::recognizer::EntityRecognizer;

/// A single synchronous text transformation layer.
pub trait TextStage: Send + Sync {
    /// Transform the input text.
    fn apply(&self, input: &str) -> String;

    /// Name of this stage (for logging/debugging).
    fn name(&self) -> &str;
}

/// The complete masking pipeline.
///
/// Order: html extraction -> pattern rules -> noise filter run per message,
/// then one entity-redaction pass over the whole batch.
pub struct MaskingPipeline {
    stages: Vec<Box<dyn TextStage>>,
    entities: entity::EntityRedactor,
}

impl MaskingPipeline {
    /// Build the standard pipeline from config around an injected recognizer.
    pub fn from_config(config: &MaskConfig, recognizer: Arc<dyn EntityRecognizer>) -> Result<Self> {
        let patterns = patterns::PatternRedactor::with_org_names(&config.patterns.org_names)?;
        let noise = noise::NoiseFilter::from_config(&config.noise)?;
        Ok(Self::new(
            vec![
                Box::new(html::HtmlTextExtractor::new()),
                Box::new(patterns),
                Box::new(noise),
            ],
            entity::EntityRedactor::new(recognizer, &config.entities.labels),
        ))
    }

    /// Create a pipeline from custom stages.
    pub fn new(stages: Vec<Box<dyn TextStage>>, entities: entity::EntityRedactor) -> Self {
        Self { stages, entities }
    }

    /// Run the per-message stages (everything before entity redaction).
    pub fn prepare(&self, message: &str) -> String {
        let mut result = message.to_string();
        for stage in &self.stages {
            result = stage.apply(&result);
            tracing::trace!(stage = stage.name(), len = result.len(), "stage applied");
        }
        result
    }

    /// Mask one message.
    pub async fn mask(&self, message: &str) -> Result<String> {
        let mut masked = self.mask_batch(&[message]).await?;
        Ok(masked.pop().unwrap_or_default())
    }

    /// Mask a batch of messages; output `i` equals `mask(messages[i])`.
    pub async fn mask_batch<S: AsRef<str>>(&self, messages: &[S]) -> Result<Vec<String>> {
        let prepared: Vec<String> = messages.iter().map(|m| self.prepare(m.as_ref())).collect();
        tracing::debug!(
            count = prepared.len(),
            recognizer = self.entities.recognizer_name(),
            "running entity redaction"
        );
        self.entities.redact(&prepared).await
    }
}
