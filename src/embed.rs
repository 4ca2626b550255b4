use std::sync::Mutex;

use crate::config::EmbeddingConfig;
use crate::error::{MaskError, Result};

/// Text embedding collaborator.
///
/// Returns `None` for empty or whitespace-only text and when the model fails;
/// failures are logged, never raised.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Option<Vec<f32>>;
}

/// Resolve a configured model name to a fastembed model.
pub fn model_from_name(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name.to_ascii_lowercase().as_str() {
        "all-mpnet-base-v2" => Ok(fastembed::EmbeddingModel::AllMpnetBaseV2),
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML12V2),
        other => Err(MaskError::Embedding {
            reason: format!("unsupported embedding model: {other}"),
        }),
    }
}

/// Local sentence embeddings via fastembed. Loaded once, shared behind a mutex.
pub struct FastEmbedder {
    model: Mutex<fastembed::TextEmbedding>,
}

impl FastEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = model_from_name(&config.model)?;
        let model = fastembed::TextEmbedding::try_new(fastembed::InitOptions::new(model))
            .map_err(|e| MaskError::Embedding {
                reason: e.to_string(),
            })?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }

    fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut model = self.model.lock().unwrap_or_else(|e| e.into_inner());
        let embeddings = model
            .embed(vec![text], None)
            .map_err(|e| MaskError::Embedding {
                reason: e.to_string(),
            })?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MaskError::Embedding {
                reason: "no embedding returned".into(),
            })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Option<Vec<f32>> {
        if text.trim().is_empty() {
            return None;
        }
        match self.try_embed(text) {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                tracing::error!(error = %e, "embedding failed");
                None
            }
        }
    }
}
