use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, Result};

/// Top-level masking configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Brand tokens and other pattern-rule inputs.
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Line-level noise vocabulary.
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Recognizer labels that get redacted.
    #[serde(default)]
    pub entities: EntityConfig,

    /// Which entity recognizer backs the pipeline.
    #[serde(default)]
    pub recognizer: RecognizerConfig,

    /// Byte ceilings for batch output records.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding model selection.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl MaskConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| MaskError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the global config from `~/.config/ticket-mask/config.yml`.
    pub fn load_global() -> Result<Self> {
        let path = super::dirs_global().join("config.yml");
        Self::load_from(&path)
    }

    /// Render the effective configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| MaskError::InvalidConfig {
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Organization names replaced with `[MASKED_ORG]`, matched case-insensitively
    /// on word boundaries.
    pub org_names: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            org_names: vec!["sprinklr".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// A line containing any of these (case-insensitive) is dropped.
    pub noise_phrases: Vec<String>,
    /// Mail header remnants, dropped only on short lines.
    pub header_phrases: Vec<String>,
    /// Lines with at most this many words are eligible for the header rule.
    #[serde(default = "default_header_max_words")]
    pub header_max_words: usize,
}

fn default_header_max_words() -> usize {
    3
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            noise_phrases: vec![
                "survey".into(),
                "unsubscribe".into(),
                "automated response".into(),
                "ticket #".into(),
                "click here".into(),
                "get outlook".into(),
                "download app".into(),
                "calendar invite".into(),
            ],
            header_phrases: vec![
                "sent:".into(),
                "subject:".into(),
                "cc:".into(),
                "to:".into(),
            ],
            header_max_words: default_header_max_words(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    pub labels: Vec<String>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            labels: [
                "PERSON", "ORG", "GPE", "EMAIL", "URL", "LOC", "PHONE", "DATE", "TIME", "ID",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Entity recognizer backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend")]
pub enum RecognizerConfig {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "gazetteer")]
    Gazetteer {
        /// Phrase -> label.
        #[serde(default)]
        entries: BTreeMap<String, String>,
    },
    #[serde(rename = "http")]
    Http {
        url: String,
        #[serde(default = "default_batch_size")]
        batch_size: usize,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_batch_size() -> usize {
    16
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Records above this size are reported to the observer.
    pub warn_bytes: usize,
    /// Records above this size are split.
    pub split_bytes: usize,
    /// Maximum messages per split record.
    pub max_messages: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            warn_bytes: 200_000,
            split_bytes: 250_000,
            max_messages: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-mpnet-base-v2".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = MaskConfig::load_from(&tmp.path().join("nope.yml")).unwrap();
        assert_eq!(config.chunking.split_bytes, 250_000);
        assert_eq!(config.noise.header_max_words, 3);
        assert!(matches!(config.recognizer, RecognizerConfig::None));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(
            &path,
            "patterns:\n  org_names: [acme]\nrecognizer:\n  backend: http\n  url: http://localhost:9000/ner\n",
        )
        .unwrap();

        let config = MaskConfig::load_from(&path).unwrap();
        assert_eq!(config.patterns.org_names, vec!["acme".to_string()]);
        assert_eq!(config.chunking.max_messages, 50);
        match config.recognizer {
            RecognizerConfig::Http {
                url, batch_size, ..
            } => {
                assert_eq!(url, "http://localhost:9000/ner");
                assert_eq!(batch_size, 16);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn test_bad_yaml_is_config_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(&path, "chunking: [not, a, map]").unwrap();
        let err = MaskConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, MaskError::ConfigParse { .. }));
    }
}
