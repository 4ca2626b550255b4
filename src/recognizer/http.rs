use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MaskError, Result};

use super::{Entity, EntityRecognizer};

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    entities: Vec<Vec<Entity>>,
}

/// Recognizer backed by a remote NER service.
///
/// POSTs `{"texts": [...]}` and expects `{"entities": [[{start, end, label}]]}`
/// with one list per text. Texts are sent in sub-batches of `batch_size`.
pub struct HttpRecognizer {
    client: reqwest::Client,
    url: String,
    batch_size: usize,
}

impl HttpRecognizer {
    pub fn new(url: String, batch_size: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MaskError::Recognizer {
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            client,
            url,
            batch_size: batch_size.max(1),
        })
    }

    async fn send(&self, texts: &[String]) -> Result<Vec<Vec<Entity>>> {
        let response = self
            .client
            .post(&self.url)
            .json(&RecognizeRequest { texts })
            .send()
            .await
            .map_err(|e| MaskError::Recognizer {
                reason: format!("request to {} failed: {e}", self.url),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MaskError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RecognizeResponse =
            response.json().await.map_err(|e| MaskError::Recognizer {
                reason: format!("malformed recognizer response: {e}"),
            })?;
        if parsed.entities.len() != texts.len() {
            return Err(MaskError::Recognizer {
                reason: format!(
                    "recognizer returned {} entity lists for {} texts",
                    parsed.entities.len(),
                    texts.len()
                ),
            });
        }
        Ok(parsed.entities)
    }
}

#[async_trait]
impl EntityRecognizer for HttpRecognizer {
    async fn recognize(&self, texts: &[String]) -> Result<Vec<Vec<Entity>>> {
        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            tracing::debug!(batch = batch.len(), url = %self.url, "sending texts to recognizer");
            all.extend(self.send(batch).await?);
        }
        Ok(all)
    }

    fn name(&self) -> &str {
        "http"
    }
}
