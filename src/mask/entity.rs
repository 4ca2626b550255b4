use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{MaskError, Result};
use crate::recognizer::{Entity, EntityRecognizer};

use super::placeholder::{placeholder, strip_placeholders};

/// Stage 4: named-entity redaction over a batch of cleaned texts.
///
/// The recognizer is called once per batch. Entities with an allowed label are
/// replaced by placeholders from the highest start offset down, then every
/// placeholder is stripped and the text trimmed.
pub struct EntityRedactor {
    recognizer: Arc<dyn EntityRecognizer>,
    labels: HashSet<String>,
}

impl EntityRedactor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, labels: &[String]) -> Self {
        Self {
            recognizer,
            labels: labels.iter().cloned().collect(),
        }
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Redact every text; output order matches input order.
    ///
    /// Fails closed: if the recognizer errors or returns unusable data, no text
    /// of the batch is returned.
    pub async fn redact(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let entities = self.recognizer.recognize(texts).await?;
        if entities.len() != texts.len() {
            return Err(MaskError::Recognizer {
                reason: format!(
                    "{} returned {} entity lists for {} texts",
                    self.recognizer.name(),
                    entities.len(),
                    texts.len()
                ),
            });
        }

        texts
            .iter()
            .zip(entities)
            .map(|(text, ents)| self.apply(text, ents))
            .collect()
    }

    fn apply(&self, text: &str, mut entities: Vec<Entity>) -> Result<String> {
        // Byte offset of every char boundary, plus the end of the string.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        entities.retain(|e| self.labels.contains(&e.label));
        entities.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        let mut result = text.to_string();
        // Start of the lowest span replaced so far; spans reaching past it overlap.
        let mut floor = char_len;
        for entity in entities {
            if entity.start > entity.end || entity.end > char_len {
                return Err(MaskError::Recognizer {
                    reason: format!(
                        "{} returned span {}..{} outside a text of {} chars",
                        self.recognizer.name(),
                        entity.start,
                        entity.end,
                        char_len
                    ),
                });
            }
            if entity.end > floor {
                tracing::debug!(
                    start = entity.start,
                    end = entity.end,
                    label = %entity.label,
                    "skipping overlapping entity"
                );
                continue;
            }
            result.replace_range(
                boundaries[entity.start]..boundaries[entity.end],
                &placeholder(&entity.label),
            );
            floor = entity.start;
        }

        Ok(strip_placeholders(&result).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::NoopRecognizer;
    use async_trait::async_trait;

    struct Fixed(Vec<Vec<Entity>>);

    #[async_trait]
    impl EntityRecognizer for Fixed {
        async fn recognize(&self, _texts: &[String]) -> Result<Vec<Vec<Entity>>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn labels() -> Vec<String> {
        vec!["PERSON".into(), "GPE".into()]
    }

    #[tokio::test]
    async fn test_replaces_and_strips() {
        let text = "Sushant Kumar lives in Delhi".to_string();
        let r = EntityRedactor::new(
            Arc::new(Fixed(vec![vec![
                Entity::new(0, 13, "PERSON"),
                Entity::new(23, 28, "GPE"),
            ]])),
            &labels(),
        );
        let out = r.redact(&[text]).await.unwrap();
        assert_eq!(out, vec!["lives in".to_string()]);
    }

    #[tokio::test]
    async fn test_unlisted_labels_are_kept() {
        let r = EntityRedactor::new(
            Arc::new(Fixed(vec![vec![Entity::new(0, 5, "NORP")]])),
            &labels(),
        );
        let out = r.redact(&["Dutch people".to_string()]).await.unwrap();
        assert_eq!(out, vec!["Dutch people".to_string()]);
    }

    #[tokio::test]
    async fn test_multibyte_offsets_are_chars() {
        let r = EntityRedactor::new(
            Arc::new(Fixed(vec![vec![Entity::new(4, 9, "PERSON")]])),
            &labels(),
        );
        let out = r.redact(&["née Zoë! ok".to_string()]).await.unwrap();
        // "Zoë! " spans chars 4..9.
        assert_eq!(out, vec!["née ok".to_string()]);
    }

    #[tokio::test]
    async fn test_overlapping_entity_skipped() {
        let r = EntityRedactor::new(
            Arc::new(Fixed(vec![vec![
                Entity::new(0, 8, "PERSON"),
                Entity::new(5, 12, "GPE"),
            ]])),
            &labels(),
        );
        let out = r.redact(&["Ana Lima Rio x".to_string()]).await.unwrap();
        assert_eq!(out, vec!["Ana L x".to_string()]);
    }

    #[tokio::test]
    async fn test_out_of_range_span_fails_closed() {
        let r = EntityRedactor::new(
            Arc::new(Fixed(vec![vec![Entity::new(2, 40, "PERSON")]])),
            &labels(),
        );
        let err = r.redact(&["short".to_string()]).await.unwrap_err();
        assert!(matches!(err, MaskError::Recognizer { .. }));
    }

    #[tokio::test]
    async fn test_wrong_list_count_fails_closed() {
        let r = EntityRedactor::new(Arc::new(Fixed(vec![])), &labels());
        let err = r.redact(&["one".to_string()]).await.unwrap_err();
        assert!(matches!(err, MaskError::Recognizer { .. }));
    }

    #[tokio::test]
    async fn test_leftover_placeholders_removed() {
        let r = EntityRedactor::new(Arc::new(NoopRecognizer), &labels());
        let out = r
            .redact(&["  hi [MASKED_EMAIL] there  ".to_string()])
            .await
            .unwrap();
        assert_eq!(out, vec!["hi  there".to_string()]);
    }
}
