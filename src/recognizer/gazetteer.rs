use std::collections::BTreeMap;

use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;

use crate::error::{MaskError, Result};

use super::{Entity, EntityRecognizer};

/// Dictionary recognizer: known phrases mapped to labels.
///
/// Matching is ASCII case-insensitive and leftmost-longest, and only whole
/// words count (a phrase must not be glued to a letter or digit).
pub struct GazetteerRecognizer {
    automaton: Option<AhoCorasick>,
    labels: Vec<String>,
}

impl GazetteerRecognizer {
    pub fn new(entries: &BTreeMap<String, String>) -> Result<Self> {
        let (phrases, labels): (Vec<&str>, Vec<String>) = entries
            .iter()
            .filter(|(phrase, _)| !phrase.trim().is_empty())
            .map(|(phrase, label)| (phrase.as_str(), label.to_uppercase()))
            .unzip();

        if phrases.is_empty() {
            return Ok(Self {
                automaton: None,
                labels,
            });
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&phrases)
            .map_err(|e| MaskError::InvalidConfig {
                reason: format!("invalid gazetteer: {e}"),
            })?;
        Ok(Self {
            automaton: Some(automaton),
            labels,
        })
    }

    fn find(&self, text: &str) -> Vec<Entity> {
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };

        let mut entities = Vec::new();
        for mat in automaton.find_iter(text) {
            let (start, end) = (mat.start(), mat.end());
            let glued_before = text[..start].chars().next_back().is_some_and(is_word_char);
            let glued_after = text[end..].chars().next().is_some_and(is_word_char);
            if glued_before || glued_after {
                continue;
            }
            let start_char = text[..start].chars().count();
            let end_char = start_char + text[start..end].chars().count();
            entities.push(Entity::new(
                start_char,
                end_char,
                self.labels[mat.pattern().as_usize()].clone(),
            ));
        }
        entities
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[async_trait]
impl EntityRecognizer for GazetteerRecognizer {
    async fn recognize(&self, texts: &[String]) -> Result<Vec<Vec<Entity>>> {
        Ok(texts.iter().map(|t| self.find(t)).collect())
    }

    fn name(&self) -> &str {
        "gazetteer"
    }
}
