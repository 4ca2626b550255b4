use aho_corasick::AhoCorasick;

use crate::config::NoiseConfig;
use crate::error::{MaskError, Result};

use super::TextStage;

/// Words containing this (case-insensitive) are dropped, which also removes
/// partially formed placeholder fragments.
const MASK_MARKER: &str = "masked";

/// Stage 3: line-level removal of signatures, footers and mail headers.
///
/// Lines are trimmed; empty lines, lines with a noise phrase, and short lines
/// with a header phrase are dropped. Remaining lines lose any word containing
/// "masked" and survive only if a word is left. Survivors are joined with
/// single spaces, in their original order.
pub struct NoiseFilter {
    noise: Option<AhoCorasick>,
    headers: Option<AhoCorasick>,
    header_max_words: usize,
}

impl NoiseFilter {
    pub fn new(
        noise_phrases: &[String],
        header_phrases: &[String],
        header_max_words: usize,
    ) -> Result<Self> {
        Ok(Self {
            noise: build_automaton(noise_phrases)?,
            headers: build_automaton(header_phrases)?,
            header_max_words,
        })
    }

    pub fn from_config(config: &NoiseConfig) -> Result<Self> {
        Self::new(
            &config.noise_phrases,
            &config.header_phrases,
            config.header_max_words,
        )
    }

    pub fn clean(&self, input: &str) -> String {
        let mut kept: Vec<String> = Vec::new();

        for line in input.split(is_line_break) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if contains_any(self.noise.as_ref(), line) {
                continue;
            }
            let word_count = line.split_whitespace().count();
            if word_count <= self.header_max_words && contains_any(self.headers.as_ref(), line) {
                continue;
            }

            let words: Vec<&str> = line
                .split_whitespace()
                .filter(|w| !w.to_lowercase().contains(MASK_MARKER))
                .collect();
            if !words.is_empty() {
                kept.push(words.join(" "));
            }
        }

        kept.join(" ")
    }
}

impl TextStage for NoiseFilter {
    fn apply(&self, input: &str) -> String {
        self.clean(input)
    }

    fn name(&self) -> &str {
        "noise"
    }
}

fn build_automaton(phrases: &[String]) -> Result<Option<AhoCorasick>> {
    if phrases.is_empty() {
        return Ok(None);
    }
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(phrases)
        .map(Some)
        .map_err(|e| MaskError::InvalidConfig {
            reason: format!("invalid noise vocabulary: {e}"),
        })
}

fn contains_any(automaton: Option<&AhoCorasick>, line: &str) -> bool {
    automaton.is_some_and(|ac| ac.is_match(line))
}

/// The same set of line boundaries a universal-newlines splitter uses.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> NoiseFilter {
        NoiseFilter::from_config(&NoiseConfig::default()).unwrap()
    }

    #[test]
    fn test_short_header_line_dropped() {
        assert_eq!(filter().clean("Sent: Monday"), "");
    }

    #[test]
    fn test_three_word_header_line_dropped() {
        assert_eq!(filter().clean("Subject: quarterly invoice"), "");
    }

    #[test]
    fn test_header_match_ignores_case() {
        assert_eq!(filter().clean("CC: Bob Jones"), "");
        assert_eq!(filter().clean("Keep this\nTO: team"), "Keep this");
    }

    #[test]
    fn test_four_word_header_line_kept() {
        assert_eq!(
            filter().clean("Subject: quarterly invoice attached"),
            "Subject: quarterly invoice attached"
        );
    }

    #[test]
    fn test_long_line_with_header_word_kept() {
        assert_eq!(
            filter().clean("Sent the package yesterday"),
            "Sent the package yesterday"
        );
    }

    #[test]
    fn test_noise_phrases_drop_line() {
        let input = "Real question here\nPlease take our SURVEY\nClick Here to unsubscribe\nGet Outlook for iOS";
        assert_eq!(filter().clean(input), "Real question here");
    }

    #[test]
    fn test_masked_words_removed() {
        let input = "call [MASKED_PHONE] now\n[MASKED_EMAIL]\nleftover MASKED_partial, ok";
        assert_eq!(filter().clean(input), "call now leftover ok");
    }

    #[test]
    fn test_lines_joined_in_order() {
        let input = "  first line \r\n\r\nsecond   line\n\nthird";
        assert_eq!(filter().clean(input), "first line second line third");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(filter().clean(""), "");
        assert_eq!(filter().clean(" \n \n"), "");
    }

    #[test]
    fn test_empty_vocabularies() {
        let f = NoiseFilter::new(&[], &[], 3).unwrap();
        assert_eq!(f.clean("Sent: Monday\nsurvey"), "Sent: Monday survey");
    }
}
