use regex::Regex;

use crate::error::{MaskError, Result};

use super::placeholder::placeholder;
use super::TextStage;

/// One redaction rule: every match becomes `[MASKED_<label>]`.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub label: String,
    pub pattern: Regex,
}

impl PatternRule {
    pub fn new(label: &str, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| MaskError::InvalidConfig {
            reason: format!("invalid {label} pattern: {e}"),
        })?;
        Ok(Self {
            label: label.to_string(),
            pattern,
        })
    }
}

/// Stage 2: ordered regex rules replacing matches with typed placeholders.
///
/// Rules run in sequence over the output of the previous rule, so order
/// matters: EMAIL runs before DOMAIN so an address is masked as a whole.
pub struct PatternRedactor {
    rules: Vec<PatternRule>,
}

impl PatternRedactor {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The built-in rule set with the given organization names for the ORG rule.
    pub fn with_org_names(org_names: &[String]) -> Result<Self> {
        Ok(Self::new(Self::default_rules(org_names)?))
    }

    pub fn default_rules(org_names: &[String]) -> Result<Vec<PatternRule>> {
        let mut rules = vec![
            PatternRule::new("EMAIL", r"[\w.-]+@[\w.-]+")?,
            PatternRule::new("PHONE", r"\+?\d[\d\s-]{7,}")?,
            PatternRule::new("URL", r"https?://\S+")?,
            PatternRule::new("DOMAIN", r"(?i)\b(?:www\.)?[\w.-]*\.com\b")?,
        ];

        let names: Vec<String> = org_names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(regex::escape)
            .collect();
        if !names.is_empty() {
            let pattern = format!(r"(?i)\b(?:{})\b", names.join("|"));
            rules.push(PatternRule::new("ORG", &pattern)?);
        }

        rules.push(PatternRule::new("TICKET", r"#\d+")?);
        rules.push(PatternRule::new(
            "PARTNER_ID",
            r"(?i)(?:Partner\s*ID|partnerId)\s*:[-\s]*\d+",
        )?);
        Ok(rules)
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn redact(&self, input: &str) -> String {
        let mut result = input.to_string();
        for rule in &self.rules {
            if !rule.pattern.is_match(&result) {
                continue;
            }
            let token = placeholder(&rule.label);
            result = rule
                .pattern
                .replace_all(&result, regex::NoExpand(&token))
                .into_owned();
        }
        result
    }
}

impl TextStage for PatternRedactor {
    fn apply(&self, input: &str) -> String {
        self.redact(input)
    }

    fn name(&self) -> &str {
        "patterns"
    }
}
