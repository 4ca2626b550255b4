use std::sync::OnceLock;

use regex::Regex;

/// Matches a well-formed `[MASKED_<LABEL>]` token.
pub const PLACEHOLDER_PATTERN: &str = r"\[MASKED_[A-Z_]+\]";

/// Build the placeholder token for a label, e.g. `[MASKED_EMAIL]`.
pub fn placeholder(label: &str) -> String {
    format!("[MASKED_{label}]")
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"))
}

/// Remove every well-formed placeholder token from `text`.
pub fn strip_placeholders(text: &str) -> String {
    placeholder_regex().replace_all(text, "").into_owned()
}

/// True if `text` still carries a well-formed placeholder token.
pub fn contains_placeholder(text: &str) -> bool {
    placeholder_regex().is_match(text)
}
