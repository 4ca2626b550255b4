use scraper::{Html, Node};

use super::TextStage;

/// Elements whose text is never rendered. `<title>` text is kept.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Stage 1: strip markup and return the visible text.
///
/// Each text node is trimmed and dropped if empty; runs of inline whitespace
/// collapse to one space; surviving segments are joined by single spaces.
/// Line breaks inside a text node are kept so the noise filter can work line by
/// line. Malformed markup is parsed best-effort by html5ever and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTextExtractor;

impl HtmlTextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, input: &str) -> String {
        let document = Html::parse_document(input);
        let mut segments: Vec<String> = Vec::new();

        for node in document.root_element().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                continue;
            }
            if let Some(segment) = normalize_segment(text) {
                segments.push(segment);
            }
        }

        segments.join(" ")
    }
}

/// Collapse inline whitespace per line, dropping blank lines.
fn normalize_segment(raw: &str) -> Option<String> {
    let lines: Vec<String> = raw
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

impl TextStage for HtmlTextExtractor {
    fn apply(&self, input: &str) -> String {
        self.extract(input)
    }

    fn name(&self) -> &str {
        "html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup() {
        let html = "<html><body><p>Hello   <b>there</b></p><div>friend</div></body></html>";
        assert_eq!(HtmlTextExtractor::new().extract(html), "Hello there friend");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = "  no markup here  ";
        assert_eq!(HtmlTextExtractor::new().extract(text), "no markup here");
    }

    #[test]
    fn test_script_and_style_are_hidden() {
        let html = "<html><head><style>p{color:red}</style></head><body><script>var x = 1;</script><p>visible</p></body></html>";
        assert_eq!(HtmlTextExtractor::new().extract(html), "visible");
    }

    #[test]
    fn test_title_text_is_kept() {
        let html = "<html><head><title>Hello Bob</title></head><body>hi</body></html>";
        assert_eq!(HtmlTextExtractor::new().extract(html), "Hello Bob hi");
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let html = "<div><p>unclosed <b>bold <i>text</div></span>&amp; more";
        assert_eq!(
            HtmlTextExtractor::new().extract(html),
            "unclosed bold text & more"
        );
    }

    #[test]
    fn test_line_breaks_inside_text_survive() {
        let html = "<pre>Thanks\n\nSent: Monday</pre>";
        assert_eq!(HtmlTextExtractor::new().extract(html), "Thanks\nSent: Monday");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(HtmlTextExtractor::new().extract(""), "");
        assert_eq!(HtmlTextExtractor::new().extract("   \n\t"), "");
    }
}
