//! Structured rich text: a list of plain-text paragraphs.
//!
//! Descriptions and summaries travel through the data model as paragraphs,
//! never as markup. HTML is produced only by `render::html`. Incoming HTML
//! strings (documents authored elsewhere) are accepted and flattened.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p\s*>|<br\s*/?>|</li\s*>|</div\s*>|\n").expect("valid block regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RichTextRepr")]
pub struct RichText(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RichTextRepr {
    Paragraphs(Vec<String>),
    Html(String),
    Missing,
}

impl From<RichTextRepr> for RichText {
    fn from(repr: RichTextRepr) -> Self {
        match repr {
            RichTextRepr::Paragraphs(paragraphs) => RichText(
                paragraphs
                    .into_iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
            ),
            RichTextRepr::Html(html) => RichText::from_html(&html),
            RichTextRepr::Missing => RichText::default(),
        }
    }
}

impl RichText {
    /// One paragraph per non-blank line.
    pub fn from_lines(text: &str) -> Self {
        RichText(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// A single paragraph, or nothing when the text is blank.
    pub fn paragraph(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            RichText::default()
        } else {
            RichText(vec![text.to_string()])
        }
    }

    /// Flattens an HTML fragment into paragraphs, dropping all markup.
    pub fn from_html(html: &str) -> Self {
        RichText(
            BLOCK_BREAK
                .split(html)
                .map(strip_markup)
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.0
    }

    /// True when no paragraph carries visible text once markup is removed.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|p| strip_markup(p).trim().is_empty())
    }
}

/// Removes tags and decodes the handful of entities form editors emit.
pub fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_skips_blank_lines() {
        let text = RichText::from_lines("Built the API\n\n  Led a team of 4  \n");
        assert_eq!(text.paragraphs(), ["Built the API", "Led a team of 4"]);
    }

    #[test]
    fn test_paragraph_blank_is_empty() {
        assert!(RichText::paragraph("   ").paragraphs().is_empty());
        assert_eq!(RichText::paragraph(" Dean's List ").paragraphs(), ["Dean's List"]);
    }

    #[test]
    fn test_from_html_splits_paragraphs() {
        let text = RichText::from_html("<p>First &amp; best</p><p><strong>Second</strong></p>");
        assert_eq!(text.paragraphs(), ["First & best", "Second"]);
    }

    #[test]
    fn test_markup_only_is_blank() {
        assert!(RichText::from_html("<p>&nbsp;</p><p></p>").is_blank());
        assert!(RichText::default().is_blank());
    }

    #[test]
    fn test_deserializes_from_array_string_or_null() {
        let from_array: RichText = serde_json::from_str(r#"["a", " ", "b"]"#).unwrap();
        assert_eq!(from_array.paragraphs(), ["a", "b"]);

        let from_html: RichText = serde_json::from_str(r#""<p>a</p><p>b</p>""#).unwrap();
        assert_eq!(from_html, from_array);

        let from_null: RichText = serde_json::from_str("null").unwrap();
        assert!(from_null.is_blank());
    }

    #[test]
    fn test_serializes_as_paragraph_list() {
        let text = RichText::from_lines("one\ntwo");
        assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!(["one", "two"]));
    }
}
