//! Text extraction from uploaded résumé files.
//!
//! PDF goes through `pdf-extract`; plain text and Markdown are read as UTF-8
//! (lossy). PDF parsing is CPU-bound and must run on the blocking pool.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("document contains no extractable text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Detects the kind from magic bytes, then content type, then extension.
    pub fn detect(
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<Self, ExtractError> {
        if bytes.starts_with(b"%PDF-") {
            return Ok(DocumentKind::Pdf);
        }

        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        if content_type.starts_with("application/pdf") {
            return Ok(DocumentKind::Pdf);
        }
        if content_type.starts_with("text/") {
            return Ok(DocumentKind::PlainText);
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "md" | "markdown" | "text" => Ok(DocumentKind::PlainText),
            _ => Err(ExtractError::UnsupportedType(
                file_name
                    .map(String::from)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(content_type),
            )),
        }
    }
}

/// Extracts and normalizes text. Synchronous; see `extract_text_blocking`.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    let raw = match kind {
        // pdf-extract panics on some malformed files instead of erroring.
        DocumentKind::Pdf => std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractError::Pdf("malformed PDF structure".to_string()))?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = normalize_text(&raw);
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    debug!("Extracted {} chars from {:?} upload", text.len(), kind);
    Ok(text)
}

/// Runs `extract_text` on tokio's blocking pool.
pub async fn extract_text_blocking(
    kind: DocumentKind,
    bytes: Vec<u8>,
) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(kind, &bytes))
        .await
        .map_err(|e| ExtractError::Pdf(format!("extraction task failed: {e}")))?
}

/// Unifies line endings, drops control characters and trailing whitespace,
/// and collapses runs of blank lines to one.
fn normalize_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.replace("\r\n", "\n").replace('\r', "\n").lines() {
        let cleaned: String = line
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect::<String>()
            .trim_end()
            .to_string();
        if cleaned.trim().is_empty() && lines.last().is_some_and(|l| l.is_empty()) {
            continue;
        }
        lines.push(if cleaned.trim().is_empty() {
            String::new()
        } else {
            cleaned
        });
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf_by_magic_bytes() {
        let kind = DocumentKind::detect(Some("resume.bin"), None, b"%PDF-1.7 ...").unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_detect_by_content_type_and_extension() {
        assert_eq!(
            DocumentKind::detect(None, Some("text/plain; charset=utf-8"), b"hi").unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            DocumentKind::detect(Some("CV.MD"), None, b"# Jane").unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_detect_rejects_unknown_types() {
        let err = DocumentKind::detect(Some("resume.docx"), None, b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedType(ref n) if n == "resume.docx"));
    }

    #[test]
    fn test_plain_text_is_normalized() {
        let text = extract_text(
            DocumentKind::PlainText,
            b"Jane Doe  \r\n\r\n\r\n\r\nEXPERIENCE\x07\r\nAcme",
        )
        .unwrap();
        assert_eq!(text, "Jane Doe\n\nEXPERIENCE\nAcme");
    }

    #[test]
    fn test_blank_text_is_empty_error() {
        assert!(matches!(
            extract_text(DocumentKind::PlainText, b" \n\t\n"),
            Err(ExtractError::Empty)
        ));
    }

    #[test]
    fn test_invalid_pdf_is_reported() {
        assert!(matches!(
            extract_text(DocumentKind::Pdf, b"%PDF-garbage"),
            Err(ExtractError::Pdf(_))
        ));
    }

    #[tokio::test]
    async fn test_blocking_extraction_matches_sync() {
        let text = extract_text_blocking(DocumentKind::PlainText, b"Skills\nRust".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "Skills\nRust");
    }
}
