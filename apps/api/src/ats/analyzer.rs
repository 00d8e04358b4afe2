//! ATS analysis — pluggable, trait-based analyzer over extracted résumé text.
//!
//! Default: `HeuristicAtsAnalyzer` (pure-Rust, deterministic).
//! With an API key: `LlmAtsAnalyzer`, which layers LLM suggestions over the
//! heuristic report and falls back to it when the LLM call fails.
//!
//! `AppState` holds an `Arc<dyn AtsAnalyzer>`, chosen at startup via config.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::parser::parse_resume_text;
use super::prompts::{ATS_REVIEW_PROMPT, ATS_REVIEW_SYSTEM};
use super::scoring::{score_resume, AtsReport};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Résumé text beyond this many characters is not sent to the LLM.
const MAX_PROMPT_CHARS: usize = 12_000;
const MAX_LLM_SUGGESTIONS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AtsAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        text: &str,
        job_description: Option<&str>,
    ) -> Result<AtsReport, AppError>;

    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicAtsAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct HeuristicAtsAnalyzer;

#[async_trait]
impl AtsAnalyzer for HeuristicAtsAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        job_description: Option<&str>,
    ) -> Result<AtsReport, AppError> {
        Ok(heuristic_report(text, job_description))
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

fn heuristic_report(text: &str, job_description: Option<&str>) -> AtsReport {
    let parsed = parse_resume_text(text);
    score_resume(&parsed, text, job_description)
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAtsAnalyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LlmReview {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

pub struct LlmAtsAnalyzer(pub LlmClient);

#[async_trait]
impl AtsAnalyzer for LlmAtsAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        job_description: Option<&str>,
    ) -> Result<AtsReport, AppError> {
        let report = heuristic_report(text, job_description);
        let prompt = build_review_prompt(&report, text, job_description);

        match self.0.call_json::<LlmReview>(&prompt, ATS_REVIEW_SYSTEM).await {
            Ok(review) => {
                debug!(
                    "LLM review added {} suggestions",
                    review.suggestions.len()
                );
                Ok(merge_review(report, review))
            }
            Err(e) => {
                warn!("LLM review failed, returning heuristic report: {}", e);
                Ok(report)
            }
        }
    }

    fn backend(&self) -> &'static str {
        "heuristic+llm"
    }
}

fn build_review_prompt(report: &AtsReport, text: &str, job_description: Option<&str>) -> String {
    let resume_text: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    let suggestions = report
        .suggestions
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    ATS_REVIEW_PROMPT
        .replace("{score}", &report.overall_score.to_string())
        .replace("{suggestions}", &suggestions)
        .replace("{job_description}", job_description.unwrap_or_default())
        .replace("{resume_text}", &resume_text)
}

/// Appends new LLM suggestions (case-insensitive dedup) and the summary.
fn merge_review(mut report: AtsReport, review: LlmReview) -> AtsReport {
    let mut added = 0;
    for suggestion in review.suggestions {
        let suggestion = suggestion.trim();
        if suggestion.is_empty() || added == MAX_LLM_SUGGESTIONS {
            continue;
        }
        let duplicate = report
            .suggestions
            .iter()
            .any(|s| s.eq_ignore_ascii_case(suggestion));
        if !duplicate {
            report.suggestions.push(suggestion.to_string());
            added += 1;
        }
    }
    report.llm_summary = review.summary.filter(|s| !s.trim().is_empty());
    report.analyzer_backend = "heuristic+llm".to_string();
    report
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Jane Doe\njane@example.com\n\nExperience\n- Shipped search in 3 months";

    #[tokio::test]
    async fn test_heuristic_analyzer_reports_heuristic_backend() {
        let report = HeuristicAtsAnalyzer.analyze(TEXT, None).await.unwrap();
        assert_eq!(report.analyzer_backend, "heuristic");
        assert_eq!(report.parsed.contact.email.as_deref(), Some("jane@example.com"));
        assert!(report.llm_summary.is_none());
        assert_eq!(HeuristicAtsAnalyzer.backend(), "heuristic");
    }

    #[test]
    fn test_merge_review_dedups_and_caps() {
        let report = heuristic_report(TEXT, None);
        let existing = report.suggestions[0].clone();
        let before = report.suggestions.len();

        let review = LlmReview {
            summary: Some("Readable, but thin.".to_string()),
            suggestions: vec![
                existing.to_uppercase(),
                " ".to_string(),
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
                "e".to_string(),
                "f".to_string(),
            ],
        };
        let merged = merge_review(report, review);
        assert_eq!(merged.suggestions.len(), before + MAX_LLM_SUGGESTIONS);
        assert!(!merged.suggestions.contains(&"f".to_string()));
        assert_eq!(merged.llm_summary.as_deref(), Some("Readable, but thin."));
        assert_eq!(merged.analyzer_backend, "heuristic+llm");
    }

    #[test]
    fn test_review_prompt_includes_context() {
        let report = heuristic_report(TEXT, Some("Rust engineer"));
        let prompt = build_review_prompt(&report, TEXT, Some("Rust engineer"));
        assert!(prompt.contains("Shipped search in 3 months"));
        assert!(prompt.contains("Rust engineer"));
        assert!(prompt.contains(&format!("{}/100", report.overall_score)));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_review_prompt_truncates_long_text() {
        let long = "word ".repeat(10_000);
        let report = heuristic_report(&long, None);
        let prompt = build_review_prompt(&report, &long, None);
        assert!(prompt.len() < long.len());
    }
}
