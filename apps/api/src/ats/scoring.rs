//! ATS scoring — weighted heuristic dimensions over a parsed résumé.
//!
//! overall = Σ(score × weight) / Σ(weight) × 100, over the dimensions that
//! apply. Keyword match only applies when a job description is supplied.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::parser::{ParsedResumeText, TextSection};

// ────────────────────────────────────────────────────────────────────────────
// Report models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsDimension {
    Contact,
    Sections,
    Impact,
    Keywords,
    Length,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsFinding {
    pub dimension: AtsDimension,
    pub score: f64, // 0.0 – 1.0
    pub weight: f64,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub overall_score: u32, // 0 – 100
    pub findings: Vec<AtsFinding>,
    pub suggestions: Vec<String>,
    pub keyword_match: Option<KeywordMatch>,
    pub parsed: ParsedResumeText,
    pub analyzer_backend: String, // "heuristic" | "heuristic+llm"
    pub llm_summary: Option<String>,
}

const WEIGHTS: &[(AtsDimension, f64)] = &[
    (AtsDimension::Contact, 0.15),
    (AtsDimension::Sections, 0.25),
    (AtsDimension::Impact, 0.25),
    (AtsDimension::Keywords, 0.25),
    (AtsDimension::Length, 0.10),
];

const CORE_SECTIONS: &[TextSection] = &[
    TextSection::Experience,
    TextSection::Education,
    TextSection::Skills,
];
const SUPPORTING_SECTIONS: &[TextSection] = &[TextSection::Summary, TextSection::Projects];

const MAX_JD_KEYWORDS: usize = 25;

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "both", "but", "by", "can", "do", "for", "from", "has", "have", "help", "how", "if",
    "in", "into", "is", "it", "its", "join", "like", "looking", "make", "more", "must", "new",
    "not", "of", "on", "or", "our", "out", "over", "own", "plus", "role", "should", "so", "such",
    "team", "than", "that", "the", "their", "them", "there", "these", "they", "this", "to",
    "us", "using", "we", "well", "what", "who", "will", "with", "within", "work", "working",
    "would", "year", "years", "you", "your", "ability", "experience", "strong", "skills",
    "including", "etc", "preferred", "required", "requirements", "responsibilities", "candidate",
    "ideal", "other", "which", "while", "each", "every",
];

const VAGUE_WORDS: &[&str] = &[
    "helped",
    "worked on",
    "assisted",
    "participated",
    "involved",
    "responsible for",
    "various",
    "several",
    "many",
];

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores a parsed résumé. `text` is the full extracted text, used for
/// keyword matching against the optional job description.
pub fn score_resume(
    parsed: &ParsedResumeText,
    text: &str,
    job_description: Option<&str>,
) -> AtsReport {
    let mut findings = Vec::new();
    let mut suggestions = Vec::new();

    let (score, detail) = score_contact(parsed, &mut suggestions);
    findings.push(finding(AtsDimension::Contact, score, detail));

    let (score, detail) = score_sections(parsed, &mut suggestions);
    findings.push(finding(AtsDimension::Sections, score, detail));

    let (score, detail) = score_impact(parsed, &mut suggestions);
    findings.push(finding(AtsDimension::Impact, score, detail));

    let keyword_match = job_description
        .map(extract_keywords)
        .filter(|keywords| !keywords.is_empty())
        .map(|keywords| match_keywords(&keywords, text));
    if let Some(km) = &keyword_match {
        let total = km.matched.len() + km.missing.len();
        let score = km.matched.len() as f64 / total as f64;
        if !km.missing.is_empty() {
            let top: Vec<&str> = km.missing.iter().take(5).map(String::as_str).collect();
            suggestions.push(format!(
                "Mirror the job description's wording where it applies: {}.",
                top.join(", ")
            ));
        }
        findings.push(finding(
            AtsDimension::Keywords,
            score,
            format!("{} of {} job keywords found", km.matched.len(), total),
        ));
    }

    let (score, detail) = score_length(parsed.word_count, &mut suggestions);
    findings.push(finding(AtsDimension::Length, score, detail));

    let total_weight: f64 = findings.iter().map(|f| f.weight).sum();
    let weighted: f64 = findings.iter().map(|f| f.score * f.weight).sum();
    let overall_score = if total_weight > 0.0 {
        ((weighted / total_weight) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    AtsReport {
        overall_score,
        findings,
        suggestions,
        keyword_match,
        parsed: parsed.clone(),
        analyzer_backend: "heuristic".to_string(),
        llm_summary: None,
    }
}

fn finding(dimension: AtsDimension, score: f64, detail: String) -> AtsFinding {
    let weight = WEIGHTS
        .iter()
        .find(|(d, _)| *d == dimension)
        .map(|(_, w)| *w)
        .unwrap_or(0.0);
    AtsFinding {
        dimension,
        score,
        weight,
        detail,
    }
}

fn score_contact(parsed: &ParsedResumeText, suggestions: &mut Vec<String>) -> (f64, String) {
    let contact = &parsed.contact;
    let mut present = 0;
    let mut missing = Vec::new();

    for (label, value) in [
        ("name", &contact.name),
        ("email", &contact.email),
        ("phone", &contact.phone),
    ] {
        if value.is_some() {
            present += 1;
        } else {
            missing.push(label);
        }
    }
    let has_profile = contact.linkedin.is_some() || contact.github.is_some();

    let score = (present as f64 + if has_profile { 1.0 } else { 0.0 }) / 4.0;
    if !missing.is_empty() {
        suggestions.push(format!(
            "Put your {} in plain text at the top of the page.",
            missing.join(", ")
        ));
    }
    if !has_profile {
        suggestions.push("Add a LinkedIn or GitHub profile URL.".to_string());
    }

    let detail = if missing.is_empty() {
        "All core contact details found".to_string()
    } else {
        format!("Missing: {}", missing.join(", "))
    };
    (score, detail)
}

/// Core sections carry 80%, supporting sections the rest.
fn score_sections(parsed: &ParsedResumeText, suggestions: &mut Vec<String>) -> (f64, String) {
    let core_found = CORE_SECTIONS.iter().filter(|s| parsed.has_section(**s)).count();
    let supporting_found = SUPPORTING_SECTIONS
        .iter()
        .filter(|s| parsed.has_section(**s))
        .count();

    let score = 0.8 * core_found as f64 / CORE_SECTIONS.len() as f64
        + 0.2 * supporting_found as f64 / SUPPORTING_SECTIONS.len() as f64;

    let missing: Vec<String> = CORE_SECTIONS
        .iter()
        .filter(|s| !parsed.has_section(**s))
        .map(|s| format!("{s:?}").to_lowercase())
        .collect();
    if !missing.is_empty() {
        suggestions.push(format!(
            "Use standard headings so parsers find your {} section(s).",
            missing.join(", ")
        ));
    }

    (
        score,
        format!(
            "{} of {} standard sections detected",
            core_found + supporting_found,
            CORE_SECTIONS.len() + SUPPORTING_SECTIONS.len()
        ),
    )
}

fn score_impact(parsed: &ParsedResumeText, suggestions: &mut Vec<String>) -> (f64, String) {
    if parsed.bullets.is_empty() {
        suggestions.push(
            "Describe each role with bullet points that state concrete outcomes.".to_string(),
        );
        return (0.0, "No bullet points detected".to_string());
    }

    let quantified = parsed.bullets.iter().filter(|b| is_quantified(b)).count();
    let ratio = quantified as f64 / parsed.bullets.len() as f64;

    if ratio < 0.5 {
        suggestions.push(
            "Add a number, percentage, or time metric to more bullets.".to_string(),
        );
    }
    if let Some(vague) = parsed
        .bullets
        .iter()
        .filter(|b| !is_quantified(b))
        .find_map(|b| {
            let lower = b.to_lowercase();
            VAGUE_WORDS.iter().find(|w| lower.contains(*w))
        })
    {
        suggestions.push(format!(
            "Replace vague phrasing such as '{vague}' with a measurable result."
        ));
    }

    (
        ratio,
        format!("{} of {} bullets quantified", quantified, parsed.bullets.len()),
    )
}

fn score_length(word_count: usize, suggestions: &mut Vec<String>) -> (f64, String) {
    let score = match word_count {
        400..=800 => 1.0,
        250..=399 | 801..=1200 => 0.7,
        _ => 0.4,
    };
    if word_count < 250 {
        suggestions.push("The résumé is short; expand on scope and results.".to_string());
    } else if word_count > 1200 {
        suggestions.push("The résumé is long; trim older or less relevant detail.".to_string());
    }
    (score, format!("{word_count} words"))
}

/// A bullet counts as quantified when it carries a number, percentage,
/// currency amount, or an `~N` estimate.
pub fn is_quantified(bullet: &str) -> bool {
    bullet.chars().any(|c| c.is_ascii_digit())
        || bullet.contains('%')
        || bullet.contains('$')
        || bullet.contains('€')
        || bullet.contains('£')
}

// ────────────────────────────────────────────────────────────────────────────
// Job description keywords
// ────────────────────────────────────────────────────────────────────────────

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')))
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | '-')).to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Most frequent non-stopword terms of the job description, ties broken by
/// first occurrence.
pub fn extract_keywords(job_description: &str) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in tokenize(job_description).enumerate() {
        if token.chars().count() < 3
            || token.chars().all(|c| c.is_ascii_digit())
            || STOPWORDS.contains(&token.as_str())
        {
            continue;
        }
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, pos_a)), (_, (count_b, pos_b))| {
        count_b.cmp(count_a).then(pos_a.cmp(pos_b))
    });
    ranked
        .into_iter()
        .take(MAX_JD_KEYWORDS)
        .map(|(token, _)| token)
        .collect()
}

pub fn match_keywords(keywords: &[String], resume_text: &str) -> KeywordMatch {
    let vocabulary: HashSet<String> = tokenize(resume_text).collect();
    let (matched, missing): (Vec<String>, Vec<String>) = keywords
        .iter()
        .cloned()
        .partition(|keyword| vocabulary.contains(keyword));
    KeywordMatch { matched, missing }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
