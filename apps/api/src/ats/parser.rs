//! Heuristic plain-text résumé parser.
//!
//! Single pass over the extracted text: heading lines open sections, contact
//! details are pattern-matched near the top, bullets and year ranges are
//! collected for scoring. No LLM involvement.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("valid email regex")
});
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{8,}\d").expect("valid phone regex"));
static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[a-z0-9_-]+/?")
        .expect("valid linkedin regex")
});
static GITHUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[a-z0-9_-]+/?").expect("valid github regex")
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[•●▪◦‣∙·*\-–]|\d{1,2}[.)])\s+(.+)$").expect("valid bullet regex")
});
static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|—|to|until)\s*(?:[a-z]{3,9}\.?\s+)?((?:19|20)\d{2}|present|current|now|today)\b",
    )
    .expect("valid year range regex")
});
static SKILL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•·]").expect("valid separator regex"));

/// Contact details are only searched for in this many leading lines.
const HEADER_LINES: usize = 15;
const MAX_HEADING_LEN: usize = 40;
const MAX_SKILL_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSection {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Awards,
    Languages,
    Volunteer,
    Publications,
}

const HEADINGS: &[(TextSection, &[&str])] = &[
    (
        TextSection::Summary,
        &[
            "summary",
            "professional summary",
            "profile",
            "professional profile",
            "about me",
            "objective",
            "career objective",
        ],
    ),
    (
        TextSection::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        TextSection::Education,
        &[
            "education",
            "academic background",
            "education and training",
            "education & training",
        ],
    ),
    (
        TextSection::Skills,
        &[
            "skills",
            "technical skills",
            "core competencies",
            "key skills",
            "technologies",
            "skills & tools",
            "skills and tools",
        ],
    ),
    (
        TextSection::Projects,
        &["projects", "personal projects", "selected projects", "key projects"],
    ),
    (
        TextSection::Certifications,
        &[
            "certifications",
            "certificates",
            "licenses & certifications",
            "licenses and certifications",
        ],
    ),
    (
        TextSection::Awards,
        &["awards", "honors", "honors & awards", "honors and awards", "achievements"],
    ),
    (TextSection::Languages, &["languages"]),
    (
        TextSection::Volunteer,
        &["volunteer", "volunteering", "volunteer experience", "community involvement"],
    ),
    (TextSection::Publications, &["publications", "papers"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    pub kind: TextSection,
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    /// `None` for ongoing ("Present").
    pub end: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResumeText {
    pub contact: ContactInfo,
    pub sections: Vec<ParsedSection>,
    pub skills: Vec<String>,
    pub bullets: Vec<String>,
    pub date_ranges: Vec<YearRange>,
    pub years_of_experience: u32,
    pub word_count: usize,
}

impl ParsedResumeText {
    pub fn has_section(&self, kind: TextSection) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    fn section_lines(&self, kind: TextSection) -> impl Iterator<Item = &String> + '_ {
        self.sections
            .iter()
            .filter(move |s| s.kind == kind)
            .flat_map(|s| s.lines.iter())
    }
}

pub fn parse_resume_text(text: &str) -> ParsedResumeText {
    parse_resume_text_at(text, Utc::now().year())
}

/// Parses with an explicit "current year" for ongoing date ranges.
pub fn parse_resume_text_at(text: &str, current_year: i32) -> ParsedResumeText {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let mut sections: Vec<ParsedSection> = Vec::new();
    for line in lines.iter().filter(|l| !l.is_empty()) {
        if let Some(kind) = detect_heading(line) {
            sections.push(ParsedSection {
                kind,
                heading: line.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line.to_string());
        }
    }

    let mut parsed = ParsedResumeText {
        contact: extract_contact(&lines),
        sections,
        skills: Vec::new(),
        bullets: Vec::new(),
        date_ranges: Vec::new(),
        years_of_experience: 0,
        word_count: text.split_whitespace().count(),
    };

    parsed.skills = extract_skills(parsed.section_lines(TextSection::Skills));
    parsed.bullets = extract_bullets(&parsed, &lines);

    parsed.date_ranges = if parsed.has_section(TextSection::Experience) {
        extract_year_ranges(parsed.section_lines(TextSection::Experience).map(String::as_str))
    } else {
        extract_year_ranges(lines.iter().copied())
    };
    parsed.years_of_experience = years_of_experience(&parsed.date_ranges, current_year);

    parsed
}

/// Matches a line against the heading synonym table. Punctuation such as
/// Markdown `#` or a trailing colon is ignored.
pub fn detect_heading(line: &str) -> Option<TextSection> {
    let trimmed = line.trim().trim_end_matches(':').trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADING_LEN {
        return None;
    }
    let normalized: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '&')
        .collect::<String>()
        .to_lowercase();
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    HEADINGS
        .iter()
        .find(|(_, names)| names.contains(&normalized.as_str()))
        .map(|(kind, _)| *kind)
}

fn extract_contact(lines: &[&str]) -> ContactInfo {
    let header = &lines[..lines.len().min(HEADER_LINES)];
    let header_text = header.join("\n");

    let phone = header.iter().find_map(|line| {
        PHONE
            .find_iter(line)
            .map(|m| m.as_str().trim().to_string())
            .find(|candidate| {
                let digits = candidate.chars().filter(char::is_ascii_digit).count();
                (10..=15).contains(&digits)
            })
    });

    ContactInfo {
        name: guess_name(header),
        email: EMAIL.find(&header_text).map(|m| m.as_str().to_string()),
        phone,
        linkedin: LINKEDIN.find(&header_text).map(|m| m.as_str().to_string()),
        github: GITHUB.find(&header_text).map(|m| m.as_str().to_string()),
    }
}

/// First short, letters-only line near the top that is not a heading.
fn guess_name(header: &[&str]) -> Option<String> {
    header
        .iter()
        .filter(|line| !line.is_empty())
        .take(5)
        .map(|line| line.trim_start_matches('#').trim())
        .find(|line| {
            let words = line.split_whitespace().count();
            (2..=4).contains(&words)
                && line.chars().next().is_some_and(char::is_alphabetic)
                && !line.contains('@')
                && !line.contains("://")
                && !line.chars().any(|c| c.is_ascii_digit())
                && line
                    .chars()
                    .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '-' | '\''))
                && detect_heading(line).is_none()
        })
        .map(String::from)
}

fn extract_skills<'a>(lines: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for line in lines {
        let line = strip_bullet(line);
        // "Languages: Rust, Go" → "Rust, Go"
        let line = match line.split_once(':') {
            Some((label, rest)) if label.chars().count() <= 30 => rest,
            _ => line,
        };
        for skill in SKILL_SEPARATOR.split(line) {
            let skill = skill.trim().trim_end_matches('.');
            if skill.is_empty() || skill.chars().count() > MAX_SKILL_LEN {
                continue;
            }
            if seen.insert(skill.to_lowercase()) {
                skills.push(skill.to_string());
            }
        }
    }
    skills
}

/// Explicit bullet lines anywhere; failing that, long lines from the
/// experience and project sections.
fn extract_bullets(parsed: &ParsedResumeText, lines: &[&str]) -> Vec<String> {
    let bullets: Vec<String> = lines
        .iter()
        .filter_map(|line| BULLET.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|text| !text.is_empty())
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }

    parsed
        .section_lines(TextSection::Experience)
        .chain(parsed.section_lines(TextSection::Projects))
        .filter(|line| line.split_whitespace().count() >= 6)
        .cloned()
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    BULLET
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(line)
}

fn extract_year_ranges<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<YearRange> {
    lines
        .flat_map(|line| YEAR_RANGE.captures_iter(line).collect::<Vec<_>>())
        .filter_map(|caps| {
            let start = caps.get(1)?.as_str().parse::<i32>().ok()?;
            let end = caps.get(2)?.as_str();
            let end = end.parse::<i32>().ok();
            Some(YearRange { start, end })
        })
        .collect()
}

/// Total years covered by the ranges, with overlaps counted once.
pub fn years_of_experience(ranges: &[YearRange], current_year: i32) -> u32 {
    let mut spans: Vec<(i32, i32)> = ranges
        .iter()
        .map(|r| (r.start, r.end.unwrap_or(current_year)))
        .filter(|(start, end)| end >= start && *start <= current_year)
        .map(|(start, end)| (start, end.min(current_year)))
        .collect();
    spans.sort_unstable();

    let mut total = 0;
    let mut current: Option<(i32, i32)> = None;
    for (start, end) in spans {
        current = match current {
            Some((s, e)) if start <= e => Some((s, e.max(end))),
            Some((s, e)) => {
                total += e - s;
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((s, e)) = current {
        total += e - s;
    }
    total.max(0) as u32
}
