//! Mapper — converts the form editor's loose document into a `ResumeDocument`.
//!
//! Pure and stateless: no I/O, no logging, no shared state between calls.
//! Every generated item gets a fresh UUID, so mapping the same source twice
//! yields identical content under different ids.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::rich_text::RichText;
use crate::models::schema::{
    Award, Basics, Certification, Education, Experience, Language, Layout, Metadata, Profile,
    Project, Publication, ResumeDocument, Section, SectionKey, Sections, Skill, SummarySection,
    Typography, Theme, Url, Volunteer, PLACEHOLDER_NAME,
};
use crate::models::source::{
    PersonalInfo, SocialLinks, SourceAward, SourceCertification, SourceEducation,
    SourceExperience, SourceLanguage, SourceProject, SourcePublication, SourceResumeDocument,
    SourceVolunteer,
};

/// Name of the single item that wraps the flat skill list.
pub const SKILLS_ITEM_NAME: &str = "Technical Skills";

/// Username used when a profile URL has no usable path segment.
const FALLBACK_USERNAME: &str = "profile";

#[derive(Debug, Error)]
pub enum MapError {
    #[error("source document is missing")]
    MissingSource,

    #[error("source document is malformed: {0}")]
    Malformed(String),
}

/// Maps an untyped JSON source. Only a `null` or non-object top level fails.
pub fn map_value(value: &Value, template_id: &str) -> Result<ResumeDocument, MapError> {
    match value {
        Value::Null => Err(MapError::MissingSource),
        Value::Object(_) => {
            let source: SourceResumeDocument = serde_json::from_value(value.clone())
                .map_err(|e| MapError::Malformed(e.to_string()))?;
            Ok(map_resume(&source, template_id))
        }
        other => Err(MapError::Malformed(format!(
            "expected an object, found {}",
            json_kind(other)
        ))),
    }
}

/// Maps a typed source document. Never fails: absent fields degrade to
/// placeholders and empty sections.
pub fn map_resume(source: &SourceResumeDocument, template_id: &str) -> ResumeDocument {
    let summary = source.summary.as_deref().map(str::trim).unwrap_or_default();

    let sections = Sections {
        summary: SummarySection::new(RichText::from_lines(summary)),
        experience: Section::new(
            SectionKey::Experience,
            source.experience.iter().map(map_experience).collect(),
        ),
        education: Section::new(
            SectionKey::Education,
            source.education.iter().map(map_education).collect(),
        ),
        skills: Section::new(SectionKey::Skills, map_skills(&source.skills)),
        projects: Section::new(
            SectionKey::Projects,
            source.projects.iter().map(map_project).collect(),
        ),
        awards: Section::new(
            SectionKey::Awards,
            source.awards.iter().map(map_award).collect(),
        ),
        certifications: Section::new(
            SectionKey::Certifications,
            source.certifications.iter().map(map_certification).collect(),
        ),
        languages: Section::new(
            SectionKey::Languages,
            source.languages.iter().map(map_language).collect(),
        ),
        volunteer: Section::new(
            SectionKey::Volunteer,
            source.volunteer.iter().map(map_volunteer).collect(),
        ),
        publications: Section::new(
            SectionKey::Publications,
            source.publications.iter().map(map_publication).collect(),
        ),
        profiles: Section::new(
            SectionKey::Profiles,
            source
                .social_links
                .as_ref()
                .map(map_profiles)
                .unwrap_or_default(),
        ),
        interests: Section::empty(SectionKey::Interests),
        references: Section::empty(SectionKey::References),
        custom: Section::empty(SectionKey::Custom),
    };

    ResumeDocument {
        basics: map_basics(source.personal_info.as_ref(), summary, source.social_links.as_ref()),
        sections,
        metadata: Metadata {
            template: template_id.to_string(),
            layout: Layout::default(),
            theme: Theme::default(),
            typography: Typography::default(),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Basics
// ────────────────────────────────────────────────────────────────────────────

fn map_basics(
    info: Option<&PersonalInfo>,
    summary: &str,
    links: Option<&SocialLinks>,
) -> Basics {
    let contact = info.cloned().unwrap_or_default();

    Basics {
        name: derive_name(info),
        headline: derive_headline(summary),
        email: text(&contact.email),
        phone: text(&contact.phone),
        location: text(&contact.location),
        url: links.map(primary_url).unwrap_or_default(),
        ..Basics::default()
    }
}

/// `first last`, trimmed; the placeholder when both are blank.
pub fn derive_name(info: Option<&PersonalInfo>) -> String {
    let name = info
        .map(|i| format!("{} {}", text(&i.first_name), text(&i.last_name)))
        .unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Summary text up to and including the first period. A summary without a
/// period is used whole.
pub fn derive_headline(summary: &str) -> String {
    let summary = summary.trim();
    match summary.find('.') {
        Some(idx) => summary[..=idx].to_string(),
        None => summary.to_string(),
    }
}

fn primary_url(links: &SocialLinks) -> Url {
    [&links.portfolio, &links.website, &links.linkedin, &links.github]
        .into_iter()
        .map(text)
        .find(|href| !href.is_empty())
        .map(Url::new)
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

fn map_profiles(links: &SocialLinks) -> Vec<Profile> {
    let portfolio = non_blank(&links.portfolio).or_else(|| non_blank(&links.website));
    [
        ("LinkedIn", "linkedin", non_blank(&links.linkedin)),
        ("GitHub", "github", non_blank(&links.github)),
        ("Portfolio", "globe", portfolio),
    ]
    .into_iter()
    .filter_map(|(network, icon, href)| {
        href.map(|href| Profile {
            id: Uuid::new_v4(),
            visible: true,
            network: network.to_string(),
            username: username_from_url(&href),
            icon: icon.to_string(),
            url: Url::labelled(href, network),
        })
    })
    .collect()
}

/// Last non-empty path segment of a URL, ignoring query and fragment.
pub fn username_from_url(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let mut segments = path.split('/').filter(|s| !s.trim().is_empty());
    // The first segment is the host; a bare host has no username.
    segments.next();
    segments
        .last()
        .map(|s| s.trim().trim_start_matches('@').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_USERNAME.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Dated sections
// ────────────────────────────────────────────────────────────────────────────

/// `"{start} to {end}"`, or `"{start} to Present"` when the end is absent,
/// blank or "present". Empty when there is no start date.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.map(str::trim).unwrap_or_default();
    if start.is_empty() {
        return String::new();
    }
    match end.map(str::trim) {
        Some(end) if !end.is_empty() && !end.eq_ignore_ascii_case("present") => {
            format!("{start} to {end}")
        }
        _ => format!("{start} to Present"),
    }
}

fn map_experience(entry: &SourceExperience) -> Experience {
    Experience {
        id: Uuid::new_v4(),
        visible: true,
        company: entry.company.clone().unwrap_or_default(),
        position: text(&entry.title),
        location: text(&entry.location),
        date: format_date_range(entry.start_date.as_deref(), entry.end_date.as_deref()),
        summary: RichText::from_lines(entry.description.as_deref().unwrap_or_default()),
        url: Url::default(),
    }
}

fn map_education(entry: &SourceEducation) -> Education {
    Education {
        id: Uuid::new_v4(),
        visible: true,
        institution: text(&entry.school),
        study_type: text(&entry.degree),
        area: text(&entry.field_of_study),
        score: text(&entry.gpa),
        date: text(&entry.graduation_year),
        summary: RichText::paragraph(entry.honors.as_deref().unwrap_or_default()),
        url: Url::default(),
    }
}

fn map_volunteer(entry: &SourceVolunteer) -> Volunteer {
    Volunteer {
        id: Uuid::new_v4(),
        visible: true,
        organization: text(&entry.organization),
        position: text(&entry.role),
        location: text(&entry.location),
        date: format_date_range(entry.start_date.as_deref(), entry.end_date.as_deref()),
        summary: RichText::from_lines(entry.description.as_deref().unwrap_or_default()),
        url: Url::default(),
    }
}

fn map_project(entry: &SourceProject) -> Project {
    Project {
        id: Uuid::new_v4(),
        visible: true,
        name: text(&entry.name),
        description: String::new(),
        date: format_date_range(entry.start_date.as_deref(), entry.end_date.as_deref()),
        summary: RichText::from_lines(entry.description.as_deref().unwrap_or_default()),
        keywords: entry.technologies.clone(),
        url: url_or_empty(&entry.url),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Undated / flat sections
// ────────────────────────────────────────────────────────────────────────────

/// One synthetic item holding every skill. An empty list produces no item,
/// which leaves the section invisible.
fn map_skills(skills: &[String]) -> Vec<Skill> {
    if skills.is_empty() {
        return Vec::new();
    }
    vec![Skill {
        id: Uuid::new_v4(),
        visible: true,
        name: SKILLS_ITEM_NAME.to_string(),
        description: String::new(),
        level: 0,
        keywords: skills.to_vec(),
    }]
}

fn map_award(entry: &SourceAward) -> Award {
    Award {
        id: Uuid::new_v4(),
        visible: true,
        title: text(&entry.title),
        awarder: text(&entry.issuer),
        date: text(&entry.date),
        summary: RichText::from_lines(entry.description.as_deref().unwrap_or_default()),
        url: Url::default(),
    }
}

fn map_certification(entry: &SourceCertification) -> Certification {
    Certification {
        id: Uuid::new_v4(),
        visible: true,
        name: text(&entry.name),
        issuer: text(&entry.issuer),
        date: text(&entry.date),
        summary: RichText::default(),
        url: url_or_empty(&entry.url),
    }
}

fn map_language(entry: &SourceLanguage) -> Language {
    let description = text(&entry.proficiency);
    Language {
        id: Uuid::new_v4(),
        visible: true,
        name: text(&entry.language),
        level: proficiency_level(&description),
        description,
    }
}

fn map_publication(entry: &SourcePublication) -> Publication {
    Publication {
        id: Uuid::new_v4(),
        visible: true,
        name: text(&entry.title),
        publisher: text(&entry.publisher),
        date: text(&entry.date),
        summary: RichText::from_lines(entry.description.as_deref().unwrap_or_default()),
        url: url_or_empty(&entry.url),
    }
}

/// 0–5 rating inferred from a free-text proficiency; 0 when unrecognised.
pub fn proficiency_level(proficiency: &str) -> u8 {
    let p = proficiency.to_lowercase();
    if p.contains("native") || p.contains("bilingual") || p.contains("mother") {
        5
    } else if p.contains("fluent") || p.contains("c2") || p.contains("c1") {
        4
    } else if p.contains("advanced") || p.contains("professional") || p.contains("b2") {
        3
    } else if p.contains("intermediate") || p.contains("conversational") || p.contains("b1") {
        2
    } else if ["basic", "beginner", "elementary", "a1", "a2"]
        .iter()
        .any(|marker| p.contains(marker))
    {
        1
    } else {
        0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    Some(text(value)).filter(|s| !s.is_empty())
}

fn url_or_empty(value: &Option<String>) -> Url {
    non_blank(value).map(Url::new).unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::resume::visibility::SectionContent;
    use serde_json::json;

    fn full_source() -> Value {
        json!({
            "personalInfo": {
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "phone": "+1 555 0100",
                "location": "Berlin"
            },
            "summary": "Built scalable systems. Led a team.",
            "experience": [
                {
                    "title": "Staff Engineer",
                    "company": "Acme",
                    "startDate": "2020",
                    "endDate": "present",
                    "description": "Cut p99 latency by 40%\nMentored 5 engineers"
                },
                { "title": "Engineer", "company": "Initech", "startDate": "2017", "endDate": "2020" }
            ],
            "education": [{
                "degree": "BSc",
                "fieldOfStudy": "Computer Science",
                "school": "TU Berlin",
                "gpa": 3.9,
                "graduationYear": 2017,
                "honors": "Summa cum laude"
            }],
            "skills": ["Rust", "Postgres", "Kubernetes"],
            "projects": [{ "name": "rtrace", "description": "Tracing tool", "technologies": ["Rust"], "url": "https://rtrace.dev" }],
            "awards": [{ "title": "Hackathon winner", "issuer": "ACM", "date": "2019" }],
            "certifications": [{ "name": "CKA", "issuer": "CNCF", "date": "2021" }],
            "languages": [{ "language": "German", "proficiency": "Native" }],
            "volunteer": [{ "organization": "Code Club", "role": "Mentor", "startDate": "2018" }],
            "publications": [{ "title": "Fast Tracing", "publisher": "USENIX", "date": "2022" }],
            "socialLinks": {
                "linkedin": "https://linkedin.com/in/janedoe/",
                "github": "https://github.com/janedoe",
                "portfolio": "https://jane.dev"
            }
        })
    }

    fn all_ids(doc: &ResumeDocument) -> Vec<Uuid> {
        let value = serde_json::to_value(doc).unwrap();
        SectionKey::ALL
            .into_iter()
            .filter_map(|key| value["sections"][key.as_str()]["items"].as_array().cloned())
            .flatten()
            .map(|item| Uuid::parse_str(item["id"].as_str().unwrap()).unwrap())
            .collect()
    }

    fn strip_ids(value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.remove("id");
                map.values_mut().for_each(strip_ids);
            }
            Value::Array(items) => items.iter_mut().for_each(strip_ids),
            _ => {}
        }
    }

    #[test]
    fn test_empty_source_covers_every_section() {
        let doc = map_resume(&SourceResumeDocument::default(), "x");
        assert_eq!(doc.basics.name, PLACEHOLDER_NAME);
        assert_eq!(doc.metadata.template, "x");
        for key in SectionKey::ALL {
            let section = doc.sections.content(key);
            assert!(!section.stored_visible(), "{key} should be hidden");
            assert!(!section.display_name().is_empty());
        }
        assert_eq!(doc.basics.picture, Default::default());
    }

    #[test]
    fn test_empty_json_object_maps_without_error() {
        let doc = map_value(&json!({}), "x").unwrap();
        assert_eq!(doc.basics.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_null_source_is_missing() {
        assert!(matches!(map_value(&Value::Null, "x"), Err(MapError::MissingSource)));
    }

    #[test]
    fn test_non_object_source_is_malformed() {
        let err = map_value(&json!([1, 2]), "x").unwrap_err();
        assert!(matches!(err, MapError::Malformed(ref m) if m.contains("an array")));
    }

    #[test]
    fn test_visibility_matches_item_count() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        for key in SectionKey::ALL.into_iter().filter(|k| *k != SectionKey::Summary) {
            let section = doc.sections.content(key);
            assert_eq!(section.stored_visible(), section.is_non_empty(), "{key}");
        }
        assert!(doc.sections.summary.visible);
        assert!(!doc.sections.interests.visible);
        assert!(!doc.sections.references.visible);
        assert!(!doc.sections.custom.visible);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        let ids = all_ids(&doc);
        assert_eq!(ids.len(), 13);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.iter().all(|id| !id.is_nil()));
    }

    #[test]
    fn test_date_range_formatting() {
        assert_eq!(format_date_range(Some("2020"), Some("Present")), "2020 to Present");
        assert_eq!(format_date_range(Some("2020"), Some("PRESENT")), "2020 to Present");
        assert_eq!(format_date_range(Some("2020"), Some("2022")), "2020 to 2022");
        assert_eq!(format_date_range(Some("2020"), None), "2020 to Present");
        assert_eq!(format_date_range(Some("2020"), Some("  ")), "2020 to Present");
        assert_eq!(format_date_range(Some(""), Some("2022")), "");
        assert_eq!(format_date_range(None, Some("2022")), "");
    }

    #[test]
    fn test_headline_is_first_sentence() {
        assert_eq!(
            derive_headline("Built scalable systems. Led a team."),
            "Built scalable systems."
        );
        assert_eq!(derive_headline("No period here"), "No period here");
        assert_eq!(derive_headline(""), "");
    }

    #[test]
    fn test_remapping_is_identical_except_ids() {
        let source: SourceResumeDocument = serde_json::from_value(full_source()).unwrap();
        let first = map_resume(&source, "azurill");
        let second = map_resume(&source, "azurill");
        assert_ne!(all_ids(&first), all_ids(&second));

        let mut a = serde_json::to_value(&first).unwrap();
        let mut b = serde_json::to_value(&second).unwrap();
        strip_ids(&mut a);
        strip_ids(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_github_link_yields_one_profile() {
        let doc = map_value(
            &json!({ "socialLinks": { "github": "https://github.com/janedoe" } }),
            "x",
        )
        .unwrap();
        let profiles = &doc.sections.profiles;
        assert_eq!(profiles.items.len(), 1);
        assert_eq!(profiles.items[0].network, "GitHub");
        assert_eq!(profiles.items[0].username, "janedoe");
        assert_eq!(profiles.items[0].url.href, "https://github.com/janedoe");
        assert!(profiles.visible);
    }

    #[test]
    fn test_username_fallbacks() {
        assert_eq!(username_from_url("https://linkedin.com/in/janedoe/"), "janedoe");
        assert_eq!(username_from_url("https://jane.dev"), FALLBACK_USERNAME);
        assert_eq!(username_from_url("https://x.com/@jane?ref=cv"), "jane");
        assert_eq!(username_from_url(""), FALLBACK_USERNAME);
    }

    #[test]
    fn test_website_used_when_portfolio_missing() {
        let doc = map_value(&json!({ "socialLinks": { "website": "https://jane.dev/about" } }), "x")
            .unwrap();
        assert_eq!(doc.sections.profiles.items[0].network, "Portfolio");
        assert_eq!(doc.basics.url.href, "https://jane.dev/about");
    }

    #[test]
    fn test_basics_mapping() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        assert_eq!(doc.basics.name, "Jane Doe");
        assert_eq!(doc.basics.headline, "Built scalable systems.");
        assert_eq!(doc.basics.email, "jane@example.com");
        assert_eq!(doc.basics.location, "Berlin");
        assert_eq!(doc.basics.url.href, "https://jane.dev");
        assert!(doc.basics.custom_fields.is_empty());
    }

    #[test]
    fn test_first_name_only() {
        let doc = map_value(&json!({ "personalInfo": { "firstName": " Jane " } }), "x").unwrap();
        assert_eq!(doc.basics.name, "Jane");
    }

    #[test]
    fn test_experience_mapping() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        let first = &doc.sections.experience.items[0];
        assert_eq!(first.position, "Staff Engineer");
        assert_eq!(first.company, "Acme");
        assert_eq!(first.location, "");
        assert_eq!(first.date, "2020 to Present");
        assert_eq!(
            first.summary.paragraphs(),
            ["Cut p99 latency by 40%", "Mentored 5 engineers"]
        );
        assert_eq!(doc.sections.experience.items[1].date, "2017 to 2020");
    }

    #[test]
    fn test_education_mapping() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        let edu = &doc.sections.education.items[0];
        assert_eq!(edu.study_type, "BSc");
        assert_eq!(edu.area, "Computer Science");
        assert_eq!(edu.institution, "TU Berlin");
        assert_eq!(edu.score, "3.9");
        assert_eq!(edu.date, "2017");
        assert_eq!(edu.summary.paragraphs(), ["Summa cum laude"]);
    }

    #[test]
    fn test_skills_wrapped_in_single_item() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        let skills = &doc.sections.skills;
        assert_eq!(skills.items.len(), 1);
        assert_eq!(skills.items[0].name, SKILLS_ITEM_NAME);
        assert_eq!(skills.items[0].keywords, vec!["Rust", "Postgres", "Kubernetes"]);
        assert!(skills.visible);
    }

    #[test]
    fn test_empty_skill_list_hides_section() {
        let doc = map_value(&json!({ "skills": [] }), "x").unwrap();
        assert!(doc.sections.skills.items.is_empty());
        assert!(!doc.sections.skills.visible);
    }

    #[test]
    fn test_optional_lists_map_one_to_one() {
        let doc = map_value(&full_source(), "azurill").unwrap();
        assert_eq!(doc.sections.projects.items[0].keywords, vec!["Rust"]);
        assert_eq!(doc.sections.projects.items[0].url.href, "https://rtrace.dev");
        assert_eq!(doc.sections.awards.items[0].awarder, "ACM");
        assert_eq!(doc.sections.certifications.items[0].issuer, "CNCF");
        assert_eq!(doc.sections.languages.items[0].level, 5);
        assert_eq!(doc.sections.volunteer.items[0].date, "2018 to Present");
        assert_eq!(doc.sections.publications.items[0].publisher, "USENIX");
    }

    #[test]
    fn test_layout_is_fixed_regardless_of_content() {
        let empty = map_resume(&SourceResumeDocument::default(), "x");
        let full = map_value(&full_source(), "x").unwrap();
        assert_eq!(empty.metadata.layout, full.metadata.layout);
        assert_eq!(empty.metadata.layout, Layout::default());
    }

    #[test]
    fn test_template_id_copied_verbatim() {
        let doc = map_resume(&SourceResumeDocument::default(), "  Not A Template ");
        assert_eq!(doc.metadata.template, "  Not A Template ");
    }

    #[test]
    fn test_proficiency_levels() {
        assert_eq!(proficiency_level("Native speaker"), 5);
        assert_eq!(proficiency_level("Fluent"), 4);
        assert_eq!(proficiency_level("Intermediate"), 2);
        assert_eq!(proficiency_level("Beginner"), 1);
        assert_eq!(proficiency_level(""), 0);
    }
}
