//! Reading documents that are already in the normalized shape.
//!
//! A document that deserializes cleanly is used as-is. Otherwise it is read
//! field by field: anything that does not fit its slot is dropped and the
//! rest is kept, so a single bad item never costs the whole résumé.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::models::rich_text::RichText;
use crate::models::schema::{
    Basics, Metadata, ResumeDocument, Section, SectionKey, Sections, SummarySection,
};
use crate::resume::visibility::value_should_render;

/// Both `basics` and `sections` present as objects.
pub fn looks_normalized(value: &Value) -> bool {
    value.get("basics").is_some_and(Value::is_object)
        && value.get("sections").is_some_and(Value::is_object)
}

/// Returns the document and whether anything had to be dropped to read it.
pub fn read_normalized(value: &Value) -> (ResumeDocument, bool) {
    match ResumeDocument::deserialize(value) {
        Ok(document) => (document, false),
        Err(_) => (read_lenient(value), true),
    }
}

fn read_lenient(value: &Value) -> ResumeDocument {
    let sections = value.get("sections");
    let section = |key: SectionKey| sections.and_then(|s| s.get(key.as_str()));

    ResumeDocument {
        basics: lenient::<Basics>(value.get("basics")),
        sections: Sections {
            summary: lenient_summary(section(SectionKey::Summary)),
            experience: lenient_section(SectionKey::Experience, section(SectionKey::Experience)),
            education: lenient_section(SectionKey::Education, section(SectionKey::Education)),
            skills: lenient_section(SectionKey::Skills, section(SectionKey::Skills)),
            projects: lenient_section(SectionKey::Projects, section(SectionKey::Projects)),
            awards: lenient_section(SectionKey::Awards, section(SectionKey::Awards)),
            certifications: lenient_section(
                SectionKey::Certifications,
                section(SectionKey::Certifications),
            ),
            languages: lenient_section(SectionKey::Languages, section(SectionKey::Languages)),
            volunteer: lenient_section(SectionKey::Volunteer, section(SectionKey::Volunteer)),
            publications: lenient_section(
                SectionKey::Publications,
                section(SectionKey::Publications),
            ),
            profiles: lenient_section(SectionKey::Profiles, section(SectionKey::Profiles)),
            interests: lenient_section(SectionKey::Interests, section(SectionKey::Interests)),
            references: lenient_section(SectionKey::References, section(SectionKey::References)),
            custom: lenient_section(SectionKey::Custom, section(SectionKey::Custom)),
        },
        metadata: lenient::<Metadata>(value.get("metadata")),
    }
}

/// Strict read, else an object rebuilt from the entries that read on their own.
fn lenient<T: DeserializeOwned + Default>(value: Option<&Value>) -> T {
    let Some(value) = value else {
        return T::default();
    };
    if let Ok(parsed) = T::deserialize(value) {
        return parsed;
    }
    let Some(fields) = value.as_object() else {
        return T::default();
    };

    let kept: Map<String, Value> = fields
        .iter()
        .filter(|(name, field)| {
            let single: Map<String, Value> =
                [((*name).clone(), (*field).clone())].into_iter().collect();
            T::deserialize(&Value::Object(single)).is_ok()
        })
        .map(|(name, field)| (name.clone(), field.clone()))
        .collect();
    T::deserialize(&Value::Object(kept)).unwrap_or_default()
}

fn section_name(key: SectionKey, raw: &Value) -> String {
    raw.get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| key.display_name().to_string())
}

fn section_columns(raw: &Value) -> u8 {
    raw.get("columns")
        .and_then(Value::as_u64)
        .and_then(|columns| u8::try_from(columns).ok())
        .unwrap_or(1)
}

fn section_separate_links(raw: &Value) -> bool {
    raw.get("separateLinks")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

fn lenient_section<T: DeserializeOwned + Default>(
    key: SectionKey,
    raw: Option<&Value>,
) -> Section<T> {
    let Some(raw) = raw.filter(|raw| raw.is_object()) else {
        return Section::empty(key);
    };

    // Non-object entries cannot be items at all.
    let entries: Vec<Value> = raw
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|item| item.is_object()).cloned().collect())
        .unwrap_or_default();

    let kept = json!({ "visible": raw.get("visible"), "items": entries });
    Section {
        name: section_name(key, raw),
        columns: section_columns(raw),
        separate_links: section_separate_links(raw),
        visible: value_should_render(key.as_str(), &kept),
        items: entries.iter().map(|entry| lenient::<T>(Some(entry))).collect(),
    }
}

fn lenient_summary(raw: Option<&Value>) -> SummarySection {
    let Some(raw) = raw.filter(|raw| raw.is_object()) else {
        return SummarySection::new(RichText::default());
    };

    let content = raw
        .get("content")
        .and_then(|content| RichText::deserialize(content).ok())
        .unwrap_or_default();
    SummarySection {
        name: section_name(SectionKey::Summary, raw),
        columns: section_columns(raw),
        separate_links: section_separate_links(raw),
        visible: value_should_render(SectionKey::Summary.as_str(), raw),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::PLACEHOLDER_NAME;
    use crate::resume::visibility::SectionContent;

    #[test]
    fn test_clean_document_is_not_degraded() {
        let value = serde_json::to_value(ResumeDocument::default()).unwrap();
        let (doc, degraded) = read_normalized(&value);
        assert!(!degraded);
        assert_eq!(doc, ResumeDocument::default());
    }

    #[test]
    fn test_bad_item_keeps_the_rest() {
        let value = json!({
            "basics": { "name": "Ada Lovelace", "email": 42 },
            "sections": {
                "experience": {
                    "name": "Work",
                    "items": ["oops", { "company": "Analytical Engines", "position": 7 }]
                },
                "skills": { "visible": false, "items": [{ "name": "Maths" }] }
            },
            "metadata": { "template": "onyx", "theme": "dark" }
        });
        let (doc, degraded) = read_normalized(&value);
        assert!(degraded);
        assert_eq!(doc.basics.name, "Ada Lovelace");
        assert_eq!(doc.basics.email, "");

        let experience = &doc.sections.experience;
        assert_eq!(experience.name, "Work");
        assert_eq!(experience.items.len(), 1);
        assert_eq!(experience.items[0].company, "Analytical Engines");
        assert!(experience.items[0].visible);
        assert!(experience.visible);

        assert_eq!(doc.sections.skills.items.len(), 1);
        assert!(!doc.sections.skills.visible);
        assert_eq!(doc.metadata.template, "onyx");
    }

    #[test]
    fn test_section_with_only_junk_items_is_hidden() {
        let value = json!({
            "basics": {},
            "sections": { "awards": { "visible": true, "items": ["x", 3] } },
            "metadata": { "layout": 5 }
        });
        let (doc, degraded) = read_normalized(&value);
        assert!(degraded);
        assert!(doc.sections.awards.items.is_empty());
        assert!(!doc.sections.awards.visible);
        assert!(!doc.sections.awards.should_render());
        assert_eq!(doc.basics.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_summary_content_survives_bad_siblings() {
        let value = json!({
            "basics": { "name": "Ada" },
            "sections": {
                "summary": { "columns": "two", "content": "<p>First programmer.</p>" },
                "projects": "none"
            }
        });
        let (doc, degraded) = read_normalized(&value);
        assert!(degraded);
        assert!(doc.sections.summary.visible);
        assert_eq!(doc.sections.summary.columns, 1);
        assert_eq!(doc.sections.summary.content.paragraphs(), vec!["First programmer."]);
        assert!(doc.sections.projects.items.is_empty());
    }

    #[test]
    fn test_looks_normalized_needs_basics_and_sections() {
        assert!(looks_normalized(&json!({ "basics": {}, "sections": {} })));
        assert!(!looks_normalized(&json!({ "basics": {} })));
        assert!(!looks_normalized(&json!({ "personalInfo": {} })));
        assert!(!looks_normalized(&json!([])));
    }
}
