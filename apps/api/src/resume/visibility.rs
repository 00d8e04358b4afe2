//! Section visibility — the derived "non-empty" predicate.
//!
//! The stored `visible` flag is a user-toggleable override. Whether a section
//! has anything to show is always recomputed from its content, because a
//! document may be edited after mapping without its flags being refreshed.

use serde_json::Value;

use crate::models::rich_text::{strip_markup, RichText};
use crate::models::schema::{Section, SectionItem, SectionKey, Sections, SummarySection};

/// Uniform view over a section regardless of its item type.
pub trait SectionContent {
    fn display_name(&self) -> &str;

    /// The flag as stored on the document.
    fn stored_visible(&self) -> bool;

    /// True when the section has renderable content.
    fn is_non_empty(&self) -> bool;

    /// Rendered only when not switched off and not empty.
    fn should_render(&self) -> bool {
        self.stored_visible() && self.is_non_empty()
    }
}

impl<T: SectionItem> SectionContent for Section<T> {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn stored_visible(&self) -> bool {
        self.visible
    }

    fn is_non_empty(&self) -> bool {
        self.items.iter().any(SectionItem::is_visible)
    }
}

impl SectionContent for SummarySection {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn stored_visible(&self) -> bool {
        self.visible
    }

    fn is_non_empty(&self) -> bool {
        !self.content.is_blank()
    }
}

impl Sections {
    pub fn content(&self, key: SectionKey) -> &dyn SectionContent {
        match key {
            SectionKey::Summary => &self.summary,
            SectionKey::Experience => &self.experience,
            SectionKey::Education => &self.education,
            SectionKey::Skills => &self.skills,
            SectionKey::Projects => &self.projects,
            SectionKey::Awards => &self.awards,
            SectionKey::Certifications => &self.certifications,
            SectionKey::Languages => &self.languages,
            SectionKey::Volunteer => &self.volunteer,
            SectionKey::Publications => &self.publications,
            SectionKey::Profiles => &self.profiles,
            SectionKey::Interests => &self.interests,
            SectionKey::References => &self.references,
            SectionKey::Custom => &self.custom,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Untyped documents
// ────────────────────────────────────────────────────────────────────────────

/// Non-emptiness of a raw JSON section.
///
/// `summary` is non-empty when its `content` (an HTML string or a list of
/// paragraphs) has text once markup is removed. Any other section needs an
/// `items` array with at least one entry whose `visible` is not `false`.
pub fn value_is_non_empty(key: &str, section: &Value) -> bool {
    if key == SectionKey::Summary.as_str() {
        return match section.get("content") {
            Some(Value::String(html)) => !strip_markup(html).trim().is_empty(),
            Some(content @ Value::Array(_)) => serde_json::from_value::<RichText>(content.clone())
                .map(|text| !text.is_blank())
                .unwrap_or(false),
            _ => false,
        };
    }

    section
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .any(|item| item.get("visible").and_then(Value::as_bool) != Some(false))
        })
        .unwrap_or(false)
}

/// Render decision for a raw JSON section: an explicit `visible: false`
/// hides it, otherwise content decides.
pub fn value_should_render(key: &str, section: &Value) -> bool {
    section.get("visible").and_then(Value::as_bool) != Some(false)
        && value_is_non_empty(key, section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{Experience, Skill};
    use serde_json::json;

    #[test]
    fn test_hidden_items_do_not_count() {
        let section = Section::new(
            SectionKey::Experience,
            vec![Experience {
                visible: false,
                ..Default::default()
            }],
        );
        assert!(section.stored_visible());
        assert!(!section.is_non_empty());
        assert!(!section.should_render());
    }

    #[test]
    fn test_stale_flag_is_overridden_by_content() {
        // Items removed after mapping, flag never refreshed.
        let mut section = Section::new(SectionKey::Skills, vec![Skill::default()]);
        section.items.clear();
        assert!(section.visible);
        assert!(!section.should_render());
    }

    #[test]
    fn test_user_can_hide_non_empty_section() {
        let skill = Skill {
            visible: true,
            ..Default::default()
        };
        let mut section = Section::new(SectionKey::Skills, vec![skill]);
        section.visible = false;
        assert!(section.is_non_empty());
        assert!(!section.should_render());
    }

    #[test]
    fn test_summary_requires_text() {
        assert!(!SummarySection::new(RichText::from_html("<p> </p>")).should_render());
        assert!(SummarySection::new(RichText::paragraph("Engineer.")).should_render());
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let section = Section::new(SectionKey::Skills, vec![Skill::default()]);
        assert_eq!(section.is_non_empty(), section.is_non_empty());
    }

    #[test]
    fn test_value_summary_strips_markup() {
        assert!(!value_is_non_empty("summary", &json!({ "content": "<p>&nbsp;</p>" })));
        assert!(value_is_non_empty("summary", &json!({ "content": "<p>Hello</p>" })));
        assert!(value_is_non_empty("summary", &json!({ "content": ["Hello"] })));
        assert!(!value_is_non_empty("summary", &json!({})));
    }

    #[test]
    fn test_value_items_respect_item_visibility() {
        let hidden = json!({ "items": [{ "visible": false }] });
        let implicit = json!({ "items": [{ "name": "Rust" }] });
        assert!(!value_is_non_empty("skills", &hidden));
        assert!(value_is_non_empty("skills", &implicit));
        assert!(!value_is_non_empty("skills", &json!({ "items": "nope" })));
    }

    #[test]
    fn test_value_flag_absent_falls_back_to_content() {
        let section = json!({ "items": [{ "name": "Rust" }] });
        assert!(value_should_render("skills", &section));

        let off = json!({ "visible": false, "items": [{ "name": "Rust" }] });
        assert!(!value_should_render("skills", &off));

        let stale = json!({ "visible": true, "items": [] });
        assert!(!value_should_render("skills", &stale));
    }
}
