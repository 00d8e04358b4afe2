//! The normalized, render-ready résumé document.
//!
//! Every section key always exists. Items carry fresh UUIDs; `visible`
//! flags are set by the mapper but renderers re-derive emptiness on demand
//! (see `resume::visibility`). Field names serialise in camelCase so the
//! document can be handed to any Reactive-Resume compatible renderer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::rich_text::RichText;

/// Substituted when the source carries no first or last name.
pub const PLACEHOLDER_NAME: &str = "Your Name";

// ────────────────────────────────────────────────────────────────────────────
// Section keys and the canonical layout
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Awards,
    Certifications,
    Languages,
    Volunteer,
    Publications,
    Profiles,
    Interests,
    References,
    Custom,
}

impl SectionKey {
    pub const ALL: [SectionKey; 14] = [
        SectionKey::Summary,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Skills,
        SectionKey::Projects,
        SectionKey::Awards,
        SectionKey::Certifications,
        SectionKey::Languages,
        SectionKey::Volunteer,
        SectionKey::Publications,
        SectionKey::Profiles,
        SectionKey::Interests,
        SectionKey::References,
        SectionKey::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Summary => "summary",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Skills => "skills",
            SectionKey::Projects => "projects",
            SectionKey::Awards => "awards",
            SectionKey::Certifications => "certifications",
            SectionKey::Languages => "languages",
            SectionKey::Volunteer => "volunteer",
            SectionKey::Publications => "publications",
            SectionKey::Profiles => "profiles",
            SectionKey::Interests => "interests",
            SectionKey::References => "references",
            SectionKey::Custom => "custom",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        SectionKey::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Heading shown above the section.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionKey::Summary => "Summary",
            SectionKey::Experience => "Experience",
            SectionKey::Education => "Education",
            SectionKey::Skills => "Skills",
            SectionKey::Projects => "Projects",
            SectionKey::Awards => "Awards",
            SectionKey::Certifications => "Certifications",
            SectionKey::Languages => "Languages",
            SectionKey::Volunteer => "Volunteering",
            SectionKey::Publications => "Publications",
            SectionKey::Profiles => "Profiles",
            SectionKey::Interests => "Interests",
            SectionKey::References => "References",
            SectionKey::Custom => "Custom Section",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main column of the default partition. Shared by the mapper and every
/// layout fallback so there is exactly one default arrangement.
pub const DEFAULT_MAIN: &[SectionKey] = &[
    SectionKey::Profiles,
    SectionKey::Summary,
    SectionKey::Experience,
    SectionKey::Education,
    SectionKey::Projects,
    SectionKey::Volunteer,
    SectionKey::References,
];

/// Sidebar column of the default partition.
pub const DEFAULT_SIDEBAR: &[SectionKey] = &[
    SectionKey::Skills,
    SectionKey::Interests,
    SectionKey::Certifications,
    SectionKey::Awards,
    SectionKey::Publications,
    SectionKey::Languages,
    SectionKey::Custom,
];

/// Pages → columns → section keys.
///
/// Deserialisation never fails on shape: a non-array page or column becomes
/// empty, and entries that are not known section keys are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout(pub Vec<Vec<Vec<SectionKey>>>);

impl Layout {
    pub fn from_value(value: &Value) -> Self {
        let pages = match value.as_array() {
            Some(pages) => pages,
            None => return Layout(Vec::new()),
        };
        Layout(
            pages
                .iter()
                .map(|page| {
                    page.as_array()
                        .map(|columns| columns.iter().map(column_from_value).collect())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    pub fn first_page(&self) -> Option<&[Vec<SectionKey>]> {
        self.0.first().map(Vec::as_slice)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout(vec![vec![DEFAULT_MAIN.to_vec(), DEFAULT_SIDEBAR.to_vec()]])
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Layout::from_value(&value))
    }
}

fn column_from_value(column: &Value) -> Vec<SectionKey> {
    column
        .as_array()
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .filter_map(SectionKey::from_key)
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Basics
// ────────────────────────────────────────────────────────────────────────────

/// A link. Never a bare string, so renderers see one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Url {
    pub href: String,
    pub label: String,
}

impl Url {
    pub fn new(href: impl Into<String>) -> Self {
        Url {
            href: href.into(),
            label: String::new(),
        }
    }

    pub fn labelled(href: impl Into<String>, label: impl Into<String>) -> Self {
        Url {
            href: href.into(),
            label: label.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.href.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    pub id: Uuid,
    pub icon: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureEffects {
    pub hidden: bool,
    pub border: bool,
    pub grayscale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Picture {
    pub url: String,
    pub size: u32,
    pub aspect_ratio: f32,
    pub border_radius: u32,
    pub effects: PictureEffects,
}

impl Default for Picture {
    fn default() -> Self {
        Picture {
            url: String::new(),
            size: 64,
            aspect_ratio: 1.0,
            border_radius: 0,
            effects: PictureEffects::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Basics {
    pub name: String,
    pub headline: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub url: Url,
    pub custom_fields: Vec<CustomField>,
    pub picture: Picture,
}

impl Default for Basics {
    fn default() -> Self {
        Basics {
            name: PLACEHOLDER_NAME.to_string(),
            headline: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            url: Url::default(),
            custom_fields: Vec::new(),
            picture: Picture::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section items
// ────────────────────────────────────────────────────────────────────────────

/// Common surface of every section item.
pub trait SectionItem {
    fn id(&self) -> Uuid;
    fn is_visible(&self) -> bool;
}

fn default_true() -> bool {
    true
}

fn default_columns() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub network: String,
    pub username: String,
    pub icon: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub company: String,
    pub position: String,
    pub location: String,
    pub date: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub institution: String,
    pub study_type: String,
    pub area: String,
    pub score: String,
    pub date: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub level: u8,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub date: String,
    pub summary: RichText,
    pub keywords: Vec<String>,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub title: String,
    pub awarder: String,
    pub date: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub description: String,
    /// 0 (unrated) to 5 (native).
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volunteer {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub organization: String,
    pub position: String,
    pub location: String,
    pub date: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub publisher: String,
    pub date: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interest {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub summary: RichText,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomItem {
    pub id: Uuid,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub summary: RichText,
    pub keywords: Vec<String>,
    pub url: Url,
}

/// Items are visible unless switched off, matching the serde default.
macro_rules! visible_by_default {
    ($($item:ident { $($field:ident),* $(,)? }),+ $(,)?) => {
        $(
            impl Default for $item {
                fn default() -> Self {
                    $item {
                        id: Uuid::default(),
                        visible: true,
                        $($field: Default::default(),)*
                    }
                }
            }
        )+
    };
}

visible_by_default!(
    Profile { network, username, icon, url },
    Experience { company, position, location, date, summary, url },
    Education { institution, study_type, area, score, date, summary, url },
    Skill { name, description, level, keywords },
    Project { name, description, date, summary, keywords, url },
    Award { title, awarder, date, summary, url },
    Certification { name, issuer, date, summary, url },
    Language { name, description, level },
    Volunteer { organization, position, location, date, summary, url },
    Publication { name, publisher, date, summary, url },
    Interest { name, keywords },
    Reference { name, description, summary, url },
    CustomItem { name, description, date, location, summary, keywords, url },
);

macro_rules! impl_section_item {
    ($($item:ty),+ $(,)?) => {
        $(
            impl SectionItem for $item {
                fn id(&self) -> Uuid {
                    self.id
                }

                fn is_visible(&self) -> bool {
                    self.visible
                }
            }
        )+
    };
}

impl_section_item!(
    Profile,
    Experience,
    Education,
    Skill,
    Project,
    Award,
    Certification,
    Language,
    Volunteer,
    Publication,
    Interest,
    Reference,
    CustomItem,
);

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section<T> {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_columns")]
    pub columns: u8,
    #[serde(default = "default_true")]
    pub separate_links: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Section<T> {
    /// A section whose `visible` flag reflects whether it holds any items.
    pub fn new(key: SectionKey, items: Vec<T>) -> Self {
        Section {
            name: key.display_name().to_string(),
            columns: 1,
            separate_links: true,
            visible: !items.is_empty(),
            items,
        }
    }

    pub fn empty(key: SectionKey) -> Self {
        Section::new(key, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySection {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_columns")]
    pub columns: u8,
    #[serde(default = "default_true")]
    pub separate_links: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub content: RichText,
}

impl SummarySection {
    pub fn new(content: RichText) -> Self {
        SummarySection {
            name: SectionKey::Summary.display_name().to_string(),
            columns: 1,
            separate_links: true,
            visible: !content.is_blank(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sections {
    pub summary: SummarySection,
    pub experience: Section<Experience>,
    pub education: Section<Education>,
    pub skills: Section<Skill>,
    pub projects: Section<Project>,
    pub awards: Section<Award>,
    pub certifications: Section<Certification>,
    pub languages: Section<Language>,
    pub volunteer: Section<Volunteer>,
    pub publications: Section<Publication>,
    pub profiles: Section<Profile>,
    pub interests: Section<Interest>,
    pub references: Section<Reference>,
    pub custom: Section<CustomItem>,
}

impl Default for Sections {
    fn default() -> Self {
        Sections {
            summary: SummarySection::new(RichText::default()),
            experience: Section::empty(SectionKey::Experience),
            education: Section::empty(SectionKey::Education),
            skills: Section::empty(SectionKey::Skills),
            projects: Section::empty(SectionKey::Projects),
            awards: Section::empty(SectionKey::Awards),
            certifications: Section::empty(SectionKey::Certifications),
            languages: Section::empty(SectionKey::Languages),
            volunteer: Section::empty(SectionKey::Volunteer),
            publications: Section::empty(SectionKey::Publications),
            profiles: Section::empty(SectionKey::Profiles),
            interests: Section::empty(SectionKey::Interests),
            references: Section::empty(SectionKey::References),
            custom: Section::empty(SectionKey::Custom),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metadata
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: String,
    pub text: String,
    pub primary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
            primary: "#dc2626".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    pub subset: String,
    pub variants: Vec<String>,
    pub size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            family: "IBM Plex Serif".to_string(),
            subset: "latin".to_string(),
            variants: vec!["regular".to_string(), "italic".to_string(), "600".to_string()],
            size: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub font: Font,
    pub line_height: f32,
    pub hide_icons: bool,
    pub underline_links: bool,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            font: Font::default(),
            line_height: 1.5,
            hide_icons: false,
            underline_links: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub template: String,
    pub layout: Layout,
    pub theme: Theme,
    pub typography: Typography,
}

/// The normalized document handed to renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub basics: Basics,
    pub sections: Sections,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_key_round_trips_through_str() {
        for key in SectionKey::ALL {
            assert_eq!(SectionKey::from_key(key.as_str()), Some(key));
            assert_eq!(serde_json::to_value(key).unwrap(), json!(key.as_str()));
        }
        assert_eq!(SectionKey::from_key("hobbies"), None);
    }

    #[test]
    fn test_default_layout_covers_every_key_once() {
        let mut keys: Vec<_> = DEFAULT_MAIN.iter().chain(DEFAULT_SIDEBAR).copied().collect();
        keys.sort();
        let mut all = SectionKey::ALL.to_vec();
        all.sort();
        assert_eq!(keys, all);
    }

    #[test]
    fn test_layout_coerces_malformed_columns() {
        let layout = Layout::from_value(&json!([[["summary", "bogus", 7], "oops"]]));
        assert_eq!(layout.0, vec![vec![vec![SectionKey::Summary], vec![]]]);
    }

    #[test]
    fn test_layout_non_array_is_empty() {
        assert!(Layout::from_value(&json!({"main": []})).first_page().is_none());
        let layout: Layout = serde_json::from_value(json!("two-column")).unwrap();
        assert!(layout.0.is_empty());
    }

    #[test]
    fn test_section_new_sets_visibility_from_items() {
        let empty: Section<Skill> = Section::empty(SectionKey::Skills);
        assert!(!empty.visible);
        assert_eq!(empty.name, "Skills");

        let full = Section::new(SectionKey::Skills, vec![Skill::default()]);
        assert!(full.visible);
    }

    #[test]
    fn test_empty_object_deserializes_with_defaults() {
        let doc: ResumeDocument = serde_json::from_value(json!({})).unwrap();
        assert_eq!(doc.basics.name, PLACEHOLDER_NAME);
        assert_eq!(doc.metadata.layout, Layout::default());
        assert!(!doc.sections.experience.visible);
    }

    #[test]
    fn test_item_without_visible_flag_defaults_to_visible() {
        let item: Experience = serde_json::from_value(json!({"company": "Acme"})).unwrap();
        assert!(item.visible);
        assert_eq!(item.company, "Acme");
    }

    #[test]
    fn test_item_default_matches_deserialized_empty_object() {
        let skill: Skill = serde_json::from_value(json!({})).unwrap();
        assert_eq!(Skill::default(), skill);
        assert!(Skill::default().visible);

        let entry: CustomItem = serde_json::from_value(json!({})).unwrap();
        assert_eq!(CustomItem::default(), entry);
        assert!(Experience::default().visible);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(ResumeDocument::default()).unwrap();
        assert!(value["basics"].get("customFields").is_some());
        assert!(value["sections"]["skills"].get("separateLinks").is_some());
        assert!(value["metadata"]["typography"].get("lineHeight").is_some());
    }
}
