//! Template registry — the set of template identifiers the renderer knows.
//!
//! The mapper copies any template id verbatim; an unknown id only surfaces
//! here, at dispatch time.

use serde::Serialize;

/// How a template arranges the derived columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateLayout {
    /// Main column plus a sidebar.
    TwoColumn,
    /// Sidebar sections are appended below the main column.
    SingleColumn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    pub layout: TemplateLayout,
}

const BUILTIN_TEMPLATES: &[TemplateSpec] = &[
    template("azurill", "Azurill", TemplateLayout::TwoColumn),
    template("bronzor", "Bronzor", TemplateLayout::SingleColumn),
    template("chikorita", "Chikorita", TemplateLayout::TwoColumn),
    template("ditto", "Ditto", TemplateLayout::TwoColumn),
    template("gengar", "Gengar", TemplateLayout::TwoColumn),
    template("glalie", "Glalie", TemplateLayout::TwoColumn),
    template("kakuna", "Kakuna", TemplateLayout::SingleColumn),
    template("leafish", "Leafish", TemplateLayout::TwoColumn),
    template("nosepass", "Nosepass", TemplateLayout::SingleColumn),
    template("onyx", "Onyx", TemplateLayout::SingleColumn),
    template("pikachu", "Pikachu", TemplateLayout::TwoColumn),
    template("rhyhorn", "Rhyhorn", TemplateLayout::SingleColumn),
];

const fn template(
    id: &'static str,
    display_name: &'static str,
    layout: TemplateLayout,
) -> TemplateSpec {
    TemplateSpec {
        id,
        display_name,
        layout,
    }
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<TemplateSpec>,
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        TemplateRegistry {
            templates: BUILTIN_TEMPLATES.to_vec(),
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn get(&self, id: &str) -> Option<&TemplateSpec> {
        let id = id.trim();
        self.templates
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
    }

    pub fn list(&self) -> &[TemplateSpec] {
        &self.templates
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        TemplateRegistry::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.get(" Azurill ").map(|t| t.id), Some("azurill"));
        assert!(registry.get("missingno").is_none());
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let registry = TemplateRegistry::builtin();
        let mut ids: Vec<_> = registry.list().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), registry.list().len());
    }
}
