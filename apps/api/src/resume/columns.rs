//! Column derivation — splits section keys into a main column and a sidebar.
//!
//! Reads the first page of `metadata.layout`. Anything short of two column
//! groups falls back to the single canonical default partition
//! (`DEFAULT_MAIN` / `DEFAULT_SIDEBAR`). Never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::schema::{Layout, ResumeDocument, SectionKey, DEFAULT_MAIN, DEFAULT_SIDEBAR};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub main: Vec<SectionKey>,
    pub sidebar: Vec<SectionKey>,
}

impl Columns {
    pub fn default_partition() -> Self {
        Columns {
            main: DEFAULT_MAIN.to_vec(),
            sidebar: DEFAULT_SIDEBAR.to_vec(),
        }
    }

    /// Collapses both columns into one, main first, for single-column templates.
    pub fn merged(self) -> Self {
        let mut main = self.main;
        for key in self.sidebar {
            if !main.contains(&key) {
                main.push(key);
            }
        }
        Columns {
            main,
            sidebar: Vec::new(),
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Columns::default_partition()
    }
}

pub fn derive_columns(document: &ResumeDocument) -> Columns {
    columns_from_layout(&document.metadata.layout)
}

/// Each key lands in at most one column; main wins over the sidebar.
pub fn columns_from_layout(layout: &Layout) -> Columns {
    match layout.first_page() {
        Some(page) if page.len() >= 2 => {
            let mut main = Vec::with_capacity(page[0].len());
            for key in &page[0] {
                if !main.contains(key) {
                    main.push(*key);
                }
            }
            let mut sidebar = Vec::with_capacity(page[1].len());
            for key in &page[1] {
                if !main.contains(key) && !sidebar.contains(key) {
                    sidebar.push(*key);
                }
            }
            Columns { main, sidebar }
        }
        _ => Columns::default_partition(),
    }
}

/// Same derivation over an untyped document, normalized or not.
pub fn derive_columns_from_value(document: &Value) -> Columns {
    document
        .get("metadata")
        .and_then(|metadata| metadata.get("layout"))
        .map(Layout::from_value)
        .map(|layout| columns_from_layout(&layout))
        .unwrap_or_default()
}
