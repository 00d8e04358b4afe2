// Renderer dispatch: resolves a template id, derives columns and serialises
// the normalized document to HTML. Templates are looked up here and nowhere
// else; the mapper never validates them.

pub mod html;
pub mod templates;

use serde::Serialize;
use thiserror::Error;

use crate::models::schema::ResumeDocument;
use crate::resume::columns::{derive_columns, Columns};
use templates::{TemplateLayout, TemplateRegistry};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedResume {
    pub template: String,
    pub columns: Columns,
    pub html: String,
}

/// Renders `document` with the template named `template_id`.
///
/// Single-column templates receive the sidebar appended to the main column.
pub fn dispatch(
    registry: &TemplateRegistry,
    document: &ResumeDocument,
    template_id: &str,
) -> Result<RenderedResume, RenderError> {
    let template = registry
        .get(template_id)
        .ok_or_else(|| RenderError::TemplateNotFound(template_id.to_string()))?;

    let columns = match template.layout {
        TemplateLayout::TwoColumn => derive_columns(document),
        TemplateLayout::SingleColumn => derive_columns(document).merged(),
    };
    let html = html::render_document(document, &columns, template);

    Ok(RenderedResume {
        template: template.id.to_string(),
        columns,
        html,
    })
}
