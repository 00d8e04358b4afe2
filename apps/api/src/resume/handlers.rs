use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::schema::ResumeDocument;
use crate::render::dispatch;
use crate::render::templates::TemplateSpec;
use crate::resume::columns::{derive_columns_from_value, Columns};
use crate::resume::mapper::{map_value, MapError};
use crate::resume::normalized::{looks_normalized, read_normalized};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MapRequest {
    #[serde(default)]
    pub source: Value,
    pub template_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ColumnsRequest {
    #[serde(default)]
    pub document: Value,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub document: Value,
    pub template_id: Option<String>,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub document: ResumeDocument,
    pub template: String,
    pub columns: Columns,
    pub html: String,
    /// Parts of a normalized input were unreadable and left out.
    pub degraded: bool,
}

#[derive(Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateSpec>,
    pub default_template: String,
}

/// GET /api/v1/templates
pub async fn handle_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: state.templates.list().to_vec(),
        default_template: state.config.default_template.clone(),
    })
}

/// POST /api/v1/resumes/map
pub async fn handle_map(
    State(state): State<AppState>,
    Json(req): Json<MapRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let template_id = req
        .template_id
        .unwrap_or_else(|| state.config.default_template.clone());
    let document = map_value(&req.source, &template_id)?;
    debug!("Mapped source document with template '{}'", template_id);
    Ok(Json(document))
}

/// POST /api/v1/resumes/columns
pub async fn handle_columns(Json(req): Json<ColumnsRequest>) -> Json<Columns> {
    Json(derive_columns_from_value(&req.document))
}

/// POST /api/v1/resumes/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let template_id = req
        .template_id
        .unwrap_or_else(|| state.config.default_template.clone());

    let (document, degraded) = prepare_document(req.document, &template_id)?;
    let rendered = dispatch(&state.templates, &document, &template_id)?;

    info!(
        "Rendered preview with template '{}' (degraded: {})",
        rendered.template, degraded
    );
    Ok(Json(PreviewResponse {
        document,
        template: rendered.template,
        columns: rendered.columns,
        html: rendered.html,
        degraded,
    }))
}

/// Resolves the document to render.
///
/// Normalized input is never re-mapped: it is read as a `ResumeDocument`,
/// keeping whatever fits and flagging the result degraded when anything had
/// to be dropped. Everything else goes through the mapper, whose error is
/// returned for non-object input.
pub fn prepare_document(
    value: Value,
    template_id: &str,
) -> Result<(ResumeDocument, bool), MapError> {
    if looks_normalized(&value) {
        let (document, degraded) = read_normalized(&value);
        if degraded {
            warn!("Document did not fully match the schema, rendering what could be read");
        }
        return Ok((document, degraded));
    }

    let document = map_value(&value, template_id)?;
    Ok((document, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::PLACEHOLDER_NAME;
    use serde_json::json;

    #[test]
    fn test_source_document_is_mapped() {
        let (doc, degraded) = prepare_document(
            json!({ "personalInfo": { "firstName": "Ada", "lastName": "Lovelace" } }),
            "azurill",
        )
        .unwrap();
        assert!(!degraded);
        assert_eq!(doc.basics.name, "Ada Lovelace");
        assert_eq!(doc.metadata.template, "azurill");
    }

    #[test]
    fn test_normalized_document_passes_through() {
        let mapped = map_value(&json!({ "summary": "Writes compilers." }), "onyx").unwrap();
        let value = serde_json::to_value(&mapped).unwrap();

        let (doc, degraded) = prepare_document(value, "azurill").unwrap();
        assert!(!degraded);
        assert_eq!(doc.metadata.template, "onyx");
        assert_eq!(
            doc.sections.summary.content.paragraphs(),
            mapped.sections.summary.content.paragraphs()
        );
        assert_eq!(doc.basics.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_null_document_is_missing_source() {
        let err = prepare_document(Value::Null, "azurill").unwrap_err();
        assert!(matches!(err, MapError::MissingSource));
    }

    #[test]
    fn test_damaged_normalized_document_is_degraded_not_remapped() {
        let value = json!({
            "basics": { "name": "Ada Lovelace", "email": "ada@example.com" },
            "sections": { "experience": { "items": ["oops"] } }
        });
        let (doc, degraded) = prepare_document(value, "azurill").unwrap();
        assert!(degraded);
        assert_eq!(doc.basics.name, "Ada Lovelace");
        assert_eq!(doc.basics.email, "ada@example.com");
        assert!(doc.sections.experience.items.is_empty());
    }

    #[test]
    fn test_array_document_is_malformed() {
        let err = prepare_document(json!([]), "azurill").unwrap_err();
        assert!(matches!(err, MapError::Malformed(_)));
    }

    #[test]
    fn test_scalar_document_is_malformed() {
        let err = prepare_document(json!("resume"), "azurill").unwrap_err();
        assert!(matches!(err, MapError::Malformed(_)));
    }
}
