use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ats::extractor::{extract_text_blocking, DocumentKind};
use crate::ats::parser::{parse_resume_text, ParsedResumeText};
use crate::ats::scoring::AtsReport;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

/// POST /api/v1/ats/parse
pub async fn handle_parse_text(
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParsedResumeText>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    Ok(Json(parse_resume_text(&req.text)))
}

struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// POST /api/v1/ats/analyze (multipart: `file`, optional `job_description`)
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AtsReport>, AppError> {
    let mut upload: Option<Upload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;
                upload = Some(Upload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid job_description: {e}")))?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("missing `file` field".to_string()))?;
    if upload.bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "file exceeds the {} byte limit",
            state.config.max_upload_bytes
        )));
    }

    let kind = DocumentKind::detect(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        &upload.bytes,
    )?;
    info!(
        "Analyzing {:?} upload ({} bytes, job description: {})",
        kind,
        upload.bytes.len(),
        job_description.is_some()
    );

    let text = extract_text_blocking(kind, upload.bytes).await?;
    let report = state
        .ats_analyzer
        .analyze(&text, job_description.as_deref())
        .await?;

    info!(
        "ATS score {} via {} backend",
        report.overall_score,
        state.ats_analyzer.backend()
    );
    Ok(Json(report))
}
