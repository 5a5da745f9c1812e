//! Axum route handler for the resume analysis API.

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use tracing::{info, warn};

use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::service::analyze_resume;
use crate::analysis::staging::StagedUpload;
use crate::errors::AppError;
use crate::state::AppState;

pub const RESUME_FILE_FIELD: &str = "resumeFile";

/// POST /analyze-resume
///
/// Multipart form: `resumeFile` (file), `role`, `experience`, `skills` (text).
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    info!("Received request to /analyze-resume");

    let request = read_form(&state, multipart).await?;
    let result = analyze_resume(
        request,
        state.generator.as_ref(),
        state.config.min_resume_chars,
    )
    .await?;

    Ok(Json(result))
}

/// Drains the multipart body, staging the resume file as soon as it arrives.
/// On error the partially-built request is dropped, which removes any staged file.
async fn read_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<AnalysisRequest, AppError> {
    let mut request = AnalysisRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            RESUME_FILE_FIELD => {
                if let Some(upload) = stage_file(state, field).await? {
                    // A repeated file field replaces the earlier one; dropping it deletes it.
                    request.upload = Some(upload);
                }
            }
            "role" => request.role = Some(read_text(field).await?),
            "experience" => request.experience = Some(read_text(field).await?),
            "skills" => request.skills = Some(read_text(field).await?),
            other => warn!("Ignoring unexpected form field '{other}'"),
        }
    }

    Ok(request)
}

/// Stages a non-empty file part. Empty parts (no file chosen) count as missing.
async fn stage_file(
    state: &AppState,
    field: Field<'_>,
) -> Result<Option<StagedUpload>, AppError> {
    let original_name = field.file_name().unwrap_or("upload").to_string();
    let media_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let contents = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

    if contents.is_empty() {
        return Ok(None);
    }

    let upload = StagedUpload::write(
        &state.config.upload_dir,
        &original_name,
        &media_type,
        &contents,
    )
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Some(upload))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid value for field '{name}': {e}")))
}
