//! Request Orchestrator — validate → extract → prompt → generate → parse.
//!
//! Each step gates the next. The staged upload is consumed by validation
//! failure or by the extractor, so it is gone from disk before this returns.

use tracing::{info, warn};

use crate::analysis::extractor::extract_text;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::parser::parse_response;
use crate::analysis::prompts::build_prompt;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;

pub const MISSING_FILE_MESSAGE: &str = "No resume file uploaded.";
pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: role, work experience, or skills.";

pub async fn analyze_resume(
    request: AnalysisRequest,
    generator: &dyn TextGenerator,
    min_resume_chars: usize,
) -> Result<AnalysisResult, AppError> {
    let AnalysisRequest {
        upload,
        role,
        experience,
        skills,
    } = request;

    let Some(upload) = upload else {
        return Err(AppError::Validation(MISSING_FILE_MESSAGE.to_string()));
    };

    let (role, experience, skills) = match (
        non_blank(role),
        non_blank(experience),
        non_blank(skills),
    ) {
        (Some(role), Some(experience), Some(skills)) => (role, experience, skills),
        _ => {
            upload.remove().await;
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
    };

    let resume_text = extract_text(upload).await?;

    let resume_chars = resume_text.trim().chars().count();
    if resume_chars < min_resume_chars {
        warn!(
            "Resume parsing produced minimal text ({resume_chars} chars), proceeding with analysis but results may be poor"
        );
    }

    let prompt = build_prompt(&resume_text, &role, &experience, &skills);

    info!("Calling LLM for resume analysis (role: {role})");
    let raw = generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::RemoteService(e.to_string()))?;
    info!("LLM call successful ({} chars)", raw.len());

    Ok(parse_response(&raw))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
