use serde::Serialize;

use crate::analysis::staging::StagedUpload;

/// Inputs collected from one upload request. Every field is required; `None`
/// or a blank string fails validation.
#[derive(Debug, Default)]
pub struct AnalysisRequest {
    pub upload: Option<StagedUpload>,
    pub role: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
}

/// Structured analysis returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 – 100
    pub score: u8,
    pub suggestions: Vec<String>,
    pub interview_tips: Vec<String>,
    pub analysis_text: String,
}
