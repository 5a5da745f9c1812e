//! Response Parser — turns the model's free-text reply into an `AnalysisResult`.
//!
//! The reply is split on the section markers from `prompts::MARKERS`:
//!
//! ```text
//! <analysis zone>  **2. Resume Improvement Suggestions:**  <suggestions zone>
//!                  **3. Interview Preparation Tips:**      <tips zone>
//! ```
//!
//! Parsing never fails. When either marker is missing, or the tips marker comes
//! first, the result degrades to a best-effort score, a fixed explanatory
//! `analysis_text` and empty lists.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, warn};

use crate::analysis::models::AnalysisResult;
use crate::analysis::prompts::MARKERS;

pub const DEFAULT_SCORE: u8 = 50;
pub const DEGRADED_ANALYSIS_TEXT: &str = "Could not fully parse AI response format.";

const PREVIEW_CHARS: usize = 200;

// ASCII digits only: `\d` would also match non-ASCII digits that `i64` cannot parse.
static SCORE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}\s*(-?[0-9]+)", regex::escape(MARKERS.score_label)))
        .expect("score pattern is a valid regex")
});

pub fn parse_response(raw: &str) -> AnalysisResult {
    let text = raw.trim();

    let suggestions_at = text.find(MARKERS.suggestions);
    let tips_at = text.find(MARKERS.tips);

    let (suggestions_at, tips_at) = match (suggestions_at, tips_at) {
        (Some(s), Some(t)) if s < t => (s, t),
        _ => {
            error!(
                "Could not find expected headings in model response (suggestions={:?}, tips={:?}): {}",
                suggestions_at,
                tips_at,
                preview(text)
            );
            return AnalysisResult {
                score: extract_score(text).unwrap_or(DEFAULT_SCORE),
                analysis_text: DEGRADED_ANALYSIS_TEXT.to_string(),
                suggestions: Vec::new(),
                interview_tips: Vec::new(),
            };
        }
    };

    let analysis_zone = text[..suggestions_at].trim();
    let suggestions_zone = text[suggestions_at + MARKERS.suggestions.len()..tips_at].trim();
    let tips_zone = text[tips_at + MARKERS.tips.len()..].trim();

    let score = extract_score(analysis_zone).unwrap_or_else(|| {
        warn!("Could not find a numerical score in the analysis section, defaulting to {DEFAULT_SCORE}");
        DEFAULT_SCORE
    });

    let suggestions = split_bullets(suggestions_zone);
    let interview_tips = split_bullets(tips_zone);

    debug!(
        "Parsed model response: score={}, suggestions={}, tips={}",
        score,
        suggestions.len(),
        interview_tips.len()
    );

    AnalysisResult {
        score,
        analysis_text: analysis_zone.to_string(),
        suggestions,
        interview_tips,
    }
}

/// First `Score (0-100): <n>` in `text`, clamped to 0..=100.
fn extract_score(text: &str) -> Option<u8> {
    let digits = SCORE_PATTERN.captures(text)?.get(1)?.as_str();
    Some(clamp_score(digits))
}

/// Clamps a signed digit string into 0..=100. Values too large for `i64`
/// saturate in the direction of their sign.
fn clamp_score(digits: &str) -> u8 {
    let value = digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    });
    value.clamp(0, 100) as u8
}

/// Splits a zone on the literal bullet delimiter, trimming and dropping empty segments.
fn split_bullets(zone: &str) -> Vec<String> {
    zone.split(MARKERS.bullet)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
