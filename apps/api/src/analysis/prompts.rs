// Resume analysis prompt template and the section markers shared with the parser.
// The parser locates sections by exact substring match on these markers, so the
// prompt must embed them verbatim.

/// Literal headings the model is asked to emit and the parser searches for.
#[derive(Debug, Clone, Copy)]
pub struct SectionMarkers {
    pub analysis: &'static str,
    pub suggestions: &'static str,
    pub tips: &'static str,
    /// Label preceding the numeric score, e.g. `Score (0-100): 72`.
    pub score_label: &'static str,
    pub bullet: &'static str,
}

pub const MARKERS: SectionMarkers = SectionMarkers {
    analysis: "**1. Analysis & Score (0-100):**",
    suggestions: "**2. Resume Improvement Suggestions:**",
    tips: "**3. Interview Preparation Tips:**",
    score_label: "Score (0-100):",
    bullet: "* ",
};

/// Analysis prompt template. Placeholders are replaced by `build_prompt`.
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an AI resume and career advisor. Analyze the provided resume content, the target job role, the user's summarized work experience, and their skills. Provide personalized feedback and advice to help the user improve their resume and prepare for interviews for the specified role.

Provide the output in exactly three sections, each starting with the heading shown below on its own line, in this order:

{analysis_heading}
Provide a brief analysis of how well the resume content aligns with the target role and provided details. Based on this analysis and the overall quality/relevance, give a hypothetical selection score between 0 and 100 on its own line in the form "{score_label} <number>". This score is an estimate based on the provided text and should be seen as indicative, not definitive.

{suggestions_heading}
Provide specific, actionable suggestions to improve the resume content for the "{role}" role. Start every suggestion with "{bullet}". Refer to the provided resume text, experience, and skills in your suggestions.

{tips_heading}
Provide customized tips for preparing for interviews for the "{role}" role, referencing the user's experience and skills. Start every tip with "{bullet}".

---
Resume Content:
{resume_text}

---
Target Role:
{role}

---
Summarized Work Experience (provided by user):
{experience}

---
Key Skills (provided by user):
{skills}
"#;

/// Builds the analysis prompt. Deterministic: the same inputs always produce the same prompt.
pub fn build_prompt(resume_text: &str, role: &str, experience: &str, skills: &str) -> String {
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("analysis_heading", MARKERS.analysis),
            ("suggestions_heading", MARKERS.suggestions),
            ("tips_heading", MARKERS.tips),
            ("score_label", MARKERS.score_label),
            ("bullet", MARKERS.bullet.trim_end()),
            ("role", role),
            ("experience", experience),
            ("skills", skills),
            ("resume_text", resume_text),
        ],
    )
}

/// Single-pass `{name}` substitution. Inserted values are never rescanned, so
/// user text containing braces comes through untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
