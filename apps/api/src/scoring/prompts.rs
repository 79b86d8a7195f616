// Career card scoring prompts and tool schema.

use serde_json::json;

use crate::llm_client::Tool;

pub const SCORING_SYSTEM: &str = "\
You are an expert career advisor and recruiter. Analyze how well a candidate's \
career card aligns with a specific company and role.

Your analysis should be thorough, fair, and constructive. Consider:
- Technical skills match
- Experience relevance
- Cultural fit based on work styles and values
- Project alignment with company needs
- Overall qualifications

Score every category from 0 to 100. Be specific and provide actionable feedback.";

/// Builds the user prompt around already-fenced inputs. User text is
/// inserted verbatim and never scanned for placeholders.
pub fn scoring_prompt(company: &str, role: &str, card: &str) -> String {
    format!(
        "Analyze this career card for alignment with the company and role.\n\n\
         {company}\n\n{role}\n\n{card}\n\n\
         Provide a comprehensive scoring and feedback."
    )
}

fn category_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "score": { "type": "number" },
            "feedback": { "type": "string" }
        },
        "required": ["score", "feedback"]
    })
}

pub fn scoring_tool() -> Tool {
    Tool {
        name: "score_career_card",
        description: "Provide a detailed score and feedback for career card alignment",
        parameters: json!({
            "type": "object",
            "properties": {
                "overallScore": {
                    "type": "number",
                    "description": "Overall alignment score from 0-100"
                },
                "categoryScores": {
                    "type": "object",
                    "properties": {
                        "technicalSkills": category_schema(),
                        "experience": category_schema(),
                        "culturalFit": category_schema(),
                        "projectAlignment": category_schema()
                    },
                    "required": ["technicalSkills", "experience", "culturalFit", "projectAlignment"]
                },
                "strengths": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Key strengths for this role"
                },
                "improvements": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Areas for improvement or gaps"
                },
                "overallFeedback": {
                    "type": "string",
                    "description": "Comprehensive summary feedback"
                }
            },
            "required": ["overallScore", "categoryScores", "strengths", "improvements", "overallFeedback"],
            "additionalProperties": false
        }),
    }
}
