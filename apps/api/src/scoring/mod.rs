//! Career card scoring: asks the model how well a card fits a company and role.

pub mod handlers;
pub mod prompts;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::cards::models::CareerCardData;
use crate::cards::validation::validate_card;
use crate::errors::AppError;
use crate::llm_client::prompts::{fenced_input, UNTRUSTED_INPUT_NOTICE};
use crate::llm_client::{ChatMessage, LlmClient};
use crate::scoring::prompts::{scoring_prompt, scoring_tool, SCORING_SYSTEM};
use crate::validation::validate_text_length;

pub const MAX_DESCRIPTION_CHARS: usize = 5_000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreCardRequest {
    pub career_card_data: Option<CareerCardData>,
    pub company_description: String,
    pub role_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    #[serde(deserialize_with = "clamped_score")]
    pub overall_score: u8,
    pub category_scores: CategoryScores,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub overall_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub technical_skills: CategoryScore,
    pub experience: CategoryScore,
    pub cultural_fit: CategoryScore,
    pub project_alignment: CategoryScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    #[serde(deserialize_with = "clamped_score")]
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
}

/// Accepts any JSON number and pins it to a whole 0–100 score.
fn clamped_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(D::Error::custom("score must be a finite number"));
    }
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

/// Request inputs after validation.
pub struct ScoringInput {
    pub card: CareerCardData,
    pub company_description: String,
    pub role_description: String,
}

impl ScoreCardRequest {
    pub fn validate(self) -> Result<ScoringInput, AppError> {
        let card = self
            .career_card_data
            .ok_or_else(|| AppError::Validation("careerCardData is required".to_string()))?;
        validate_text_length(
            &self.company_description,
            MAX_DESCRIPTION_CHARS,
            "companyDescription",
        )?;
        validate_text_length(&self.role_description, MAX_DESCRIPTION_CHARS, "roleDescription")?;
        validate_card(&card)?;

        Ok(ScoringInput {
            card,
            company_description: self.company_description,
            role_description: self.role_description,
        })
    }
}

pub fn build_scoring_messages(input: &ScoringInput) -> Result<Vec<ChatMessage>, AppError> {
    let card_json = serde_json::to_string_pretty(&input.card)
        .map_err(|e| AppError::Internal(e.into()))?;

    let prompt = scoring_prompt(
        &fenced_input("COMPANY DESCRIPTION", &input.company_description),
        &fenced_input("ROLE DESCRIPTION", &input.role_description),
        &fenced_input("CAREER CARD", &card_json),
    );

    Ok(vec![
        ChatMessage::system(format!("{SCORING_SYSTEM}\n\n{UNTRUSTED_INPUT_NOTICE}")),
        ChatMessage::user(prompt),
    ])
}

/// Validates, calls the model once, and returns its structured verdict.
/// An unparseable reply is an error.
pub async fn score_card(
    request: ScoreCardRequest,
    llm: &LlmClient,
) -> Result<ScoringResult, AppError> {
    let input = request.validate()?;
    let messages = build_scoring_messages(&input)?;
    let result = llm
        .call_tool::<ScoringResult>(&messages, &scoring_tool())
        .await?;
    Ok(result)
}
