//! Experience extraction from plain resume text.
//!
//! Never fails on a bad model reply: anything unparseable becomes an empty list.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::autofill::prompts::{experience_tool, EXPERIENCE_PROMPT_HEADER, EXPERIENCE_SYSTEM};
use crate::cards::models::{reshape_items, ExperienceItem};
use crate::errors::AppError;
use crate::llm_client::prompts::{fenced_input, UNTRUSTED_INPUT_NOTICE};
use crate::llm_client::{ChatMessage, ChatResponse, LlmClient, LlmError};
use crate::validation::validate_text_length;

pub const MAX_RESUME_TEXT_CHARS: usize = 100_000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseExperienceRequest {
    pub resume_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperienceList {
    pub experiences: Vec<ExperienceItem>,
}

/// Models answer either with the tool's object or, when they ignore the
/// tool, with a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExperiencePayload {
    Wrapped {
        #[serde(default)]
        experiences: Vec<ExperienceItem>,
    },
    Bare(Vec<ExperienceItem>),
}

pub fn build_experience_messages(resume_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!("{EXPERIENCE_SYSTEM}\n\n{UNTRUSTED_INPUT_NOTICE}")),
        ChatMessage::user(format!(
            "{EXPERIENCE_PROMPT_HEADER}\n\n{}",
            fenced_input("RESUME", resume_text)
        )),
    ]
}

pub async fn parse_experience(
    resume_text: &str,
    llm: &LlmClient,
) -> Result<ExperienceList, AppError> {
    validate_text_length(resume_text, MAX_RESUME_TEXT_CHARS, "resumeText")?;

    let messages = build_experience_messages(resume_text);
    let response = match llm.call(&messages, &experience_tool()).await {
        Ok(response) => response,
        Err(LlmError::Parse(e)) => {
            warn!("Undecodable experience reply, returning empty list: {e}");
            return Ok(ExperienceList::default());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(reshape_experience(&response))
}

pub fn reshape_experience(response: &ChatResponse) -> ExperienceList {
    let items = match response.parse_payload::<ExperiencePayload>() {
        Ok(ExperiencePayload::Wrapped { experiences }) => experiences,
        Ok(ExperiencePayload::Bare(experiences)) => experiences,
        Err(e) => {
            warn!("Unparseable experience reply, returning empty list: {e}");
            Vec::new()
        }
    };

    ExperienceList {
        experiences: reshape_items(items),
    }
}
