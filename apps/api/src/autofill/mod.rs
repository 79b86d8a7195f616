// AI-assisted autofill: resume, resume-text and portfolio parsers.
// All LLM calls go through llm_client.

pub mod experience;
pub mod handlers;
pub mod portfolio;
pub mod prompts;
pub mod resume;
