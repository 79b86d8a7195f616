//! Axum route handlers for the autofill API.

use axum::{extract::State, Json};
use tracing::info;

use crate::auth::AuthUser;
use crate::autofill::experience::{parse_experience, ExperienceList, ParseExperienceRequest};
use crate::autofill::portfolio::{
    parse_portfolio, validate_portfolio_url, ParsePortfolioRequest, PortfolioResponse,
};
use crate::autofill::resume::{parse_resume, ParseResumeRequest, ResumeImport};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/parse-resume
///
/// Resume file (data URL) and/or LinkedIn / GitHub links → profile,
/// experience and certifications.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<ParseResumeRequest>,
) -> Result<Json<ResumeImport>, AppError> {
    let sources = request.validate()?;
    info!(
        "Parsing resume for user {} (file: {}, linkedin: {}, github: {})",
        user.user_id,
        sources.file_data.is_some(),
        sources.linkedin_url.is_some(),
        sources.github_url.is_some()
    );

    let parsed = parse_resume(&sources, &state.llm).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/parse-resume-experience
///
/// Plain resume text → experience entries. A malformed model reply yields
/// an empty list.
pub async fn handle_parse_resume_experience(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<ParseExperienceRequest>,
) -> Result<Json<ExperienceList>, AppError> {
    info!(
        "Parsing resume experience for user {} ({} chars)",
        user.user_id,
        request.resume_text.chars().count()
    );

    let list = parse_experience(&request.resume_text, &state.llm).await?;
    Ok(Json(list))
}

/// POST /api/v1/parse-portfolio
pub async fn handle_parse_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<ParsePortfolioRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let url = validate_portfolio_url(&request.portfolio_url)?;
    info!("Parsing portfolio for user {}", user.user_id);

    let data = parse_portfolio(&url, &state.http, &state.llm).await?;
    Ok(Json(PortfolioResponse {
        success: true,
        data,
        source_url: url.to_string(),
    }))
}
