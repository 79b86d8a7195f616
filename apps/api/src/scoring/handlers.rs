use axum::{extract::State, Json};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::scoring::{score_card, ScoreCardRequest, ScoringResult};
use crate::state::AppState;

/// POST /api/v1/score-career-card
///
/// Scores a card against a company and role description.
pub async fn handle_score_career_card(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<ScoreCardRequest>,
) -> Result<Json<ScoringResult>, AppError> {
    info!("Scoring career card for user {}", user.user_id);
    let result = score_card(request, &state.llm).await?;
    info!("Career card scored {}/100", result.overall_score);
    Ok(Json(result))
}
