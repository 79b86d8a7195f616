use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cards::models::CareerCardData;
use crate::cards::validation::validate_card;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::card::CareerCardRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CardCreatedResponse {
    pub id: Uuid,
}

/// Public view of a stored card. The owner id is not exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub card_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CareerCardRow> for CardResponse {
    fn from(row: CareerCardRow) -> Self {
        Self {
            id: row.id,
            card_data: row.card_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// POST /api/v1/cards
pub async fn handle_create_card(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(card): AppJson<CareerCardData>,
) -> Result<(StatusCode, Json<CardCreatedResponse>), AppError> {
    validate_card(&card)?;
    let row = state.cards.insert(user.user_id, &card).await?;
    Ok((StatusCode::CREATED, Json(CardCreatedResponse { id: row.id })))
}

/// PUT /api/v1/cards/:id
///
/// Only the owner may replace a card.
pub async fn handle_update_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(card): AppJson<CareerCardData>,
) -> Result<Json<CardResponse>, AppError> {
    validate_card(&card)?;

    if let Some(row) = state.cards.update(id, user.user_id, &card).await? {
        return Ok(Json(row.into()));
    }

    // Nothing matched: distinguish a missing card from someone else's.
    match state.cards.fetch(id).await? {
        Some(_) => Err(AppError::Forbidden),
        None => Err(AppError::NotFound(format!("Career card {id} not found"))),
    }
}

/// GET /api/v1/cards/:id
///
/// Unauthenticated: this backs shared card links.
pub async fn handle_get_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardResponse>, AppError> {
    let row = state
        .cards
        .fetch(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Career card {id} not found")))?;
    Ok(Json(row.into()))
}
