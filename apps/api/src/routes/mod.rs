pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::autofill::handlers as autofill;
use crate::cards::handlers as cards;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

/// Resume uploads arrive as base64 data URLs inside the JSON body.
const MAX_BODY_BYTES: usize = 30 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Autofill API
        .route("/api/v1/parse-resume", post(autofill::handle_parse_resume))
        .route(
            "/api/v1/parse-resume-experience",
            post(autofill::handle_parse_resume_experience),
        )
        .route(
            "/api/v1/parse-portfolio",
            post(autofill::handle_parse_portfolio),
        )
        // Scoring API
        .route(
            "/api/v1/score-career-card",
            post(scoring::handle_score_career_card),
        )
        // Card API
        .route("/api/v1/cards", post(cards::handle_create_card))
        .route(
            "/api/v1/cards/:id",
            get(cards::handle_get_card).put(cards::handle_update_card),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Any origin may call the API; credentials travel in the Authorization header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}
