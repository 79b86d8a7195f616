use std::sync::Arc;

use crate::auth::Authenticator;
use crate::cards::store::CardStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Card persistence. Default: PgCardStore.
    pub cards: Arc<dyn CardStore>,
    pub llm: LlmClient,
    /// Pluggable token validator. Default: SupabaseAuthenticator.
    pub authenticator: Arc<dyn Authenticator>,
    /// Outbound client for fetching portfolio pages.
    pub http: reqwest::Client,
}
