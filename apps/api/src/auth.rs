//! Bearer-token authentication against the hosted auth provider.
//!
//! `AppState` holds an `Arc<dyn Authenticator>`; handlers take an `AuthUser`
//! extractor. A missing or malformed header is rejected before the provider
//! is contacted.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

const PROVIDER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedHeader,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Auth provider error: {0}")]
    Provider(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // Not a bad token: the provider is unreachable or misconfigured.
            AuthError::Provider(msg) => {
                error!("Auth provider failure: {msg}");
                AppError::Unauthorized("Invalid or expired token".to_string())
            }
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Resolves a bearer token to the id of the user it was issued to.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<Uuid, AuthError>;
}

/// Validates tokens by asking the Supabase auth API who they belong to.
pub struct SupabaseAuthenticator {
    client: Client,
    user_endpoint: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Uuid,
}

impl SupabaseAuthenticator {
    pub fn new(supabase_url: &str, anon_key: String) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(Self {
            client,
            user_endpoint: format!("{}/auth/v1/user", supabase_url.trim_end_matches('/')),
            anon_key,
        })
    }
}

#[async_trait]
impl Authenticator for SupabaseAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Result<Uuid, AuthError> {
        let response = self
            .client
            .get(&self.user_endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let user: SupabaseUser = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Provider(e.to_string()))?;
                debug!("Authenticated user {}", user.id);
                Ok(user.id)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            status => Err(AuthError::Provider(format!("status {status}"))),
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers)?;
        let user_id = state.authenticator.authenticate(token).await?;
        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_scheme_case_insensitive() {
        let headers = headers_with("bearer abc");
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn test_basic_scheme_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn test_empty_token_rejected() {
        let headers = headers_with("Bearer  ");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_provider_failure_is_unauthorized() {
        let err: AppError = AuthError::Provider("connection refused".to_string()).into();
        assert!(matches!(err, AppError::Unauthorized(ref m) if !m.contains("refused")));
    }

    /// Records the level of every event emitted while it is installed.
    struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

    impl<S: tracing::Subscriber> Layer<S> for LevelRecorder {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    fn levels_logged_by(f: impl FnOnce()) -> Vec<Level> {
        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LevelRecorder(levels.clone()));
        tracing::subscriber::with_default(subscriber, f);
        let recorded = levels.lock().unwrap().clone();
        recorded
    }

    #[test]
    fn test_provider_failure_logged_as_error() {
        let levels = levels_logged_by(|| {
            let _ = AppError::from(AuthError::Provider("status 404 Not Found".to_string()));
        });
        assert_eq!(levels, vec![Level::ERROR]);
    }

    #[test]
    fn test_rejected_token_not_logged_as_error() {
        let levels = levels_logged_by(|| {
            let _ = AppError::from(AuthError::InvalidToken);
        });
        assert!(!levels.contains(&Level::ERROR));
    }

    #[tokio::test]
    async fn test_supabase_authenticator_resolves_user_id() {
        let server = MockServer::start_async().await;
        let user_id = Uuid::new_v4();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/auth/v1/user")
                    .header("apikey", "anon")
                    .header("authorization", "Bearer good-token");
                then.status(200)
                    .json_body(json!({"id": user_id, "email": "jane@example.com"}));
            })
            .await;

        let auth = SupabaseAuthenticator::new(&server.base_url(), "anon".to_string()).unwrap();
        let resolved = auth.authenticate("good-token").await.unwrap();

        mock.assert_async().await;
        assert_eq!(resolved, user_id);
    }

    #[tokio::test]
    async fn test_supabase_authenticator_rejects_bad_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/v1/user");
                then.status(401).json_body(json!({"msg": "invalid JWT"}));
            })
            .await;

        let auth = SupabaseAuthenticator::new(&server.base_url(), "anon".to_string()).unwrap();
        assert!(matches!(
            auth.authenticate("expired").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
