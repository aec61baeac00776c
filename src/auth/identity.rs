//! Identity extraction from the Authorization header.

use crate::auth::token::validate_token;
use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::id::DocId;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

/// Requester identity resolved from a bearer token.
///
/// Used as an extractor by the mutating note handlers: the request is
/// rejected with 401 before the handler runs when the credential is missing,
/// malformed, expired, or no longer maps to a stored user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: DocId,
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::InvalidToken)?;

        let claims = validate_token(token.trim(), &state.config.auth.token_secret)?;

        // The token may outlive the account; resolve against the store.
        let user = state
            .user_store
            .get(claims.id)
            .ok_or(ApiError::InvalidToken)?;

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::create_token;
    use crate::core::config::Config;
    use crate::models::user::User;
    use crate::wal::wal::Wal;
    use axum::http::Request;
    use tempfile::TempDir;

    fn test_state(tmp: &TempDir) -> Arc<AppState> {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 3001

            [storage]

            [auth]
            token_secret = "sekret"

            [logging]
        "#,
        )
        .unwrap();

        let wal = Wal::new(tmp.path().join("test.wal")).unwrap();
        Arc::new(AppState::new(config, wal))
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/notes");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_extracts_known_user() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp);

        let user = User::new("admin".to_string(), "Admin".to_string(), "h".to_string());
        let user_id = user.id;
        state.user_store.insert(user.clone());

        let token = create_token(&user, "sekret", 24).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));

        let identity = AuthenticatedUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(identity.id, user_id);
        assert_eq!(identity.username, "admin");
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp);

        let mut parts = parts_with_auth(None);
        let result = AuthenticatedUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp);

        let mut parts = parts_with_auth(Some("Basic YWRtaW46dG9wc2VjcmV0"));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(&tmp);

        // Never inserted into the store
        let ghost = User::new("ghost".to_string(), "Ghost".to_string(), "h".to_string());
        let token = create_token(&ghost, "sekret", 24).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }
}
