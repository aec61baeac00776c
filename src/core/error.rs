// Centralized error handling for the notes API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the HTTP handlers.
///
/// Handlers propagate these with `?`; the single IntoResponse impl below is
/// the only place internal failures are translated to HTTP outcomes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed id")]
    MalformedId,

    #[error("{0}")]
    Validation(String),

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("unknown endpoint")]
    UnknownEndpoint,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Special case: a missing record answers with a bare 404, no body
        if matches!(self, ApiError::NotFound) {
            return StatusCode::NOT_FOUND.into_response();
        }

        if let ApiError::Internal(err) = &self {
            tracing::error!(error = %err, "Unhandled internal error");
        }

        let status = match &self {
            ApiError::MalformedId | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidToken
            | ApiError::TokenExpired
            | ApiError::InvalidCredentials
            | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound | ApiError::UnknownEndpoint => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MalformedId.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation("content missing".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::TokenExpired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::UnknownEndpoint.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
