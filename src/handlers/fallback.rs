use crate::core::error::ApiError;

/// Unknown endpoint handler, mounted as the router fallback.
pub async fn fallback_handler() -> ApiError {
    ApiError::UnknownEndpoint
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[tokio::test]
    async fn test_fallback_is_not_found() {
        let response = fallback_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
