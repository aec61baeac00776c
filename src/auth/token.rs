//! Bearer token management.

use crate::core::error::ApiError;
use crate::models::id::DocId;
use crate::models::user::User;
use crate::utils::time::current_timestamp;
use anyhow::anyhow;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Token claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username at issue time.
    pub username: String,
    /// Subject user id.
    pub id: DocId,
    /// Issued at (unix timestamp).
    pub iat: usize,
    /// Expiration time (unix timestamp).
    pub exp: usize,
}

/// Create a signed token for a user.
pub fn create_token(user: &User, secret: &str, expiry_hours: u64) -> Result<String, ApiError> {
    let now = current_timestamp();

    let claims = Claims {
        username: user.username.clone(),
        id: user.id,
        iat: now as usize,
        exp: (now + expiry_hours as i64 * 3600) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow!("Failed to create token: {}", e)))
}

/// Validate signature and expiry, returning the embedded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
