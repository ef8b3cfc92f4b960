/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for account
 * sessions. Claims carry the account id, email, username, and kind so
 * the middleware can rebuild an `Actor` without a database round trip.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Username
    pub username: String,
    /// Account kind ("user" | "org" | "admin")
    pub kind: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure development default");
        "change-me-in-production".to_string()
    })
}

/// Create a JWT token for an account
///
/// # Arguments
/// * `account_id` - Account ID (UUID)
/// * `email` - Account email
/// * `username` - Account username
/// * `kind` - Account kind
///
/// # Returns
/// JWT token string, valid for 30 days
pub fn create_token(
    account_id: Uuid,
    email: &str,
    username: &str,
    kind: AccountKind,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // Token expires in 30 days
    let exp = now + (30 * 24 * 60 * 60);

    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        username: username.to_string(),
        kind: kind.as_str().to_string(),
        exp,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let id = Uuid::new_v4();
        let token = create_token(id, "org@example.com", "helping_hands", AccountKind::Org)
            .expect("token creation should succeed");

        let claims = verify_token(&token).expect("token should verify");
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.email, "org@example.com");
        assert_eq!(claims.username, "helping_hands");
        assert_eq!(claims.kind, "org");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not-a-jwt").is_err());
    }
}
