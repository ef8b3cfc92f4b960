/**
 * Auth Handlers
 *
 * - `POST   /api/auth/signup` - Register a user or organization
 * - `POST   /api/auth/login` - Authenticate, returns a JWT
 * - `GET    /api/auth/me` - Current account profile
 * - `DELETE /api/auth/me` - Delete my account (full cascade)
 *
 * Login is a single lookup by email on the unified accounts table; the
 * stored kind drives everything downstream.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};

use crate::auth::accounts::{self, Account, AccountKind};
use crate::auth::sessions::create_token;
use crate::cascade;
use crate::error::ApiError;
use crate::middleware::AuthActor;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// "user" | "org"
    pub kind: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account: Account,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// 3-30 chars, starts with a letter, then letters/digits/underscores
fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return false;
    }
    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_signup(request: &SignupRequest) -> Result<AccountKind, ApiError> {
    let kind = AccountKind::parse(&request.kind)
        .filter(|k| *k != AccountKind::Admin)
        .ok_or_else(|| ApiError::validation("kind must be 'user' or 'org'"))?;

    if !is_valid_username(&request.username) {
        return Err(ApiError::validation(
            "Username must be 3-30 characters, start with a letter, and contain only letters, digits, and underscores",
        ));
    }
    if !request.email.contains('@') {
        return Err(ApiError::validation("A valid email address is required"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    Ok(kind)
}

/// Register a new user or organization
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let kind = validate_signup(&request)?;

    if accounts::get_account_by_email(&state.db_pool, &request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Email is already registered"));
    }
    if accounts::get_account_by_username(&state.db_pool, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Username is already taken"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("password hashing failed: {:?}", e);
        ApiError::validation("Unable to process password")
    })?;

    let display_name = if request.display_name.trim().is_empty() {
        request.username.clone()
    } else {
        request.display_name.trim().to_string()
    };

    // The unique constraints backstop the pre-checks under races.
    let account = accounts::create_account(
        &state.db_pool,
        kind,
        &request.username,
        &request.email,
        &password_hash,
        &display_name,
    )
    .await?;

    let token = create_token(account.id, &account.email, &account.username, kind)
        .map_err(|e| {
            tracing::error!("token creation failed: {:?}", e);
            ApiError::unauthorized("Unable to create session")
        })?;

    tracing::info!(
        account_id = %account.id,
        kind = kind.as_str(),
        username = %account.username,
        "account created"
    );

    Ok((StatusCode::CREATED, Json(AuthResponse { token, account })))
}

/// Authenticate by email and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let account = accounts::get_account_by_email(&state.db_pool, &request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let valid = verify(&request.password, &account.password_hash).map_err(|e| {
        tracing::error!("password verification error: {:?}", e);
        ApiError::unauthorized("Invalid email or password")
    })?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let kind = account
        .account_kind()
        .ok_or_else(|| ApiError::unauthorized("Unknown account kind"))?;

    let token = create_token(account.id, &account.email, &account.username, kind)
        .map_err(|e| {
            tracing::error!("token creation failed: {:?}", e);
            ApiError::unauthorized("Unable to create session")
        })?;

    tracing::info!(account_id = %account.id, "login succeeded");

    Ok(Json(AuthResponse { token, account }))
}

/// Current account profile
pub async fn me(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<Account>, ApiError> {
    let account = accounts::get_account_by_id(&state.db_pool, actor.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(account))
}

/// Delete my account and everything that depends on it
pub async fn delete_me(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> Result<Json<DeletedResponse>, ApiError> {
    cascade::delete_account(&state.db_pool, actor.id, actor.kind).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("helping_hands"));
        assert!(is_valid_username("org42"));
        assert!(is_valid_username("a_b"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("1alice"));
        assert!(!is_valid_username("_alice"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-ed"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }

    #[test]
    fn test_signup_validation_rejects_admin_kind() {
        let request = SignupRequest {
            kind: "admin".to_string(),
            username: "sneaky".to_string(),
            email: "sneaky@example.com".to_string(),
            password: "password123".to_string(),
            display_name: String::new(),
        };
        assert!(validate_signup(&request).is_err());
    }

    #[test]
    fn test_signup_validation_rejects_short_password() {
        let request = SignupRequest {
            kind: "user".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
            display_name: String::new(),
        };
        assert!(validate_signup(&request).is_err());
    }
}
