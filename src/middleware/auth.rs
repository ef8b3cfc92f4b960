/**
 * Authentication Middleware
 *
 * Protects routes that require an authenticated account. Extracts and
 * verifies the JWT from the Authorization header and attaches an
 * `Actor` to request extensions for handlers to consume.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::accounts::AccountKind;
use crate::auth::sessions::verify_token;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated account data extracted from the JWT token
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: Uuid,
    pub kind: AccountKind,
    pub username: String,
    pub email: String,
}

impl Actor {
    pub fn is_user(&self) -> bool {
        self.kind == AccountKind::User
    }

    pub fn is_org(&self) -> bool {
        self.kind == AccountKind::Org
    }

    pub fn is_admin(&self) -> bool {
        self.kind == AccountKind::Admin
    }
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the JWT from the Authorization header
/// 2. Verifies the token
/// 3. Rebuilds the `Actor` from the claims
/// 4. Verifies the account still exists in the database
/// 5. Attaches the actor to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            ApiError::unauthorized("Missing Authorization header")
        })?;

    // Format: "Bearer <token>"
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        ApiError::unauthorized("Invalid Authorization header format")
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid account id in token"))?;
    let kind = AccountKind::parse(&claims.kind)
        .ok_or_else(|| ApiError::unauthorized("Invalid account kind in token"))?;

    // Tokens outlive accounts; reject if the account has been deleted
    let exists = crate::auth::accounts::get_account_by_id(&state.db_pool, id)
        .await?
        .is_some();
    if !exists {
        tracing::warn!(account_id = %id, "Token for deleted account");
        return Err(ApiError::unauthorized("Account no longer exists"));
    }

    request.extensions_mut().insert(Actor {
        id,
        kind,
        username: claims.username,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated actor
///
/// Used as a handler parameter to pull the `Actor` placed in request
/// extensions by `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthActor(pub Actor);

impl axum::extract::FromRequestParts<AppState> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = parts.extensions.get::<Actor>().cloned().ok_or_else(|| {
            tracing::warn!("Actor not found in request extensions");
            ApiError::unauthorized("Authentication required")
        })?;

        Ok(AuthActor(actor))
    }
}
