/**
 * Account Model and Database Operations
 *
 * Users, organizations, and admins share one `accounts` table with a
 * `kind` discriminant. Username and email are unique across all kinds,
 * so resolving an account is a single indexed lookup followed by a
 * dispatch on the stored discriminant — never a sequence of per-kind
 * existence probes.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Account discriminant stored in the `kind` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    User,
    Org,
    Admin,
}

impl AccountKind {
    /// Stable string form used in the database and JWT claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Org => "org",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "org" => Some(Self::Org),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Account record as stored in the database
///
/// The counters are denormalized: `followers_count` is meaningful for
/// organizations, `following_count` for users. Both are maintained by
/// the follow module and repairable via the counters module.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    /// Discriminant: "user" | "org" | "admin"
    pub kind: String,
    /// Unique across all account kinds
    pub username: String,
    /// Unique across all account kinds
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub bio: String,
    /// Organization verification state
    pub verified: bool,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Typed view of the stored discriminant
    pub fn account_kind(&self) -> Option<AccountKind> {
        AccountKind::parse(&self.kind)
    }
}

/// Create a new account
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `kind` - Account kind (user or org; admins are seeded out of band)
/// * `username` - Unique username
/// * `email` - Unique email
/// * `password_hash` - bcrypt hash
/// * `display_name` - Profile display name
///
/// # Errors
/// A unique-key violation on username or email surfaces as `Conflict`.
pub async fn create_account(
    pool: &PgPool,
    kind: AccountKind,
    username: &str,
    email: &str,
    password_hash: &str,
    display_name: &str,
) -> Result<Account, ApiError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (id, kind, username, email, password_hash, display_name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(kind.as_str())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(display_name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

/// Get account by email
pub async fn get_account_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get account by username
pub async fn get_account_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Get account by ID
pub async fn get_account_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get an account that must be an organization
///
/// # Errors
/// * `NotFound` if no account exists with this id
/// * `Validation` if the account exists but is not an organization
pub async fn get_org_by_id(pool: &PgPool, id: Uuid) -> Result<Account, ApiError> {
    let account = get_account_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    if account.account_kind() != Some(AccountKind::Org) {
        return Err(ApiError::validation("Account is not an organization"));
    }

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [AccountKind::User, AccountKind::Org, AccountKind::Admin] {
            assert_eq!(AccountKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        assert_eq!(AccountKind::parse("organization"), None);
        assert_eq!(AccountKind::parse(""), None);
        assert_eq!(AccountKind::parse("User"), None);
    }
}
