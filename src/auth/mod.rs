//! Accounts and Authentication
//!
//! - **`accounts`** - The unified account model (user/org/admin) and
//!   its database operations
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - Signup, login, me, and account deletion endpoints

pub mod accounts;
pub mod handlers;
pub mod sessions;

pub use accounts::{Account, AccountKind};
