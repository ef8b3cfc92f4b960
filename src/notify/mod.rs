//! Notification Dispatch and Inbox
//!
//! State transitions elsewhere in the system (collaboration lifecycle,
//! donations, volunteer approval) produce inbox entries for the
//! affected account. Dispatch is fire-and-forget: drafts are queued on
//! a channel after the primary transaction commits, and a worker task
//! persists them. A failed insert is logged and never propagates into
//! the request that triggered it.
//!
//! - **`model`** - Notification record and the closed type enum
//! - **`dispatch`** - The `Notifier` queue and its worker task
//! - **`db`** - Inbox queries (list, mark read)
//! - **`handlers`** - Inbox endpoints

pub mod db;
pub mod dispatch;
pub mod handlers;
pub mod model;

pub use dispatch::{Notifier, NotificationDraft};
pub use model::{Notification, NotificationKind};
