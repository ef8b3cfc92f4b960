/**
 * Huddle — Community Events Platform Backend
 *
 * REST API over PostgreSQL for users and organizations that create and
 * discover events, follow organizations, attend and volunteer, chat,
 * donate, and collaborate between organizations.
 *
 * # Architecture
 *
 * - `server`     - Configuration, shared state, app assembly
 * - `routes`     - Axum router and route tables
 * - `error`      - Domain error taxonomy and HTTP conversion
 * - `auth`       - Accounts (user/org/admin), sessions, signup/login
 * - `middleware` - Bearer-token authentication middleware and extractor
 * - `events`     - Event CRUD and ownership rules
 * - `collab`     - Collaboration request state machine
 * - `follow`     - Follow edges and follower/following counters
 * - `attendance` - Attendance edges and the totalAttending counter
 * - `volunteer`  - Volunteer edges, approval flow, totalVolunteering
 * - `counters`   - Out-of-band counter reconciliation
 * - `cascade`    - Account deletion cascade across all collections
 * - `chat`       - Two-party conversations and message pagination
 * - `notify`     - Fire-and-forget notification dispatch and inbox
 * - `donations`  - Donation records keyed by external transaction id
 * - `reviews`    - Post-event reviews gated on participation
 */

pub mod attendance;
pub mod auth;
pub mod cascade;
pub mod chat;
pub mod collab;
pub mod counters;
pub mod donations;
pub mod error;
pub mod events;
pub mod follow;
pub mod middleware;
pub mod notify;
pub mod reviews;
pub mod routes;
pub mod server;
pub mod volunteer;
