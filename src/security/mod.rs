//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming API request:
//!     → rate_limit.rs (per-IP token bucket)
//!     → auth.rs (Basic credentials → Principal)
//!     → handler (RequireAdmin for writes)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Limiter state belongs to the HTTP layer, not the core
//! - `/health` sits outside both checks

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, Authenticator, Principal, RequireAdmin};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
