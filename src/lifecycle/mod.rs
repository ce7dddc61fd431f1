//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast to every subscriber → server drains and exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT or broadcast → graceful shutdown future resolves
//! ```
//!
//! # Design Decisions
//! - In-flight requests drain through axum's graceful shutdown
//! - Tests stop servers through the broadcast, never through signals

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
