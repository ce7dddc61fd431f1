//! Upstream employee service integration.
//!
//! # Data Flow
//! ```text
//! orchestrator call
//!     → client.rs (one HTTP request, no retries)
//!     → envelope.rs (unwrap { data, status })
//!     → Employee / Vec<Employee> / bool, or EmployeeError
//! ```

pub mod client;
pub mod envelope;

pub use client::{ClientBuildError, EmployeeUpstream, UpstreamClient};
pub use envelope::{decode_envelope, Envelope};
