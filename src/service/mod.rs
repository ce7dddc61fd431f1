//! Request orchestration.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → employees.rs (one method per operation)
//!     → upstream adapter (live fetch, every call)
//!     → employee::query (in-memory aggregation)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing is cached between calls
//! - Adapter failures pass through unchanged

pub mod employees;

pub use employees::{EmployeeService, TOP_EARNERS_LIMIT};
