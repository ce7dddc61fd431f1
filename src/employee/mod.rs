//! Employee domain subsystem.
//!
//! # Data Flow
//! ```text
//! upstream payload (Envelope<T>)
//!     → model.rs (Employee, CreateEmployeeInput → NewEmployee)
//!     → query.rs (search / max salary / top-k, in memory)
//!     → serialized back to the caller
//! ```
//!
//! # Design Decisions
//! - Records are request-scoped copies; the upstream service owns them
//! - Query functions are total and never fail
//! - Failure kinds are variants, never strings

pub mod error;
pub mod model;
pub mod query;

pub use error::{EmployeeError, EmployeeResult, FieldViolation};
pub use model::{CreateEmployeeInput, DeleteEmployeeInput, Employee, NewEmployee};
