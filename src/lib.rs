//! Employee API facade library.
//!
//! A REST facade over an external employee data service: requests are
//! proxied upstream, envelopes unwrapped, and small aggregations (name
//! search, highest salary, top earners) computed in memory.

pub mod config;
pub mod employee;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod service;
pub mod upstream;

pub use config::ServiceConfig;
pub use employee::{CreateEmployeeInput, Employee, EmployeeError, NewEmployee};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::EmployeeService;
