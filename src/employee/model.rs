//! Employee records and the input accepted for creating them.
//!
//! Wire names follow the upstream employee service, which prefixes every
//! record field with `employee_` but accepts plain names on creation.

use serde::{Deserialize, Serialize};

use crate::employee::error::{EmployeeError, EmployeeResult, FieldViolation};

/// Youngest age accepted on creation.
pub const MIN_AGE: i64 = 16;
/// Oldest age accepted on creation.
pub const MAX_AGE: i64 = 75;

/// An employee record as held by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Upstream-assigned identifier.
    pub id: String,

    #[serde(rename = "employee_name")]
    pub name: String,

    #[serde(rename = "employee_salary")]
    pub salary: i64,

    #[serde(rename = "employee_age")]
    pub age: i64,

    #[serde(rename = "employee_title")]
    pub title: String,

    /// Assigned upstream; absent on some records.
    #[serde(rename = "employee_email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Request body for creating an employee.
///
/// Every field is optional on the wire so that missing and `null` values
/// reach [`validate`](Self::validate) and are reported with the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateEmployeeInput {
    pub name: Option<String>,
    pub salary: Option<i64>,
    pub age: Option<i64>,
    pub title: Option<String>,
}

/// A creation request that passed validation; the body sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub salary: i64,
    pub age: i64,
    pub title: String,
}

fn required_text(
    value: &Option<String>,
    field: &str,
    message: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            violations.push(FieldViolation::new(field, message));
            None
        }
    }
}

impl CreateEmployeeInput {
    /// Check every constraint, reporting all violations at once.
    pub fn validate(&self) -> EmployeeResult<NewEmployee> {
        let mut violations = Vec::new();

        let name = required_text(&self.name, "name", "Name is required", &mut violations);

        let salary = match self.salary {
            None => {
                violations.push(FieldViolation::new("salary", "Salary is required"));
                None
            }
            Some(s) if s <= 0 => {
                violations.push(FieldViolation::new("salary", "Salary must be positive"));
                None
            }
            Some(s) => Some(s),
        };

        let age = match self.age {
            None => {
                violations.push(FieldViolation::new("age", "Age is required"));
                None
            }
            Some(a) if a < MIN_AGE => {
                violations.push(FieldViolation::new(
                    "age",
                    format!("Age must be at least {MIN_AGE}"),
                ));
                None
            }
            Some(a) if a > MAX_AGE => {
                violations.push(FieldViolation::new(
                    "age",
                    format!("Age must be at most {MAX_AGE}"),
                ));
                None
            }
            Some(a) => Some(a),
        };

        let title = required_text(&self.title, "title", "Title is required", &mut violations);

        match (name, salary, age, title) {
            (Some(name), Some(salary), Some(age), Some(title)) => {
                Ok(NewEmployee {
                    name,
                    salary,
                    age,
                    title,
                })
            }
            _ => Err(EmployeeError::Validation(violations)),
        }
    }
}

/// Body of the upstream name-keyed delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEmployeeInput {
    pub name: String,
}
