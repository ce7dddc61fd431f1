//! Employee API handlers.
//!
//! Each handler maps one route onto one [`EmployeeService`] operation.
//!
//! [`EmployeeService`]: crate::service::EmployeeService

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::employee::{CreateEmployeeInput, Employee};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::security::RequireAdmin;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

pub async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
    tracing::info!("Getting all employees");
    Ok(Json(state.service.list_all().await?))
}

pub async fn search_employees(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    tracing::info!(fragment = %fragment, "Searching employees");
    Ok(Json(state.service.search(&fragment).await?))
}

/// Query string of `/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `/search?q=<fragment>`. The path form cannot carry an empty fragment;
/// here an absent or empty `q` matches every record.
pub async fn search_employees_by_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    tracing::info!(fragment = %params.q, "Searching employees");
    Ok(Json(state.service.search(&params.q).await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    tracing::info!(id = %id, "Getting employee");
    Ok(Json(state.service.get(&id).await?))
}

pub async fn highest_salary(State(state): State<AppState>) -> Result<Json<i64>, ApiError> {
    tracing::info!("Getting highest salary");
    Ok(Json(state.service.max_salary().await?))
}

pub async fn top_earners(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    tracing::info!("Getting top earners");
    Ok(Json(state.service.top_earners().await?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    payload: Result<Json<CreateEmployeeInput>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::MalformedBody {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    // Invalid input never reaches the upstream service.
    let employee = input.validate()?;

    tracing::info!(user = %principal.username, name = %employee.name, "Creating employee");
    Ok(Json(state.service.create(&employee).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    tracing::info!(user = %principal.username, id = %id, "Deleting employee");
    let name = state.service.delete(&id).await.inspect_err(|e| {
        tracing::error!(id = %id, error = %e, "Failed to delete employee");
    })?;
    Ok(name)
}
