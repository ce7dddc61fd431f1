//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map core failure kinds to HTTP status codes
//! - Render error bodies as JSON
//!
//! # Design Decisions
//! - Upstream 429 passes through; other upstream failures become 502
//! - Unreachable upstream results in 503 Service Unavailable
//! - Upstream detail is logged, never returned to the client

use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::employee::EmployeeError;

/// Every failure a handler or middleware can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Employee(#[from] EmployeeError),

    /// The body could not be read or decoded.
    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("Authentication required")]
    Unauthorized { realm: String },

    #[error("Access denied")]
    Forbidden,

    #[error("Rate limit exceeded")]
    RateLimited,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Employee(e) => match e {
                EmployeeError::NotFound(_) => StatusCode::NOT_FOUND,
                EmployeeError::Validation(_) => StatusCode::BAD_REQUEST,
                EmployeeError::Upstream {
                    status: Some(429), ..
                } => StatusCode::TOO_MANY_REQUESTS,
                EmployeeError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                EmployeeError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let body = match &self {
            ApiError::Employee(EmployeeError::Validation(violations)) => {
                let fields: BTreeMap<&str, &str> = violations
                    .iter()
                    .map(|v| (v.field.as_str(), v.message.as_str()))
                    .collect();
                json!(fields)
            }
            ApiError::Employee(EmployeeError::Upstream { .. }) => {
                json!({ "error": "External service error" })
            }
            ApiError::Employee(EmployeeError::UpstreamUnavailable(_)) => {
                json!({ "error": "External service unavailable" })
            }
            other => json!({ "error": other.to_string() }),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::Unauthorized { realm } = &self {
            if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")) {
                response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}
