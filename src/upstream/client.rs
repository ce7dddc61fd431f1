//! HTTP client for the upstream employee service.
//!
//! # Responsibilities
//! - Issue one request per operation against the upstream API
//! - Unwrap the response envelope into domain objects
//! - Translate transport and protocol failures into [`EmployeeError`]
//!
//! # Design Decisions
//! - No retries and no timeout beyond reqwest's defaults
//! - Deletion is keyed by name; reads are keyed by identifier
//! - The upstream status code is kept on protocol errors

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::employee::error::{EmployeeError, EmployeeResult, FieldViolation};
use crate::employee::model::{DeleteEmployeeInput, Employee, NewEmployee};
use crate::observability::metrics;
use crate::upstream::envelope::{decode_envelope, error_message};

/// Operations the orchestrator needs from the upstream service.
#[async_trait]
pub trait EmployeeUpstream: Send + Sync {
    /// Fetch every record.
    async fn list_all(&self) -> EmployeeResult<Vec<Employee>>;

    /// Fetch one record by identifier.
    async fn get_by_id(&self, id: &str) -> EmployeeResult<Employee>;

    /// Create a record from already-validated input.
    async fn create(&self, input: &NewEmployee) -> EmployeeResult<Employee>;

    /// Delete by name. `Ok(false)` when the upstream confirms nothing.
    async fn delete_by_name(&self, name: &str) -> EmployeeResult<bool>;
}

/// Errors raised while building the client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream base URL '{0}' cannot carry path segments")]
    NotABase(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// reqwest-backed [`EmployeeUpstream`].
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a client for the collection endpoint named in `config`.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::NotABase(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        tracing::info!(base_url = %base_url, "Upstream client initialized");
        Ok(Self { http, base_url })
    }

    fn item_url(&self, id: &str) -> EmployeeResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| EmployeeError::upstream(None, "base URL cannot carry an identifier"))?;
            segments.pop_if_empty().push(id);
        }
        Ok(url)
    }

    /// Send a request and buffer its body.
    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> EmployeeResult<(StatusCode, Vec<u8>)> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Upstream unreachable");
            EmployeeError::UpstreamUnavailable(e.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(operation, status = %status, error = %e, "Upstream body read failed");
            EmployeeError::UpstreamUnavailable(e.to_string())
        })?;

        tracing::debug!(operation, status = %status, bytes = body.len(), "Upstream responded");
        Ok((status, body.to_vec()))
    }
}

/// Decode a successful body, or turn a non-success status into an error.
fn unwrap_success<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> EmployeeResult<T> {
    if status.is_success() {
        decode_envelope(body)
    } else {
        Err(status_error(status, body))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> EmployeeError {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });
    EmployeeError::upstream(Some(status.as_u16()), message)
}

/// Record the outcome of an upstream call and pass the result through.
fn observe<T>(operation: &'static str, result: EmployeeResult<T>) -> EmployeeResult<T> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(EmployeeError::NotFound(_)) => "not_found",
        Err(EmployeeError::Validation(_)) => "rejected",
        Err(EmployeeError::Upstream { .. }) => "error",
        Err(EmployeeError::UpstreamUnavailable(_)) => "unavailable",
    };
    if let Err(e @ EmployeeError::Upstream { .. }) = &result {
        tracing::warn!(operation, error = %e, "Upstream call failed");
    }
    metrics::record_upstream_call(operation, outcome);
    result
}

#[async_trait]
impl EmployeeUpstream for UpstreamClient {
    async fn list_all(&self) -> EmployeeResult<Vec<Employee>> {
        let result = async {
            let (status, body) = self
                .send("list_all", self.http.get(self.base_url.clone()))
                .await?;
            unwrap_success(status, &body)
        }
        .await;
        observe("list_all", result)
    }

    async fn get_by_id(&self, id: &str) -> EmployeeResult<Employee> {
        let result = async {
            let url = self.item_url(id)?;
            let (status, body) = self.send("get_by_id", self.http.get(url)).await?;
            if status == StatusCode::NOT_FOUND {
                return Err(EmployeeError::NotFound(id.to_string()));
            }
            unwrap_success(status, &body)
        }
        .await;
        observe("get_by_id", result)
    }

    async fn create(&self, input: &NewEmployee) -> EmployeeResult<Employee> {
        let result = async {
            let request = self.http.post(self.base_url.clone()).json(input);
            let (status, body) = self.send("create", request).await?;
            if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
                let message = error_message(&body)
                    .unwrap_or_else(|| "rejected by upstream".to_string());
                return Err(EmployeeError::Validation(vec![FieldViolation::new(
                    "employee", message,
                )]));
            }
            unwrap_success(status, &body)
        }
        .await;
        observe("create", result)
    }

    async fn delete_by_name(&self, name: &str) -> EmployeeResult<bool> {
        let result = async {
            let body = DeleteEmployeeInput {
                name: name.to_string(),
            };
            let request = self.http.delete(self.base_url.clone()).json(&body);
            let (status, body) = self.send("delete_by_name", request).await?;
            if status == StatusCode::NOT_FOUND {
                return Ok(false);
            }
            unwrap_success(status, &body)
        }
        .await;
        observe("delete_by_name", result)
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
