//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, auth, rate limiting)
//! - Bind server to listener
//! - Shut down gracefully on signal or broadcast

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{track_request, UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown_signal;
use crate::security::{auth_middleware, rate_limit_middleware, Authenticator, RateLimiter};
use crate::service::EmployeeService;
use crate::upstream::{ClientBuildError, EmployeeUpstream, UpstreamClient};

/// Base path of the employee API.
pub const API_BASE: &str = "/api/v1/employee";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: EmployeeService,
}

/// HTTP server for the employee API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server talking to the upstream named in `config`.
    pub fn new(config: ServiceConfig) -> Result<Self, ClientBuildError> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server over any upstream implementation.
    pub fn with_upstream(config: ServiceConfig, upstream: Arc<dyn EmployeeUpstream>) -> Self {
        let state = AppState {
            service: EmployeeService::new(upstream),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let authenticator = Arc::new(Authenticator::new(&config.auth));

        let mut api = Router::new()
            .route(API_BASE, get(handlers::list_employees).post(handlers::create_employee))
            .route(&format!("{API_BASE}/highestSalary"), get(handlers::highest_salary))
            .route(
                &format!("{API_BASE}/topTenHighestEarningEmployeeNames"),
                get(handlers::top_earners),
            )
            .route(&format!("{API_BASE}/search"), get(handlers::search_employees_by_query))
            .route(&format!("{API_BASE}/search/{{fragment}}"), get(handlers::search_employees))
            .route(
                &format!("{API_BASE}/{{id}}"),
                get(handlers::get_employee).delete(handlers::delete_employee),
            )
            .layer(middleware::from_fn_with_state(authenticator, auth_middleware));

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
            api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        Router::new()
            .route("/health", get(handlers::health))
            .merge(api)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(track_request))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process callers.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
