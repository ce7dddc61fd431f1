//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use employee_api::config::ServiceConfig;
use employee_api::employee::{DeleteEmployeeInput, Employee, NewEmployee};
use employee_api::{HttpServer, Shutdown};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const ADMIN: (&str, &str) = ("admin", "secure123");
pub const USER: (&str, &str) = ("user", "user123");

pub fn employee(id: &str, name: &str, salary: i64) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        salary,
        age: 35,
        title: "Engineer".to_string(),
        email: Some(format!("{}@company.com", name.to_lowercase().replace(' ', "."))),
    }
}

/// State behind the mock upstream employee service.
#[derive(Default)]
pub struct MockState {
    pub employees: Mutex<Vec<Employee>>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl MockState {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1/employee", self.addr)
    }
}

async fn list(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    let employees = state.employees.lock().unwrap().clone();
    Json(json!({ "data": employees, "status": "Successfully processed request." }))
}

async fn get_one(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> impl IntoResponse {
    let found = state
        .employees
        .lock()
        .unwrap()
        .iter()
        .find(|e| e.id == id)
        .cloned();
    match found {
        Some(e) => (
            StatusCode::OK,
            Json(json!({ "data": e, "status": "Successfully processed request." })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "Failed to process request.", "error": "Not found" })),
        ),
    }
}

async fn create(
    State(state): State<Arc<MockState>>,
    Json(input): Json<NewEmployee>,
) -> impl IntoResponse {
    state.create_calls.fetch_add(1, Ordering::SeqCst);
    let mut employees = state.employees.lock().unwrap();
    let created = Employee {
        id: format!("gen-{}", employees.len() + 1),
        name: input.name.clone(),
        salary: input.salary,
        age: input.age,
        title: input.title.clone(),
        email: Some(format!("{}@company.com", input.name.to_lowercase().replace(' ', "."))),
    };
    employees.push(created.clone());
    Json(json!({ "data": created, "status": "Successfully processed request." }))
}

async fn delete(
    State(state): State<Arc<MockState>>,
    Json(input): Json<DeleteEmployeeInput>,
) -> impl IntoResponse {
    state.delete_calls.fetch_add(1, Ordering::SeqCst);
    let mut employees = state.employees.lock().unwrap();
    let before = employees.len();
    employees.retain(|e| e.name != input.name);
    let deleted = employees.len() < before;
    Json(json!({ "data": deleted, "status": "Successfully processed request." }))
}

/// Start an in-memory employee service speaking the upstream envelope format.
pub async fn start_mock_upstream(employees: Vec<Employee>) -> MockUpstream {
    let state = Arc::new(MockState {
        employees: Mutex::new(employees),
        ..Default::default()
    });

    let app = Router::new()
        .route("/api/v1/employee", get(list).post(create).delete(delete))
        .route("/api/v1/employee/{id}", get(get_one))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

/// Start a raw backend whose every response comes from `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                // Drain the request head (and any small body) before answering.
                let mut buf = [0u8; 4096];
                let _ = tokio::time::timeout(Duration::from_millis(200), socket.read(&mut buf)).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running employee API.
pub struct TestApi {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestApi {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the API against `upstream_base`, with rate limiting off unless
/// `configure` turns it on.
pub async fn start_api(upstream_base: &str, configure: impl FnOnce(&mut ServiceConfig)) -> TestApi {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream_base.to_string();
    config.rate_limit.enabled = false;
    config.observability.metrics_enabled = false;
    configure(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).expect("server should build");
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestApi { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
