//! In-process API client for integration testing.
//!
//! Executes requests directly against the router without binding a socket.
//! The router (and its session store) is built once per client, so tokens
//! stay valid across calls on the same client.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server_core::kernel::NoopMailer;
use server_core::server::build_app;
use sqlx::PgPool;
use tower::ServiceExt;

pub struct ApiClient {
    app: Router,
}

/// Result of an API call: status plus the parsed JSON body (Null for empty
/// responses).
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Gets a value at the given JSON path.
    ///
    /// # Example
    /// ```ignore
    /// let title = response.get("data.title");
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let mut current = &self.body;
        for key in path.split('.') {
            current = match key.parse::<usize>() {
                Ok(index) => &current[index],
                Err(_) => &current[key],
            };
        }
        current.clone()
    }

    /// The `error` field of an error body.
    pub fn error(&self) -> String {
        self.body["error"].as_str().unwrap_or_default().to_string()
    }
}

impl ApiClient {
    pub fn new(pool: PgPool) -> Self {
        Self {
            app: build_app(pool, Arc::new(NoopMailer), Vec::new()),
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> ApiResponse {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> ApiResponse {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> ApiResponse {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> ApiResponse {
        self.request(Method::DELETE, path, token, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        ApiResponse { status, body }
    }
}
