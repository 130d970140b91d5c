//! Recording mock transport for testing. Makes no network calls.
//!
//! Queue responses up front, hand the mock to the client builder, then
//! assert on the requests the client sent.
//!
//! ```no_run
//! use std::sync::Arc;
//! use integrate_rs::client::IntegrateClient;
//! use integrate_rs::mock::MockTransport;
//!
//! # fn main() -> integrate_rs::Result<()> {
//! let mock = Arc::new(MockTransport::new());
//! mock.push_json(serde_json::json!({ "status": "SUCCESS", "orders": [] }));
//!
//! let client = IntegrateClient::builder().transport(mock.clone()).build()?;
//! // client.get_orders().await?;
//! assert_eq!(mock.call_count(), 0);
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use reqwest::StatusCode;

use crate::error::{IntegrateError, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// A [`Transport`] that replays queued responses in FIFO order and records
/// every request it receives.
///
/// When the queue is empty the mock answers `501 Not Implemented`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary response.
    pub fn push_response(&self, response: HttpResponse) {
        lock(&self.responses).push_back(response);
    }

    /// Queue a `200 OK` response with an `application/json` body.
    pub fn push_json(&self, body: serde_json::Value) {
        self.push_json_with_status(StatusCode::OK, body);
    }

    /// Queue an `application/json` response with the given status.
    pub fn push_json_with_status(&self, status: StatusCode, body: serde_json::Value) {
        self.push_body(status, "application/json", body.to_string());
    }

    /// Queue a `200 OK` response with a `text/csv` body.
    pub fn push_csv(&self, body: impl Into<String>) {
        self.push_body(StatusCode::OK, "text/csv", body.into());
    }

    /// Queue a `200 OK` response with a `text/plain` body.
    pub fn push_text(&self, body: impl Into<String>) {
        self.push_body(StatusCode::OK, "text/plain", body.into());
    }

    /// Queue a response with raw bytes and the given content type.
    pub fn push_bytes(&self, content_type: &str, body: impl Into<Bytes>) {
        self.push_response(HttpResponse {
            status: StatusCode::OK,
            content_type: Some(content_type.to_owned()),
            body: body.into(),
        });
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// The most recent request's body decoded as JSON.
    pub fn last_json_body(&self) -> Option<serde_json::Value> {
        let requests = lock(&self.requests);
        let body = requests.last()?.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }

    fn push_body(&self, status: StatusCode, content_type: &str, body: String) {
        self.push_response(HttpResponse {
            status,
            content_type: Some(content_type.to_owned()),
            body: Bytes::from(body),
        });
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        lock(&self.requests).push(request);
        let next = lock(&self.responses).pop_front();
        Box::pin(async move {
            next.ok_or_else(|| IntegrateError::HttpStatus {
                status: StatusCode::NOT_IMPLEMENTED,
                body: "no mock response queued".into(),
            })
        })
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
