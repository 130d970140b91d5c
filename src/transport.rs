//! HTTP transport used by the dispatcher.
//!
//! The [`Transport`] trait is the only place the client touches the network.
//! [`ReqwestTransport`] is the production implementation; tests swap in
//! [`MockTransport`](crate::mock::MockTransport) through
//! [`IntegrateClientBuilder::transport`](crate::client::IntegrateClientBuilder::transport).

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use reqwest::header::{self, HeaderMap};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::error::Result;

/// A fully prepared HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Encoded body; only set for write methods.
    pub body: Option<Bytes>,
}

/// A raw HTTP response, body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// The media type without parameters, lower-cased (`"application/json"`
    /// for `"application/json; charset=utf-8"`).
    pub fn media_type(&self) -> String {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|essence| essence.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Sends one [`HttpRequest`] and returns the raw [`HttpResponse`].
///
/// Implementations must not interpret the body or the status code.
pub trait Transport: fmt::Debug + Send + Sync {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout and optional proxy
    /// applied to every scheme.
    pub fn new(timeout: Duration, proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        Box::pin(async move {
            let mut builder = self
                .http
                .request(request.method, request.url)
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let resp = builder.send().await?;
            let status = resp.status();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = resp.bytes().await?;

            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}
