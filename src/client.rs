//! Core HTTP client for the Integrate REST API.
//!
//! The [`IntegrateClient`] struct is the main entry point. It owns the
//! [`Session`], a [`Transport`], and the instrument master, and provides the
//! generic dispatcher ([`IntegrateClient::send`]) every operation funnels
//! through.
//!
//! API endpoint methods are added to `IntegrateClient` via `impl` blocks in
//! the [`crate::api`] module.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use url::Url;

use crate::constants::{SESSION_EXPIRED_MESSAGE, SYMBOLS_FILE_NAME, routes};
use crate::error::{ApiErrorBody, IntegrateError, Result};
use crate::session::{Session, SessionKeys, ValidValues};
use crate::symbols::SymbolMaster;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Callback invoked when the API reports `Session Expired`.
pub type SessionExpiredCallback = Arc<dyn Fn() + Send + Sync>;

// ---------------------------------------------------------------------------
// ApiRequest
// ---------------------------------------------------------------------------

/// One request for the dispatcher: base URL, route template, method, and
/// the optional parameter groups.
///
/// A JSON body takes precedence over a form body when both are set; either
/// is only sent for write methods (`POST`, `PUT`, `PATCH`).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    base: String,
    route: String,
    url_params: Vec<(String, String)>,
    json: Option<Value>,
    form: Option<Vec<(String, String)>>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, base: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            method,
            base: base.into(),
            route: route.into(),
            url_params: Vec::new(),
            json: None,
            form: None,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get(base: impl Into<String>, route: impl Into<String>) -> Self {
        Self::new(Method::GET, base, route)
    }

    pub fn post(base: impl Into<String>, route: impl Into<String>) -> Self {
        Self::new(Method::POST, base, route)
    }

    /// Value for a `{name}` placeholder in the route template.
    pub fn url_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.url_params.push((name.into(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a url-encoded form body.
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.form = Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        );
        self
    }

    /// Append a query-string parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add an extra request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The route template, before placeholder substitution.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The route with every `{name}` placeholder substituted.
    pub fn resolved_route(&self) -> String {
        self.url_params
            .iter()
            .fold(self.route.clone(), |route, (name, value)| {
                route.replace(&format!("{{{name}}}"), value)
            })
    }

    fn is_write(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`IntegrateClient`].
///
/// ```no_run
/// use std::time::Duration;
/// use integrate_rs::client::IntegrateClient;
///
/// # fn main() -> integrate_rs::Result<()> {
/// let client = IntegrateClient::builder()
///     .timeout(Duration::from_secs(5))
///     .logging(true)
///     .on_session_expired(|| eprintln!("session expired, log in again"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct IntegrateClientBuilder {
    session: Session,
    transport: Option<Arc<dyn Transport>>,
    symbols_path: Option<PathBuf>,
    on_session_expired: Option<SessionExpiredCallback>,
}

impl IntegrateClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the login and token endpoints.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.session.login_url = trim_url(url.into());
        self
    }

    /// Base URL of the trading REST API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.session.base_url = trim_url(url.into());
        self
    }

    /// Base URL of the historical data service.
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.session.data_url = trim_url(url.into());
        self
    }

    /// Location of the zipped instrument master.
    pub fn symbols_url(mut self, url: impl Into<String>) -> Self {
        self.session.symbols_url = url.into();
        self
    }

    /// Where the extracted instrument master is cached. Defaults to
    /// `allmaster.csv` in the system temp directory.
    pub fn symbols_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.symbols_path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.session.timeout = timeout;
        self
    }

    /// Route every request through this proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.session.proxy = Some(proxy.into());
        self
    }

    /// Log request payloads and raw response bodies at `info` level.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.session.logging = enabled;
        self
    }

    /// Restrict the enumerated values accepted by validation.
    pub fn valid_values(mut self, valid: ValidValues) -> Self {
        self.session.valid = valid;
        self
    }

    /// Replace the HTTP transport (e.g. with a
    /// [`MockTransport`](crate::mock::MockTransport)).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Register a callback run when the API reports `Session Expired`.
    pub fn on_session_expired<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_session_expired = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Result<IntegrateClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(
                self.session.timeout,
                self.session.proxy.as_deref(),
            )?),
        };
        let symbols_path = self
            .symbols_path
            .unwrap_or_else(|| std::env::temp_dir().join(SYMBOLS_FILE_NAME));
        let symbols = SymbolMaster::new(self.session.symbols_url.clone(), symbols_path);
        let (symbols_ready_tx, symbols_ready_rx) = mpsc::channel(1);

        Ok(IntegrateClient {
            transport,
            session: self.session,
            on_session_expired: self.on_session_expired,
            symbols,
            symbols_ready_tx,
            symbols_ready_rx: Some(symbols_ready_rx),
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Core client for the Integrate REST API.
///
/// # Example
///
/// ```no_run
/// use integrate_rs::client::IntegrateClient;
///
/// # #[tokio::main]
/// # async fn main() -> integrate_rs::Result<()> {
/// let mut client = IntegrateClient::new()?;
/// client.login("api-token", "api-secret", Some("123456")).await?;
/// let holdings = client.get_holdings().await?;
/// # Ok(())
/// # }
/// ```
pub struct IntegrateClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) session: Session,
    on_session_expired: Option<SessionExpiredCallback>,
    pub(crate) symbols: SymbolMaster,
    pub(crate) symbols_ready_tx: mpsc::Sender<()>,
    symbols_ready_rx: Option<mpsc::Receiver<()>>,
}

impl fmt::Debug for IntegrateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrateClient")
            .field("transport", &self.transport)
            .field("session", &self.session)
            .field("on_session_expired", &self.on_session_expired.is_some())
            .field("symbols", &self.symbols)
            .finish_non_exhaustive()
    }
}

impl IntegrateClient {
    /// Create a client with the default production URLs.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> IntegrateClientBuilder {
        IntegrateClientBuilder::new()
    }

    /// Returns the session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the keys issued by the last login (empty before login).
    pub fn session_keys(&self) -> &SessionKeys {
        self.session.keys()
    }

    /// Restore keys from an earlier session without logging in again.
    pub fn set_session_keys(&mut self, keys: SessionKeys) {
        self.session.set_keys(keys);
    }

    /// Register (or replace) the session-expiry callback.
    pub fn on_session_expired<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_session_expired = Some(Arc::new(callback));
    }

    /// Take the receiving end of the single-slot "symbols ready" signal.
    ///
    /// Every successful login posts one `()` if the slot is empty. Returns
    /// `None` once taken.
    pub fn take_symbols_ready(&mut self) -> Option<mpsc::Receiver<()>> {
        self.symbols_ready_rx.take()
    }

    // -----------------------------------------------------------------------
    // Dispatcher
    // -----------------------------------------------------------------------

    /// Send one request and return the decoded body.
    ///
    /// `application/json` bodies decode to a JSON value and `text/csv` bodies
    /// to `{"data": [[field, ..], ..]}`. Bodies reporting
    /// `"status": "ERROR"` become [`IntegrateError::Api`], or
    /// [`IntegrateError::SessionExpired`] after running the registered
    /// callback. Slice orders with a failed child become
    /// [`IntegrateError::SliceOrderRejected`].
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        let http = self.prepare(&request)?;
        let resp = self.transport.execute(http).await?;
        self.decode(request.route(), resp)
    }

    /// [`send`](Self::send), then deserialize the body into `R`.
    pub async fn send_typed<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(IntegrateError::Json)
    }

    /// GET a route of the trading API.
    pub async fn get<R: DeserializeOwned>(&self, route: &str) -> Result<R> {
        self.send_typed(ApiRequest::get(&self.session.base_url, route))
            .await
    }

    /// POST a JSON body to a route of the trading API.
    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<R> {
        self.send_typed(ApiRequest::post(&self.session.base_url, route).json(body)?)
            .await
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Build the transport-level request: URL, headers, encoded body.
    pub(crate) fn prepare(&self, req: &ApiRequest) -> Result<HttpRequest> {
        let mut url = Url::parse(&join_url(&req.base, &req.resolved_route()))?;
        if !req.query.is_empty() {
            url.query_pairs_mut().extend_pairs(req.query.iter());
        }

        let mut headers = HeaderMap::with_capacity(req.headers.len() + 2);
        for (name, value) in &req.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                    IntegrateError::InvalidArgument(format!("invalid header name `{name}`"))
                })?,
                header_value(name, value)?,
            );
        }
        if let Some(key) = self.session.api_session_key() {
            headers.insert(header::AUTHORIZATION, header_value("Authorization", key)?);
        }

        let body = if !req.is_write() {
            None
        } else if let Some(json) = &req.json {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            Some(Bytes::from(serde_json::to_vec(json)?))
        } else if let Some(form) = &req.form {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(form.iter())
                .finish();
            Some(Bytes::from(encoded))
        } else {
            None
        };

        tracing::debug!(method = %req.method, %url, "request");
        if self.session.logging {
            tracing::info!(
                method = %req.method,
                %url,
                query = ?req.query,
                json = ?req.json,
                form = ?req.form,
                extra_headers = ?req.headers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
                "Request"
            );
        }

        Ok(HttpRequest {
            method: req.method.clone(),
            url,
            headers,
            body,
        })
    }

    /// Decode a response and apply the uniform status checks.
    pub(crate) fn decode(&self, route: &str, resp: HttpResponse) -> Result<Value> {
        if self.session.logging {
            tracing::info!(
                status = %resp.status,
                body = %String::from_utf8_lossy(&resp.body),
                "Response"
            );
        }

        let data = match decode_body(&resp) {
            Ok(data) => data,
            Err(_) if !resp.status.is_success() => {
                return Err(IntegrateError::HttpStatus {
                    status: resp.status,
                    body: String::from_utf8_lossy(&resp.body).into_owned(),
                });
            }
            Err(e) => return Err(e),
        };

        self.check_status(route, data, resp.status)
    }

    fn check_status(&self, route: &str, data: Value, status: StatusCode) -> Result<Value> {
        let api_status = data
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match api_status.as_deref() {
            Some("ERROR") => {
                let err = ApiErrorBody::from_body(data);
                if err.message.as_deref() == Some(SESSION_EXPIRED_MESSAGE) {
                    if let Some(callback) = &self.on_session_expired {
                        callback();
                        tracing::warn!("Session expired. Callback called");
                        return Err(IntegrateError::SessionExpired(err));
                    }
                }
                return Err(IntegrateError::Api(err));
            }
            Some("SUCCESS") if route == routes::SLICE_ORDER => {
                if has_failed_child(&data) {
                    return Err(IntegrateError::SliceOrderRejected(
                        ApiErrorBody::from_body(data),
                    ));
                }
            }
            _ => {}
        }

        if !status.is_success() {
            return Err(IntegrateError::HttpStatus {
                status,
                body: data.to_string(),
            });
        }
        Ok(data)
    }
}

/// Decode a body according to its declared content type.
pub(crate) fn decode_body(resp: &HttpResponse) -> Result<Value> {
    match resp.media_type().as_str() {
        "application/json" => Ok(serde_json::from_slice(&resp.body)?),
        "text/csv" => Ok(serde_json::json!({ "data": parse_csv_rows(&resp.body)? })),
        _ => Err(IntegrateError::UnexpectedContentType {
            content_type: resp.content_type.clone().unwrap_or_default(),
            status: resp.status,
        }),
    }
}

/// Split a CSV body into rows of string fields. No header row is assumed.
pub fn parse_csv_rows(body: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_owned).collect())
                .map_err(IntegrateError::Csv)
        })
        .collect()
}

fn has_failed_child(data: &Value) -> bool {
    data.get("orders")
        .and_then(Value::as_array)
        .is_some_and(|orders| {
            orders
                .iter()
                .any(|o| o.get("status").and_then(Value::as_str) == Some("ERROR"))
        })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        IntegrateError::InvalidArgument(format!("{name} contains invalid header characters"))
    })
}

fn join_url(base: &str, route: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}
