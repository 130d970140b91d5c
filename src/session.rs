//! Session state shared by every operation of one client.
//!
//! A [`Session`] is created with the client and holds the connection
//! settings plus the four keys issued by the login handshake. It is written
//! only by [`IntegrateClient::login`](crate::client::IntegrateClient::login)
//! and [`IntegrateClient::set_session_keys`](crate::client::IntegrateClient::set_session_keys),
//! both of which take `&mut self`; all other operations read it through
//! `&self`. Wrap the client in a lock if several tasks need to log in.

use std::time::Duration;

use crate::constants::{API_BASE_URL, DATA_BASE_URL, DEFAULT_TIMEOUT, LOGIN_BASE_URL, SYMBOLS_URL};
use crate::error::{IntegrateError, Result};
use crate::types::enums::*;

/// Keys returned by the token exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionKeys {
    /// Login UCC id.
    pub uid: String,
    /// Account id.
    pub actid: String,
    /// Key sent as the `Authorization` header on every API call.
    pub api_session_key: String,
    /// Secondary (streaming) session key.
    pub susertoken: String,
}

/// The enumerated values the client accepts.
///
/// Validation of every order and market-data request consults these sets,
/// so they are the single source of truth for what may reach the API.
/// Defaults to every variant of each enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidValues {
    pub exchanges: Vec<Exchange>,
    pub order_types: Vec<OrderType>,
    pub price_types: Vec<PriceType>,
    pub product_types: Vec<ProductType>,
    pub validities: Vec<Validity>,
    pub gtt_conditions: Vec<GttCondition>,
    pub timeframes: Vec<Timeframe>,
}

impl Default for ValidValues {
    fn default() -> Self {
        Self {
            exchanges: Exchange::ALL.to_vec(),
            order_types: OrderType::ALL.to_vec(),
            price_types: PriceType::ALL.to_vec(),
            product_types: ProductType::ALL.to_vec(),
            validities: Validity::ALL.to_vec(),
            gtt_conditions: GttCondition::ALL.to_vec(),
            timeframes: Timeframe::ALL.to_vec(),
        }
    }
}

fn ensure<T: PartialEq + std::fmt::Display>(allowed: &[T], value: T, label: &str) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(IntegrateError::InvalidArgument(format!(
            "invalid {label} `{value}`"
        )))
    }
}

impl ValidValues {
    pub fn check_exchange(&self, v: Exchange) -> Result<()> {
        ensure(&self.exchanges, v, "exchange type")
    }

    pub fn check_order_type(&self, v: OrderType) -> Result<()> {
        ensure(&self.order_types, v, "order type")
    }

    pub fn check_price_type(&self, v: PriceType) -> Result<()> {
        ensure(&self.price_types, v, "price type")
    }

    pub fn check_product_type(&self, v: ProductType) -> Result<()> {
        ensure(&self.product_types, v, "product type")
    }

    pub fn check_validity(&self, v: Validity) -> Result<()> {
        ensure(&self.validities, v, "validity")
    }

    pub fn check_gtt_condition(&self, v: GttCondition) -> Result<()> {
        ensure(&self.gtt_conditions, v, "GTT condition")
    }

    pub fn check_timeframe(&self, v: Timeframe) -> Result<()> {
        ensure(&self.timeframes, v, "timeframe")
    }
}

/// Connection settings and authentication state of one client.
#[derive(Debug, Clone)]
pub struct Session {
    /// Base URL of the login / token endpoints.
    pub login_url: String,
    /// Base URL of the trading REST API.
    pub base_url: String,
    /// Base URL of the historical data service.
    pub data_url: String,
    /// Location of the zipped instrument master.
    pub symbols_url: String,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    /// Optional proxy URL for all requests.
    pub proxy: Option<String>,
    /// Log request payloads and raw response bodies.
    pub logging: bool,
    /// Enumerated values accepted by validation.
    pub valid: ValidValues,
    keys: SessionKeys,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            login_url: LOGIN_BASE_URL.to_owned(),
            base_url: API_BASE_URL.to_owned(),
            data_url: DATA_BASE_URL.to_owned(),
            symbols_url: SYMBOLS_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            logging: false,
            valid: ValidValues::default(),
            keys: SessionKeys::default(),
        }
    }
}

impl Session {
    /// The keys issued by the last successful login.
    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// The `Authorization` header value, if logged in.
    pub fn api_session_key(&self) -> Option<&str> {
        Some(self.keys.api_session_key.as_str()).filter(|k| !k.is_empty())
    }

    /// Whether an API session key is present.
    pub fn is_authenticated(&self) -> bool {
        self.api_session_key().is_some()
    }

    pub(crate) fn set_keys(&mut self, keys: SessionKeys) {
        self.keys = keys;
    }
}
