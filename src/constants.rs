//! Constants for the Definedge Securities Integrate API.
//!
//! Contains base URLs, REST route templates, and instrument master file
//! names. These are used internally by
//! [`IntegrateClient`](crate::client::IntegrateClient), but are also
//! exported for advanced usage.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Base URL for the sign-in (login + token exchange) endpoints.
pub const LOGIN_BASE_URL: &str = "https://signin.definedgesecurities.com/auth/realms/debroking/dsbpkc";

/// Base URL for the trading REST API.
pub const API_BASE_URL: &str = "https://integrate.definedgesecurities.com/dart/v1";

/// Base URL for the historical data service.
pub const DATA_BASE_URL: &str = "https://data.definedgesecurities.com/sds";

/// Location of the zipped instrument master file.
pub const SYMBOLS_URL: &str = "https://app.definedgesecurities.com/public/allmaster.zip";

/// Name of the CSV entry inside the instrument master archive.
pub const SYMBOLS_FILE_NAME: &str = "allmaster.csv";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Date-time layout of the historical data route and bar timestamps
/// (`ddmmyyyyHHMM`).
pub const HISTORY_DATE_FORMAT: &str = "%d%m%Y%H%M";

/// Capacity of the channel between the historical worker and its consumer.
pub const HISTORY_CHANNEL_CAPACITY: usize = 256;

/// Message the API sends when the session key is no longer valid.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session Expired";

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// REST route templates, relative to their base URL.
///
/// `{name}` placeholders are substituted by the dispatcher.
pub mod routes {
    pub const LOGIN: &str = "login/{api_token}";
    pub const TOKEN: &str = "token";

    pub const PLACE_ORDER: &str = "placeorder";
    pub const MODIFY_ORDER: &str = "modify";
    pub const CANCEL_ORDER: &str = "cancel/{order_id}";
    pub const SLICE_ORDER: &str = "sliceorder";
    pub const PRODUCT_CONVERSION: &str = "productconversion";

    pub const GTT_PLACE: &str = "gttplaceorder";
    pub const GTT_MODIFY: &str = "gttmodify";
    pub const GTT_CANCEL: &str = "gttcancel/{alert_id}";
    pub const OCO_PLACE: &str = "ocoplaceorder";
    pub const OCO_MODIFY: &str = "ocomodify";
    pub const OCO_CANCEL: &str = "ococancel/{alert_id}";

    pub const ORDERS: &str = "orders";
    pub const ORDER: &str = "order/{order_id}";
    pub const GTT_ORDERS: &str = "gttorders";
    pub const TRADES: &str = "trades";
    pub const POSITIONS: &str = "positions";
    pub const HOLDINGS: &str = "holdings";
    pub const LIMITS: &str = "limits";
    pub const MARGIN: &str = "margin";
    pub const SPAN_CALCULATOR: &str = "spancalculator";

    pub const QUOTES: &str = "quotes/{exchange}/{token}";
    pub const SECURITY_INFO: &str = "securityinfo/{exchange}/{token}";
    pub const HISTORY: &str = "history/{exchange}/{token}/{timeframe}/{start}/{end}";
}
