#![allow(missing_docs)]
//! GTT (Good-Till-Triggered) and OCO (One-Cancels-Other) order types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::session::ValidValues;
use crate::types::enums::*;
use crate::types::orders::{check_id, check_quantity};

// ---------------------------------------------------------------------------
// GTT
// ---------------------------------------------------------------------------

/// Request body for placing a GTT order.
///
/// Used by `POST gttplaceorder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GttOrderRequest {
    pub exchange: Exchange,
    pub order_type: OrderType,
    /// Limit price of the order placed once triggered.
    pub price: f64,
    pub quantity: u64,
    #[serde(rename = "tradingsymbol")]
    pub trading_symbol: String,
    /// LTP level that arms the order.
    pub alert_price: f64,
    pub condition: GttCondition,
}

impl GttOrderRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_order_type(self.order_type)?;
        check_quantity(self.quantity, "quantity")?;
        valid.check_gtt_condition(self.condition)
    }
}

/// Request body for modifying a GTT order.
///
/// Used by `POST gttmodify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifyGttOrderRequest {
    pub alert_id: String,
    #[serde(flatten)]
    pub order: GttOrderRequest,
}

impl ModifyGttOrderRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        check_id(&self.alert_id, "alert id")?;
        self.order.validate(valid)
    }
}

// ---------------------------------------------------------------------------
// OCO
// ---------------------------------------------------------------------------

/// Request body for placing an OCO order (stop-loss leg + target leg).
///
/// Used by `POST ocoplaceorder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcoOrderRequest {
    pub exchange: Exchange,
    pub order_type: OrderType,
    #[serde(rename = "tradingsymbol")]
    pub trading_symbol: String,
    pub stoploss_quantity: u64,
    pub stoploss_price: f64,
    pub target_quantity: u64,
    pub target_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl OcoOrderRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_order_type(self.order_type)?;
        check_quantity(self.stoploss_quantity, "stoploss quantity")?;
        check_quantity(self.target_quantity, "target quantity")
    }
}

/// Request body for modifying an OCO order.
///
/// Used by `POST ocomodify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifyOcoOrderRequest {
    pub alert_id: String,
    #[serde(flatten)]
    pub order: OcoOrderRequest,
}

impl ModifyOcoOrderRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        check_id(&self.alert_id, "alert id")?;
        self.order.validate(valid)
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response from placing, modifying, or cancelling a GTT / OCO order.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub alert_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One pending GTT / OCO order.
#[derive(Debug, Clone, Deserialize)]
pub struct GttOrderDetail {
    pub alert_id: Option<String>,
    pub exchange: Option<String>,
    pub tradingsymbol: Option<String>,
    pub order_type: Option<String>,
    pub condition: Option<String>,
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pending GTT / OCO order book.
///
/// Returned by `GET gttorders`.
#[derive(Debug, Clone, Deserialize)]
pub struct GttOrderBook {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "pendingGTTOrderBook")]
    pub orders: Vec<GttOrderDetail>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
