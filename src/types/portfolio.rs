#![allow(missing_docs)]
//! Portfolio types: positions, holdings, conversion, limits and margins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IntegrateError, Result};
use crate::session::ValidValues;
use crate::types::enums::*;
use crate::types::orders::check_quantity;

// ---------------------------------------------------------------------------
// Convert Position
// ---------------------------------------------------------------------------

/// Request body for converting an open position's product type.
///
/// Used by `POST productconversion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertPositionRequest {
    pub exchange: Exchange,
    pub order_type: OrderType,
    pub previous_product: ProductType,
    pub product_type: ProductType,
    pub quantity: u64,
    #[serde(rename = "tradingsymbol")]
    pub trading_symbol: String,
    pub position_type: PositionType,
}

impl ConvertPositionRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_order_type(self.order_type)?;
        valid.check_product_type(self.previous_product)?;
        valid.check_product_type(self.product_type)?;
        check_quantity(self.quantity, "quantity")
    }
}

// ---------------------------------------------------------------------------
// Margin / SPAN
// ---------------------------------------------------------------------------

/// One order of a margin basket.
///
/// Sent as an element of `basketlists` to `POST margin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginOrder {
    pub exchange: Exchange,
    #[serde(rename = "tradingsymbol")]
    pub trading_symbol: String,
    pub quantity: u64,
    pub price: f64,
    pub price_type: PriceType,
    pub product_type: ProductType,
    pub order_type: OrderType,
}

impl MarginOrder {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_order_type(self.order_type)?;
        valid.check_price_type(self.price_type)?;
        valid.check_product_type(self.product_type)?;
        check_quantity(self.quantity, "quantity")
    }
}

/// One position of a SPAN calculation. Negative quantity is a short.
///
/// Sent as an element of `positions` to `POST spancalculator`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanPosition {
    pub exchange: Exchange,
    #[serde(rename = "tradingsymbol")]
    pub trading_symbol: String,
    pub quantity: i64,
    pub product_type: ProductType,
}

impl SpanPosition {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_product_type(self.product_type)?;
        if self.quantity == 0 {
            return Err(IntegrateError::InvalidArgument("quantity cannot be 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MarginBasket<'a> {
    pub basketlists: &'a [MarginOrder],
}

#[derive(Debug, Serialize)]
pub(crate) struct SpanBasket<'a> {
    pub positions: &'a [SpanPosition],
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One open position.
#[derive(Debug, Clone, Deserialize)]
pub struct Position {
    pub exchange: Option<String>,
    pub tradingsymbol: Option<String>,
    pub product_type: Option<String>,
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Position book.
///
/// Returned by `GET positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionBook {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One demat holding.
#[derive(Debug, Clone, Deserialize)]
pub struct Holding {
    pub isin: Option<String>,
    /// Trading symbols per exchange, as sent.
    #[serde(default)]
    pub tradingsymbol: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Holdings.
///
/// Returned by `GET holdings`.
#[derive(Debug, Clone, Deserialize)]
pub struct Holdings {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<Holding>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope for endpoints whose payload is a loose set of fields (limits,
/// margin, SPAN, quotes, security information).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_time: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ApiResponse {
    /// A payload field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
