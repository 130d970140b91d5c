#![allow(missing_docs)]
//! Order placement, modification, book, and trade types.
//!
//! Request types carry their own `validate` method, which checks them
//! against the session's [`ValidValues`] before anything is sent.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{IntegrateError, Result};
use crate::session::ValidValues;
use crate::types::enums::*;

// ---------------------------------------------------------------------------
// Optional order fields
// ---------------------------------------------------------------------------

/// Optional fields shared by place, modify, and slice requests.
///
/// Each field is omitted from the JSON body when `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderOptions {
    /// After-market order; sent as `"Yes"` / `"No"`.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_yes_no"
    )]
    pub amo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_loss_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_profit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosed_quantity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_protection: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_price: Option<f64>,
    /// Trigger price for SL-LIMIT / SL-MARKET.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
}

fn serialize_yes_no<S: Serializer>(value: &Option<bool>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(true) => s.serialize_str("Yes"),
        Some(false) => s.serialize_str("No"),
        None => s.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// Place Order
// ---------------------------------------------------------------------------

/// Request body for placing a new order.
///
/// Used by `POST placeorder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceOrderRequest {
    pub exchange: Exchange,
    pub order_type: OrderType,
    pub price: f64,
    pub price_type: PriceType,
    pub product_type: ProductType,
    pub quantity: u64,
    #[serde(rename = "tradingsymbol")]
    pub trading_symbol: String,
    pub validity: Validity,
    #[serde(flatten)]
    pub options: OrderOptions,
}

impl PlaceOrderRequest {
    /// A `DAY` order with no optional fields set.
    pub fn new(
        exchange: Exchange,
        trading_symbol: impl Into<String>,
        order_type: OrderType,
        quantity: u64,
        price_type: PriceType,
        price: f64,
        product_type: ProductType,
    ) -> Self {
        Self {
            exchange,
            order_type,
            price,
            price_type,
            product_type,
            quantity,
            trading_symbol: trading_symbol.into(),
            validity: Validity::DAY,
            options: OrderOptions::default(),
        }
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_options(mut self, options: OrderOptions) -> Self {
        self.options = options;
        self
    }

    /// Check enumerated fields and the price / trigger / quantity rules.
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_order_type(self.order_type)?;
        valid.check_price_type(self.price_type)?;
        valid.check_product_type(self.product_type)?;
        valid.check_validity(self.validity)?;

        if self.price_type == PriceType::MARKET && self.price != 0.0 {
            return Err(IntegrateError::InvalidArgument(
                "price should be 0 for market order".into(),
            ));
        }

        if self.price_type == PriceType::SL_LIMIT {
            if let Some(trigger) = self.options.trigger_price {
                match self.order_type {
                    OrderType::BUY if trigger > self.price => {
                        return Err(IntegrateError::InvalidArgument(
                            "trigger price cannot be greater than price for SL-LIMIT BUY order"
                                .into(),
                        ));
                    }
                    OrderType::SELL if trigger < self.price => {
                        return Err(IntegrateError::InvalidArgument(
                            "trigger price cannot be lesser than price for SL-LIMIT SELL order"
                                .into(),
                        ));
                    }
                    _ => {}
                }
            }
        }

        check_quantity(self.quantity, "quantity")
    }
}

// ---------------------------------------------------------------------------
// Modify Order
// ---------------------------------------------------------------------------

/// Request body for modifying an open order.
///
/// Used by `POST modify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifyOrderRequest {
    pub order_id: String,
    #[serde(flatten)]
    pub order: PlaceOrderRequest,
}

impl ModifyOrderRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        check_id(&self.order_id, "order id")?;
        self.order.validate(valid)
    }
}

// ---------------------------------------------------------------------------
// Slice Order
// ---------------------------------------------------------------------------

/// Request body for splitting one order into `slices` child orders.
///
/// Used by `POST sliceorder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceOrderRequest {
    #[serde(flatten)]
    pub order: PlaceOrderRequest,
    pub slices: u32,
}

impl SliceOrderRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        self.order.validate(valid)?;
        if self.slices == 0 {
            return Err(IntegrateError::InvalidArgument("slices cannot be 0".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response from placing, modifying, or cancelling an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from a slice order: one entry per child order.
#[derive(Debug, Clone, Deserialize)]
pub struct SliceOrderResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub orders: Vec<OrderResponse>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One order in the order book.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    pub order_id: Option<String>,
    pub exchange: Option<String>,
    pub tradingsymbol: Option<String>,
    pub order_type: Option<String>,
    pub price_type: Option<String>,
    pub product_type: Option<String>,
    pub order_status: Option<String>,
    pub validity: Option<String>,
    pub order_entry_time: Option<String>,
    pub message: Option<String>,
    /// Numeric and venue-specific fields, as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderDetail {
    /// Parsed `order_status`, if it is a known value.
    pub fn status(&self) -> Option<OrderStatus> {
        self.order_status.as_deref()?.parse().ok()
    }
}

/// Order book.
///
/// Returned by `GET orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub orders: Vec<OrderDetail>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One fill in the trade book.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeDetail {
    pub order_id: Option<String>,
    pub fill_id: Option<String>,
    pub exchange: Option<String>,
    pub tradingsymbol: Option<String>,
    pub order_type: Option<String>,
    pub product_type: Option<String>,
    pub fill_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Trade book.
///
/// Returned by `GET trades`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeBook {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub trades: Vec<TradeDetail>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

pub(crate) fn check_quantity(quantity: u64, label: &str) -> Result<()> {
    if quantity == 0 {
        return Err(IntegrateError::InvalidArgument(format!("{label} cannot be 0")));
    }
    Ok(())
}

pub(crate) fn check_id(id: &str, label: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(IntegrateError::InvalidArgument(format!("{label} cannot be empty")));
    }
    Ok(())
}
