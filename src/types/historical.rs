#![allow(missing_docs)]
//! Historical data types: bar and tick records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::ValidValues;
use crate::types::enums::*;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Parameters of a historical data download.
///
/// Used by `GET {data_url}/history/{exchange}/{token}/{timeframe}/{start}/{end}`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRequest {
    pub exchange: Exchange,
    /// Instrument token (see
    /// [`IntegrateClient::resolve_token`](crate::client::IntegrateClient::resolve_token)).
    pub token: String,
    pub timeframe: Timeframe,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl HistoricalRequest {
    pub fn validate(&self, valid: &ValidValues) -> Result<()> {
        valid.check_exchange(self.exchange)?;
        valid.check_timeframe(self.timeframe)?;
        crate::types::orders::check_id(&self.token, "token")
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One OHLCV bar (7-field line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub datetime: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Open interest (zero for cash instruments).
    pub oi: u64,
}

/// One tick (4-field line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Epoch seconds.
    pub utc: i64,
    /// Last traded price.
    pub ltp: f64,
    /// Last traded quantity.
    pub ltq: u64,
    pub oi: u64,
}

/// A record of the historical stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoricalRecord {
    Bar(Bar),
    Tick(Tick),
}
