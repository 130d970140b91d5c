//! Shared enum types that map directly to Integrate API string values.
//!
//! Variant names use `SCREAMING_SNAKE_CASE` to match the wire format
//! expected by the API, so we suppress the Rust naming convention lint.
//! Every enum exposes `ALL`, `as_str()`, `Display` and `FromStr`, the last
//! of which rejects unknown strings with
//! [`IntegrateError::InvalidArgument`].
#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntegrateError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The API wire string for this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = IntegrateError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(IntegrateError::InvalidArgument(format!(
                        "invalid {} `{other}`",
                        $label
                    ))),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

wire_enum! {
    /// Exchange / segment identifier used across all Integrate APIs.
    Exchange ("exchange type") {
        /// NSE cash market.
        NSE => "NSE",
        /// BSE cash market.
        BSE => "BSE",
        /// NSE futures & options.
        NFO => "NFO",
        /// NSE currency derivatives.
        CDS => "CDS",
        /// MCX commodities.
        MCX => "MCX",
    }
}

// ---------------------------------------------------------------------------
// Order Type
// ---------------------------------------------------------------------------

wire_enum! {
    /// Direction of an order. The API calls this the "order type".
    OrderType ("order type") {
        BUY => "BUY",
        SELL => "SELL",
    }
}

// ---------------------------------------------------------------------------
// Price Type
// ---------------------------------------------------------------------------

wire_enum! {
    /// Pricing instruction of an order.
    PriceType ("price type") {
        /// Execute at market; price must be `0`.
        MARKET => "MARKET",
        LIMIT => "LIMIT",
        /// Stop-loss triggering a market order.
        SL_MARKET => "SL-MARKET",
        /// Stop-loss triggering a limit order.
        SL_LIMIT => "SL-LIMIT",
    }
}

// ---------------------------------------------------------------------------
// Product Type
// ---------------------------------------------------------------------------

wire_enum! {
    /// Product type for an order.
    ProductType ("product type") {
        /// Cash & Carry for equity deliveries.
        CNC => "CNC",
        /// Intraday, squared off the same day.
        INTRADAY => "INTRADAY",
        /// Carry forward for derivatives.
        NORMAL => "NORMAL",
    }
}

// ---------------------------------------------------------------------------
// Validity
// ---------------------------------------------------------------------------

wire_enum! {
    /// Order validity.
    Validity ("validity") {
        DAY => "DAY",
        /// Immediate or cancel.
        IOC => "IOC",
        /// End of session.
        EOS => "EOS",
    }
}

// ---------------------------------------------------------------------------
// GTT Condition
// ---------------------------------------------------------------------------

wire_enum! {
    /// Trigger condition of a Good-Till-Triggered order.
    GttCondition ("GTT condition") {
        LTP_BELOW => "LTP_BELOW",
        LTP_ABOVE => "LTP_ABOVE",
    }
}

// ---------------------------------------------------------------------------
// Timeframe
// ---------------------------------------------------------------------------

wire_enum! {
    /// Bar size for historical data.
    Timeframe ("timeframe") {
        MINUTE => "minute",
        DAY => "day",
        /// Raw ticks instead of bars.
        TICK => "tick",
    }
}

// ---------------------------------------------------------------------------
// Order Status
// ---------------------------------------------------------------------------

wire_enum! {
    /// Status of an order in the order book.
    OrderStatus ("order status") {
        NEW => "NEW",
        OPEN => "OPEN",
        COMPLETE => "COMPLETE",
        CANCELED => "CANCELED",
        REJECTED => "REJECTED",
        REPLACED => "REPLACED",
    }
}

// ---------------------------------------------------------------------------
// Position Type
// ---------------------------------------------------------------------------

wire_enum! {
    /// Holding period of a position being converted.
    PositionType ("position type") {
        DAY => "DAY",
        OVERNIGHT => "OVERNIGHT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_type_uses_hyphenated_wire_names() {
        assert_eq!(
            serde_json::to_string(&PriceType::SL_LIMIT).unwrap(),
            "\"SL-LIMIT\""
        );
        assert_eq!("SL-MARKET".parse::<PriceType>().unwrap(), PriceType::SL_MARKET);
    }

    #[test]
    fn unknown_value_is_invalid_argument() {
        let err = "NYSE".parse::<Exchange>().unwrap_err();
        assert!(matches!(err, IntegrateError::InvalidArgument(ref m) if m.contains("exchange type")));
    }

    #[test]
    fn timeframe_is_lowercase_on_the_wire() {
        assert_eq!(Timeframe::MINUTE.to_string(), "minute");
        assert_eq!(Timeframe::ALL.len(), 3);
    }
}
