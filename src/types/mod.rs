//! Request and response types for the Integrate API.
//!
//! This module contains the strongly-typed structs used for serializing
//! requests and deserializing responses across every endpoint.
//!
//! ## Organization
//!
//! - [`enums`]: Shared enumerations (exchanges, order types, etc.)
//! - [`auth`]: Login challenge and token exchange types
//! - [`orders`]: Order placement, modification, slicing, book, and trades
//! - [`gtt`]: GTT and OCO order types
//! - [`portfolio`]: Positions, holdings, conversion, margin, and SPAN
//! - [`historical`]: Historical bar and tick records
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub mod auth;
pub mod enums;
pub mod gtt;
pub mod historical;
pub mod orders;
pub mod portfolio;

pub use enums::*;
pub use portfolio::ApiResponse;
