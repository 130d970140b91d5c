//! # integrate-rs
//!
//! An async Rust client for the Definedge Securities
//! [Integrate](https://www.definedgesecurities.com/) trading API.
//!
//! ## Quick Start
//!
//! ```no_run
//! use integrate_rs::IntegrateClient;
//! use integrate_rs::types::orders::PlaceOrderRequest;
//! use integrate_rs::types::{Exchange, OrderType, PriceType, ProductType};
//!
//! #[tokio::main]
//! async fn main() -> integrate_rs::Result<()> {
//!     let mut client = IntegrateClient::new()?;
//!     client.login("api-token", "api-secret", None).await?;
//!
//!     let order = PlaceOrderRequest::new(
//!         Exchange::NSE,
//!         "SBIN-EQ",
//!         OrderType::BUY,
//!         1,
//!         PriceType::LIMIT,
//!         500.0,
//!         ProductType::CNC,
//!     );
//!     let placed = client.place_order(&order).await?;
//!     println!("{placed:?}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod mock;
pub mod session;
pub mod symbols;
pub mod transport;
pub mod types;

/// Re-export the main client type at crate root for convenience.
pub use client::IntegrateClient;
/// Re-export the error type and Result alias.
pub use error::{IntegrateError, Result};
