//! REST API endpoint implementations.
//!
//! Each sub-module adds high-level `async` methods to
//! [`IntegrateClient`](crate::client::IntegrateClient) via `impl` blocks.
//! Writes validate their arguments against the session's enumerated values
//! before anything is sent.
//!
//! ## Usage
//!
//! ```no_run
//! use integrate_rs::IntegrateClient;
//!
//! # #[tokio::main]
//! # async fn main() -> integrate_rs::Result<()> {
//! let mut client = IntegrateClient::new()?;
//! client.login("api-token", "api-secret", Some("123456")).await?;
//! let orders = client.get_orders().await?;
//! let holdings = client.get_holdings().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`auth`] | 2 | Login challenge, token exchange |
//! | [`orders`] | 7 | Place, modify, cancel, slice, order book, trade book |
//! | [`gtt`] | 7 | GTT and OCO orders |
//! | [`portfolio`] | 6 | Positions, holdings, conversion, limits, margins |
//! | [`market_data`] | 2 | Quotes, security information |
//! | [`historical`] | 1 | Bars and ticks |

pub mod auth;
pub mod gtt;
pub mod historical;
pub mod market_data;
pub mod orders;
pub mod portfolio;
