//! # wstrade-rs
//!
//! A Rust client for the Wealthsimple Trade brokerage API.
//!
//! This crate provides account, market-data, order, and authentication
//! operations over Wealthsimple's private Trade API, built around an
//! explicit request/authentication pipeline with implicit token refresh.
//!
//! ## Features
//!
//! - **Authentication**: email/password login with optional OTP (2FA),
//!   token resume, and implicit refresh of expired access tokens
//! - **Accounts**: balances, value history, positions, activities
//! - **Orders**: market/limit/stop-limit placement, cancellation, and
//!   status filtering by [`models::Ticker`] weak equality
//! - **Market data**: security lookup (optionally FIFO-cached), quotes
//!   with pluggable per-exchange providers, exchange rates
//! - **Async-first**: built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wstrade_rs::WsTradeClient;
//!
//! #[tokio::main]
//! async fn main() -> wstrade_rs::Result<()> {
//!     let client = WsTradeClient::login("me@example.com", "hunter2").await?;
//!
//!     for account in client.accounts().all().await? {
//!         println!("{} ({:?})", account.id, account.account_type);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Placing an order
//!
//! ```rust,no_run
//! use wstrade_rs::WsTradeClient;
//! use wstrade_rs::models::{AccountId, Ticker};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> wstrade_rs::Result<()> {
//!     let client = WsTradeClient::login("me@example.com", "hunter2").await?;
//!     let account = AccountId::new("tfsa-hy3kqwmb");
//!     let ticker = Ticker::parse("AAPL:NASDAQ")?;
//!
//!     let order = client
//!         .orders()
//!         .limit_buy(&account, &ticker, dec!(10), dec!(150.00))
//!         .await?;
//!     println!("placed {} ({:?})", order.order_id, order.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions and tokens
//!
//! Tokens live only in memory. To survive restarts, snapshot them with
//! [`auth::Session::tokens`] and resume with [`WsTradeClient::from_tokens`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{OtpProvider, Session, StaticOtp, TokenStore, TokenUpdate};
pub use client::{ClientConfig, Feature, FeatureConfig, HeaderRegistry, WsTradeClient};
pub use error::{Error, Result};

// QuoteProvider is defined alongside the quotes service
pub use api::QuoteProvider;

/// Prelude module for convenient imports.
///
/// ```rust
/// use wstrade_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{AccountsService, DataService, OrdersService, QuotesService};
    pub use crate::auth::{OtpProvider, Session, StaticOtp};
    pub use crate::cache::FifoCache;
    pub use crate::client::{ClientConfig, Feature, FeatureConfig, WsTradeClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Account, AccountId, Activity, Exchange, HistoryInterval, Money, Order, OrderAction,
        OrderId, OrderStatus, Position, Security, SecurityQuote, Ticker,
    };
    pub use crate::QuoteProvider;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_reexport_round_trip() {
        let ticker = models::Ticker::parse("SU:TSX").unwrap();
        assert_eq!(ticker.to_string(), "SU:TSX");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(
            client::DEFAULT_BASE_URL,
            "https://trade-service.wealthsimple.com"
        );
        assert_eq!(ClientConfig::default().base_url, client::DEFAULT_BASE_URL);
    }
}
