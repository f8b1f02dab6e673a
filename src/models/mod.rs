//! Data models for the Wealthsimple Trade API.
//!
//! Models are organized by domain:
//!
//! - [`ticker`] - Security identity: [`Ticker`] and [`Exchange`]
//! - [`primitives`] - Newtypes like [`AccountId`], [`OrderId`], [`Money`]
//! - [`account`] - Accounts, positions, activities, deposits
//! - [`order`] - Orders and placement payloads
//! - [`security`] - Securities, quotes, exchange rates

pub mod account;
pub mod order;
pub mod primitives;
pub mod security;
pub mod ticker;

pub use account::*;
pub use order::{Order, OrderAction, OrderStatus};
pub use primitives::*;
pub use security::*;
pub use ticker::{Exchange, Ticker};

pub(crate) use order::NewOrderPayload;
