//! HTTP client, request pipeline, and supporting registries.
//!
//! The entry point is [`WsTradeClient`]. It routes every API call through
//! the request pipeline in [`http`], building URLs from the static endpoint
//! table in [`endpoint`] and handling token refresh via the session.

mod config;
pub(crate) mod endpoint;
mod headers;
mod http;
pub mod pagination;

pub use config::{
    ClientConfig, Feature, FeatureConfig, DEFAULT_BASE_URL, DEFAULT_SECURITIES_CACHE_CAPACITY,
};
pub use headers::HeaderRegistry;
pub use http::WsTradeClient;
pub use pagination::{Page, ORDERS_PAGE_SIZE};
pub(crate) use http::{is_success, ClientInner};
