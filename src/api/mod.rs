//! Per-resource API services.
//!
//! Each service is a thin caller of the request pipeline: it names an
//! endpoint from the static table, fills the argument bag, and types the
//! response.

mod accounts;
mod data;
mod orders;
pub(crate) mod quotes;

pub use accounts::AccountsService;
pub use data::DataService;
pub use orders::OrdersService;
pub use quotes::{QuoteProvider, QuotesService};
