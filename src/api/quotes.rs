//! Quotes service with pluggable per-exchange providers.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use rust_decimal::Decimal;

use crate::api::data::DataService;
use crate::client::ClientInner;
use crate::models::{Exchange, Ticker};
use crate::{Error, Result};

/// A pluggable source of quotes for one exchange.
///
/// The default quote path reads the security's snapshot quote from the API.
/// Registering a provider overrides that path for a single exchange, which
/// matters mostly for crypto where the built-in quote can lag.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use futures_util::future::BoxFuture;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use wstrade_rs::models::{Exchange, Ticker};
/// use wstrade_rs::QuoteProvider;
///
/// struct FixedQuote;
///
/// impl QuoteProvider for FixedQuote {
///     fn quote(&self, _ticker: &Ticker) -> BoxFuture<'_, wstrade_rs::Result<Decimal>> {
///         Box::pin(async move { Ok(dec!(42.00)) })
///     }
/// }
///
/// # async fn example(client: wstrade_rs::WsTradeClient) -> wstrade_rs::Result<()> {
/// client.quotes().register(Exchange::CryptoCurrency, Arc::new(FixedQuote));
/// let price = client.quotes().get(&Ticker::parse("BTC:CC")?).await?;
/// # Ok(())
/// # }
/// ```
pub trait QuoteProvider: Send + Sync {
    /// Fetch the current quote for a ticker.
    fn quote(&self, ticker: &Ticker) -> BoxFuture<'_, Result<Decimal>>;
}

/// Service for security quotes.
pub struct QuotesService {
    inner: Arc<ClientInner>,
}

impl QuotesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Register a provider for an exchange, replacing any previous one.
    /// The registry is keyed by exchange, so registration is validated by
    /// the type system rather than at call time.
    pub fn register(&self, exchange: Exchange, provider: Arc<dyn QuoteProvider>) {
        self.inner
            .quote_providers
            .write()
            .expect("quote provider registry lock poisoned")
            .insert(exchange, provider);
    }

    /// Remove the provider registered for an exchange, if any.
    pub fn unregister(&self, exchange: Exchange) {
        self.inner
            .quote_providers
            .write()
            .expect("quote provider registry lock poisoned")
            .remove(&exchange);
    }

    /// The current quote for a ticker.
    ///
    /// A provider registered for the ticker's exchange takes precedence;
    /// otherwise the security's snapshot quote is fetched.
    pub async fn get(&self, ticker: &Ticker) -> Result<Decimal> {
        if let Some(exchange) = ticker.exchange() {
            let provider = self
                .inner
                .quote_providers
                .read()
                .expect("quote provider registry lock poisoned")
                .get(&exchange)
                .cloned();
            if let Some(provider) = provider {
                return provider.quote(ticker).await;
            }
        }

        let security = DataService::new(self.inner.clone())
            .security_extensive(ticker)
            .await?;
        security
            .quote
            .and_then(|quote| quote.amount)
            .ok_or_else(|| Error::SecurityLookup(format!("no quote available for {}", ticker)))
    }
}
