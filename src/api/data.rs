//! Market data service: security lookups and exchange rates.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::client::endpoint::{self, Args};
use crate::client::Feature;
use crate::client::ClientInner;
use crate::models::{Exchange, ExchangeRate, Security, Ticker};
use crate::{Error, Result};

/// Service for securities and market data.
///
/// Lookups are memoized in a FIFO cache keyed by the normalized ticker when
/// the `securities_cache` feature is enabled.
///
/// # Example
///
/// ```no_run
/// use wstrade_rs::models::Ticker;
///
/// # async fn example(client: wstrade_rs::WsTradeClient) -> wstrade_rs::Result<()> {
/// let ticker = Ticker::parse("AAPL:NASDAQ")?;
/// let security = client.data().security(&ticker).await?;
/// println!("{} -> {}", ticker, security.id);
/// # Ok(())
/// # }
/// ```
pub struct DataService {
    inner: Arc<ClientInner>,
}

#[derive(Deserialize)]
struct SearchResults {
    results: Vec<Security>,
}

impl DataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Look up the security a ticker refers to.
    ///
    /// A ticker with an internal id fetches directly; otherwise the symbol
    /// is searched and narrowed by exchange and crypto flag.
    ///
    /// # Errors
    ///
    /// [`Error::SecurityLookup`] when the search matches zero or more than
    /// one security.
    pub async fn security(&self, ticker: &Ticker) -> Result<Security> {
        let cache_enabled = self.inner.feature_enabled(Feature::SecuritiesCache);
        let key = ticker.to_string();

        if cache_enabled {
            let cache = self
                .inner
                .securities_cache
                .lock()
                .expect("securities cache lock poisoned");
            if let Some(hit) = cache.get(&key) {
                return Ok(hit.clone());
            }
        }

        let security = self.lookup(ticker).await?;

        if cache_enabled {
            self.inner
                .securities_cache
                .lock()
                .expect("securities cache lock poisoned")
                .insert(key, security.clone());
        }
        Ok(security)
    }

    /// Look up a security and fetch its full record (including the latest
    /// quote) by id.
    pub async fn security_extensive(&self, ticker: &Ticker) -> Result<Security> {
        let security = self.security(ticker).await?;
        self.security_by_id(&security.id).await
    }

    /// Fetch a security directly by its internal id.
    pub async fn security_by_id(&self, security_id: &str) -> Result<Security> {
        let mut args = Args::new();
        args.insert("security_id".to_string(), json!(security_id));
        self.inner.call_as(&endpoint::SECURITY_BY_ID, args).await
    }

    /// Buy/sell exchange rates, keyed by foreign currency code.
    pub async fn exchange_rates(&self) -> Result<HashMap<String, ExchangeRate>> {
        self.inner
            .call_as(&endpoint::EXCHANGE_RATES, Args::new())
            .await
    }

    async fn lookup(&self, ticker: &Ticker) -> Result<Security> {
        if let Some(id) = ticker.id() {
            return self.security_by_id(id).await;
        }

        // By construction an id-less ticker carries a symbol.
        let symbol = ticker
            .symbol()
            .ok_or_else(|| Error::InvalidTicker(ticker.to_string()))?;

        let mut args = Args::new();
        args.insert("query".to_string(), json!(symbol));
        let response: SearchResults = self
            .inner
            .call_as(&endpoint::SECURITIES_SEARCH, args)
            .await?;

        let mut matches: Vec<Security> = response
            .results
            .into_iter()
            .filter(|security| matches_ticker(security, ticker, symbol))
            .collect();

        match matches.len() {
            0 => Err(Error::SecurityLookup(format!(
                "no security matched {}",
                ticker
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(Error::SecurityLookup(format!(
                "{} securities matched {}; qualify the ticker with an exchange",
                n, ticker
            ))),
        }
    }
}

/// Search narrowing: exact symbol, then exchange/crypto agreement.
fn matches_ticker(security: &Security, ticker: &Ticker, symbol: &str) -> bool {
    if security.stock.symbol != symbol {
        return false;
    }
    match ticker.exchange() {
        Some(Exchange::CryptoCurrency) => security.is_crypto(),
        Some(exchange) => {
            security.stock.primary_exchange.as_deref() == Some(exchange.as_str())
        }
        // Without an exchange, still keep crypto and non-crypto apart.
        None => security.is_crypto() == ticker.is_crypto(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(symbol: &str, exchange: Option<&str>, security_type: &str) -> Security {
        serde_json::from_value(serde_json::json!({
            "id": format!("sec-s-{}", symbol.to_lowercase()),
            "stock": {"symbol": symbol, "primary_exchange": exchange},
            "security_type": security_type
        }))
        .unwrap()
    }

    #[test]
    fn test_match_requires_exact_symbol() {
        let ticker = Ticker::parse("AAPL").unwrap();
        assert!(!matches_ticker(
            &security("AAPLW", Some("NASDAQ"), "equity"),
            &ticker,
            "AAPL"
        ));
        assert!(matches_ticker(
            &security("AAPL", Some("NASDAQ"), "equity"),
            &ticker,
            "AAPL"
        ));
    }

    #[test]
    fn test_match_narrows_by_exchange() {
        let ticker = Ticker::parse("ETH:NASDAQ").unwrap();
        assert!(!matches_ticker(
            &security("ETH", Some("TSX"), "equity"),
            &ticker,
            "ETH"
        ));
        assert!(matches_ticker(
            &security("ETH", Some("NASDAQ"), "equity"),
            &ticker,
            "ETH"
        ));
    }

    #[test]
    fn test_crypto_exchange_matches_crypto_securities() {
        let ticker = Ticker::parse("ETH:CC").unwrap();
        assert!(matches_ticker(
            &security("ETH", None, "cryptocurrency"),
            &ticker,
            "ETH"
        ));
        assert!(!matches_ticker(
            &security("ETH", Some("NASDAQ"), "equity"),
            &ticker,
            "ETH"
        ));
    }

    #[test]
    fn test_bare_symbol_excludes_crypto() {
        let ticker = Ticker::parse("ETH").unwrap();
        assert!(!matches_ticker(
            &security("ETH", None, "cryptocurrency"),
            &ticker,
            "ETH"
        ));
    }
}
