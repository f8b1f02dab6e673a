//! Ticker parsing and the supported exchange set.
//!
//! A [`Ticker`] is the normalized identity of a tradeable security. It can be
//! built from a string (`"AAPL"`, `"AAPL:NASDAQ"`) or from structured parts
//! including Wealthsimple's internal security id (`sec-...`). Tickers are
//! immutable once constructed and compare with a deliberately *weak* equality
//! that ignores the exchange, because upstream order data omits it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Prefix of internal security ids that denote cryptocurrencies.
const CRYPTO_ID_PREFIX: &str = "sec-z";

/// An exchange supported by Wealthsimple Trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// NASDAQ
    Nasdaq,
    /// New York Stock Exchange
    Nyse,
    /// Toronto Stock Exchange
    Tsx,
    /// TSX Venture Exchange
    TsxVenture,
    /// Aequitas NEO Exchange
    AequitasNeo,
    /// Crypto "exchange" used for cryptocurrency securities
    CryptoCurrency,
}

impl Exchange {
    /// The full exchange name as the API reports it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nasdaq => "NASDAQ",
            Exchange::Nyse => "NYSE",
            Exchange::Tsx => "TSX",
            Exchange::TsxVenture => "TSX-V",
            Exchange::AequitasNeo => "AEQUITAS NEO EXCHANGE",
            Exchange::CryptoCurrency => "CC",
        }
    }

    /// Short display alias. Identical to [`as_str`](Self::as_str) except for
    /// the NEO exchange, which renders as `NEO`.
    pub fn alias(&self) -> &'static str {
        match self {
            Exchange::AequitasNeo => "NEO",
            other => other.as_str(),
        }
    }
}

impl FromStr for Exchange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // The short alias is rewritten to the full name before validation.
        match s {
            "NASDAQ" => Ok(Exchange::Nasdaq),
            "NYSE" => Ok(Exchange::Nyse),
            "TSX" => Ok(Exchange::Tsx),
            "TSX-V" => Ok(Exchange::TsxVenture),
            "NEO" | "AEQUITAS NEO EXCHANGE" => Ok(Exchange::AequitasNeo),
            "CC" => Ok(Exchange::CryptoCurrency),
            other => Err(Error::InvalidExchange(other.to_string())),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized identifier for a tradeable security.
///
/// At least one of the symbol or the internal id is always present.
///
/// # Example
///
/// ```
/// use wstrade_rs::models::Ticker;
///
/// let ticker = Ticker::parse("CYBN:NEO")?;
/// assert_eq!(ticker.symbol(), Some("CYBN"));
/// assert_eq!(ticker.to_string(), "CYBN:NEO");
/// assert!(!ticker.is_crypto());
/// # Ok::<(), wstrade_rs::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    symbol: Option<String>,
    exchange: Option<Exchange>,
    id: Option<String>,
    crypto: bool,
}

impl Ticker {
    /// Parse a ticker from its string form: `"SYMBOL"` or `"SYMBOL:EXCHANGE"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTicker`] for an empty input and
    /// [`Error::InvalidExchange`] when the exchange part is not in the
    /// supported set.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::InvalidTicker(input.to_string()));
        }
        let (symbol, exchange) = match input.split_once(':') {
            Some((symbol, exchange)) => (symbol, Some(exchange)),
            None => (input, None),
        };
        Self::from_parts(Some(symbol), exchange, None)
    }

    /// Build a ticker from structured parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTicker`] when neither a symbol nor an id can
    /// be determined, and [`Error::InvalidExchange`] for an unsupported
    /// exchange name.
    pub fn from_parts(
        symbol: Option<&str>,
        exchange: Option<&str>,
        id: Option<&str>,
    ) -> Result<Self> {
        let symbol = symbol.filter(|s| !s.is_empty()).map(str::to_string);
        let id = id.filter(|s| !s.is_empty()).map(str::to_string);
        if symbol.is_none() && id.is_none() {
            return Err(Error::InvalidTicker(String::new()));
        }

        let exchange = match exchange.filter(|s| !s.is_empty()) {
            Some(name) => Some(name.parse::<Exchange>()?),
            None => None,
        };

        let crypto = exchange == Some(Exchange::CryptoCurrency)
            || id
                .as_deref()
                .is_some_and(|id| id.starts_with(CRYPTO_ID_PREFIX));

        Ok(Self {
            symbol,
            exchange,
            id,
            crypto,
        })
    }

    /// Build a ticker directly from an internal security id.
    pub fn from_id(id: &str) -> Result<Self> {
        Self::from_parts(None, None, Some(id))
    }

    /// The security's trading symbol, if known.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// The exchange the security trades on, if known.
    pub fn exchange(&self) -> Option<Exchange> {
        self.exchange
    }

    /// The internal Wealthsimple security id, if known.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether this ticker refers to a cryptocurrency. Derived from the
    /// exchange (`CC`) or the internal id prefix (`sec-z`).
    pub fn is_crypto(&self) -> bool {
        self.crypto
    }

    /// Weak equality used for filtering order data.
    ///
    /// When both tickers carry internal ids, the ids decide. Otherwise the
    /// symbols must match and both sides must agree on the crypto flag. The
    /// exchange never participates, since upstream order data omits it.
    pub fn weak_eq(&self, other: &Ticker) -> bool {
        if let (Some(a), Some(b)) = (&self.id, &other.id) {
            return a == b;
        }
        self.symbol.is_some() && self.symbol == other.symbol && self.crypto == other.crypto
    }
}

impl fmt::Display for Ticker {
    /// Renders the id verbatim when present; otherwise the symbol, suffixed
    /// with `:EXCHANGE` when an exchange is set (NEO via its short alias).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            return f.write_str(id);
        }
        match (&self.symbol, self.exchange) {
            (Some(symbol), Some(exchange)) => write!(f, "{}:{}", symbol, exchange.alias()),
            (Some(symbol), None) => f.write_str(symbol),
            // Unreachable by construction; an id-less ticker has a symbol.
            (None, _) => Ok(()),
        }
    }
}

impl FromStr for Ticker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ticker::parse(s)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Ticker::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_only() {
        let ticker = Ticker::parse("AAPL").unwrap();
        assert_eq!(ticker.symbol(), Some("AAPL"));
        assert_eq!(ticker.exchange(), None);
        assert!(!ticker.is_crypto());
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn test_parse_with_exchange_round_trips() {
        for input in ["AAPL:NASDAQ", "SU:TSX", "AC:TSX-V", "BRK.B:NYSE", "BTC:CC"] {
            assert_eq!(Ticker::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_neo_alias_round_trips() {
        let ticker = Ticker::parse("CYBN:NEO").unwrap();
        assert_eq!(ticker.exchange(), Some(Exchange::AequitasNeo));
        assert_eq!(ticker.exchange().unwrap().as_str(), "AEQUITAS NEO EXCHANGE");
        assert_eq!(ticker.to_string(), "CYBN:NEO");
    }

    #[test]
    fn test_empty_inputs_fail() {
        assert!(matches!(Ticker::parse(""), Err(Error::InvalidTicker(_))));
        assert!(matches!(
            Ticker::from_parts(None, None, None),
            Err(Error::InvalidTicker(_))
        ));
        assert!(matches!(
            Ticker::from_parts(Some(""), None, Some("")),
            Err(Error::InvalidTicker(_))
        ));
    }

    #[test]
    fn test_unsupported_exchange_fails() {
        assert!(matches!(
            Ticker::parse("AAPL:ME"),
            Err(Error::InvalidExchange(_))
        ));
    }

    #[test]
    fn test_crypto_derivation() {
        assert!(Ticker::parse("BTC:CC").unwrap().is_crypto());
        assert!(!Ticker::parse("BTC").unwrap().is_crypto());
        assert!(Ticker::from_id("sec-z-btc-4ca670cac10139ce8678b84836231606")
            .unwrap()
            .is_crypto());
        assert!(!Ticker::from_id("sec-s-76a7155242e8477880cbb43269235cb6")
            .unwrap()
            .is_crypto());
    }

    #[test]
    fn test_weak_equality_ignores_exchange() {
        let a = Ticker::parse("AAPL:NASDAQ").unwrap();
        let b = Ticker::parse("AAPL").unwrap();
        assert!(a.weak_eq(&b));
        assert!(b.weak_eq(&a));
    }

    #[test]
    fn test_weak_equality_distinguishes_symbols_and_crypto() {
        let aapl = Ticker::parse("AAPL").unwrap();
        let su = Ticker::parse("SU").unwrap();
        assert!(!aapl.weak_eq(&su));

        let eth_crypto = Ticker::parse("ETH:CC").unwrap();
        let eth_stock = Ticker::parse("ETH").unwrap();
        assert!(!eth_crypto.weak_eq(&eth_stock));
    }

    #[test]
    fn test_weak_equality_prefers_ids() {
        let a = Ticker::from_parts(Some("AAPL"), None, Some("sec-s-aaa")).unwrap();
        let b = Ticker::from_parts(Some("AAPL"), None, Some("sec-s-bbb")).unwrap();
        assert!(!a.weak_eq(&b));

        let c = Ticker::from_parts(Some("OTHER"), None, Some("sec-s-aaa")).unwrap();
        assert!(a.weak_eq(&c));
    }

    #[test]
    fn test_id_renders_verbatim() {
        let ticker = Ticker::from_id("sec-s-76a7155242e8477880cbb43269235cb6").unwrap();
        assert_eq!(
            ticker.to_string(),
            "sec-s-76a7155242e8477880cbb43269235cb6"
        );
    }
}
