//! Security and market data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ticker::Ticker;
use crate::Result;

/// Listing details of a security.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    /// Trading symbol
    pub symbol: String,
    /// Full company/asset name
    #[serde(default)]
    pub name: Option<String>,
    /// Exchange the security primarily trades on
    #[serde(default)]
    pub primary_exchange: Option<String>,
}

/// A snapshot quote attached to a security.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityQuote {
    /// Last traded price
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Quote currency
    #[serde(default)]
    pub currency: Option<String>,
    /// Best ask
    #[serde(default)]
    pub ask: Option<Decimal>,
    /// Best bid
    #[serde(default)]
    pub bid: Option<Decimal>,
    /// Session high
    #[serde(default)]
    pub high: Option<Decimal>,
    /// Session low
    #[serde(default)]
    pub low: Option<Decimal>,
    /// Session volume
    #[serde(default)]
    pub volume: Option<u64>,
    /// Quote date (`YYYY-MM-DD`)
    #[serde(default)]
    pub quote_date: Option<String>,
}

/// A tradeable security as the API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    /// Internal security id (`sec-...`)
    pub id: String,
    /// Listing details
    pub stock: StockInfo,
    /// Security type (e.g. `"equity"`, `"exchange_traded_fund"`,
    /// `"cryptocurrency"`)
    #[serde(default)]
    pub security_type: Option<String>,
    /// Trading status (e.g. `"trading"`, `"halted"`)
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the security can be traded on the platform
    #[serde(default)]
    pub ws_trade_eligible: Option<bool>,
    /// Latest snapshot quote, when the API includes one
    #[serde(default)]
    pub quote: Option<SecurityQuote>,
}

impl Security {
    /// Whether this security is a cryptocurrency.
    pub fn is_crypto(&self) -> bool {
        self.security_type.as_deref() == Some("cryptocurrency")
    }

    /// The security's identity as a [`Ticker`] (id plus symbol).
    pub fn ticker(&self) -> Result<Ticker> {
        Ticker::from_parts(Some(&self.stock.symbol), None, Some(&self.id))
    }
}

/// Buy/sell conversion rates for one foreign currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Rate applied when buying the foreign currency
    #[serde(default)]
    pub buy_rate: Option<Decimal>,
    /// Rate applied when selling the foreign currency
    #[serde(default)]
    pub sell_rate: Option<Decimal>,
    /// Spread applied on top of the mid-market rate
    #[serde(default)]
    pub spread: Option<Decimal>,
    /// Mid-market rate
    #[serde(default)]
    pub fx_rate: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_security() -> Security {
        serde_json::from_value(serde_json::json!({
            "id": "sec-s-76a7155242e8477880cbb43269235cb6",
            "stock": {
                "symbol": "AAPL",
                "name": "Apple Inc.",
                "primary_exchange": "NASDAQ"
            },
            "security_type": "equity",
            "status": "trading",
            "quote": {"amount": "187.44", "currency": "USD"}
        }))
        .unwrap()
    }

    #[test]
    fn test_security_deserializes() {
        let security = sample_security();
        assert_eq!(security.stock.symbol, "AAPL");
        assert_eq!(security.quote.as_ref().unwrap().amount, Some(dec!(187.44)));
        assert!(!security.is_crypto());
    }

    #[test]
    fn test_security_ticker_carries_id_and_symbol() {
        let ticker = sample_security().ticker().unwrap();
        assert_eq!(ticker.symbol(), Some("AAPL"));
        assert_eq!(ticker.id(), Some("sec-s-76a7155242e8477880cbb43269235cb6"));
        assert!(!ticker.is_crypto());
    }

    #[test]
    fn test_crypto_security() {
        let security: Security = serde_json::from_value(serde_json::json!({
            "id": "sec-z-btc-4ca670cac10139ce8678b84836231606",
            "stock": {"symbol": "BTC"},
            "security_type": "cryptocurrency"
        }))
        .unwrap();
        assert!(security.is_crypto());
        assert!(security.ticker().unwrap().is_crypto());
    }

    #[test]
    fn test_exchange_rate_parses() {
        let rate: ExchangeRate = serde_json::from_value(serde_json::json!({
            "buy_rate": "1.3728",
            "sell_rate": "1.3350",
            "spread": "0.015",
            "fx_rate": "1.3539"
        }))
        .unwrap();
        assert_eq!(rate.fx_rate, Some(dec!(1.3539)));
    }
}
