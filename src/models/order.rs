//! Order models and placement payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::{AccountId, Money, OrderId};
use super::ticker::Ticker;
use crate::Result;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted but not yet filled (working)
    Submitted,
    /// Newly created, not yet accepted
    New,
    /// Filled
    Posted,
    /// Cancellation requested
    Cancelling,
    /// Cancelled
    Cancelled,
    /// Expired without filling
    Expired,
    /// Rejected by the broker
    Rejected,
    /// Any status this crate does not know about
    #[serde(other)]
    Unknown,
}

/// An order as reported by the orders collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// The order id
    pub order_id: OrderId,
    /// Trading symbol of the ordered security
    #[serde(default)]
    pub symbol: Option<String>,
    /// Internal id of the ordered security
    #[serde(default)]
    pub security_id: Option<String>,
    /// Ordered quantity
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Quantity filled so far
    #[serde(default)]
    pub filled_quantity: Option<Decimal>,
    /// Direction, as reported (`"buy_quantity"` / `"sell_quantity"`)
    #[serde(default)]
    pub order_type: Option<String>,
    /// Execution style (`"market"`, `"limit"`, `"stop_limit"`)
    #[serde(default)]
    pub order_sub_type: Option<String>,
    /// Current status
    pub status: OrderStatus,
    /// Limit price, when applicable
    #[serde(default)]
    pub limit_price: Option<Money>,
    /// Stop price, when applicable
    #[serde(default)]
    pub stop_price: Option<Money>,
    /// Market value of the order
    #[serde(default)]
    pub market_value: Option<Money>,
    /// Account the order belongs to
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// When the order was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the order reached a terminal state
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The order's security identity as a [`Ticker`].
    ///
    /// Order data carries no exchange; the resulting ticker is built from
    /// the symbol and internal id, which is exactly what weak equality
    /// compares.
    pub fn ticker(&self) -> Result<Ticker> {
        Ticker::from_parts(self.symbol.as_deref(), None, self.security_id.as_deref())
    }
}

/// Direction of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

impl OrderAction {
    pub(crate) fn as_order_type(&self) -> &'static str {
        match self {
            OrderAction::Buy => "buy_quantity",
            OrderAction::Sell => "sell_quantity",
        }
    }
}

/// Payload POSTed to the orders endpoint.
///
/// Built by the orders service; the security id has already been resolved
/// from a ticker by the time this exists.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewOrderPayload {
    pub account_id: String,
    pub security_id: String,
    pub quantity: Decimal,
    pub order_type: &'static str,
    pub order_sub_type: &'static str,
    pub time_in_force: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_deserializes_and_builds_ticker() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "order_id": "order-987zyx",
            "symbol": "AAPL",
            "security_id": "sec-s-76a7155242e8477880cbb43269235cb6",
            "quantity": 10,
            "order_type": "buy_quantity",
            "order_sub_type": "limit",
            "status": "submitted",
            "limit_price": {"amount": "150.00", "currency": "USD"}
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Submitted);
        assert_eq!(order.limit_price.as_ref().unwrap().amount, dec!(150.00));

        let ticker = order.ticker().unwrap();
        assert!(ticker.weak_eq(&Ticker::parse("AAPL").unwrap()));
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "order_id": "order-987zyx",
            "status": "some_future_status"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Unknown);
    }

    #[test]
    fn test_payload_omits_absent_prices() {
        let payload = NewOrderPayload {
            account_id: "tfsa-hy3kqwmb".into(),
            security_id: "sec-s-aaa".into(),
            quantity: dec!(5),
            order_type: OrderAction::Buy.as_order_type(),
            order_sub_type: "market",
            time_in_force: "day",
            limit_price: None,
            stop_price: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["order_type"], "buy_quantity");
        assert!(value.get("limit_price").is_none());
        assert!(value.get("stop_price").is_none());
    }
}
