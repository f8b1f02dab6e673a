//! Orders service: listing, filtering, placing, and cancelling orders.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::api::data::DataService;
use crate::client::endpoint::{self, to_args, Args};
use crate::client::pagination::{fetch_all_pages, Page, ORDERS_PAGE_SIZE};
use crate::client::ClientInner;
use crate::models::{AccountId, NewOrderPayload, Order, OrderAction, OrderId, OrderStatus, Ticker};
use crate::Result;

/// Service for order operations.
///
/// Placement helpers resolve the ticker to an internal security id first,
/// then POST the order payload; a 201 Created response is the success case.
///
/// # Example
///
/// ```no_run
/// use wstrade_rs::models::{AccountId, Ticker};
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: wstrade_rs::WsTradeClient) -> wstrade_rs::Result<()> {
/// let account = AccountId::new("tfsa-hy3kqwmb");
/// let ticker = Ticker::parse("AAPL:NASDAQ")?;
///
/// let order = client
///     .orders()
///     .limit_buy(&account, &ticker, dec!(10), dec!(150.00))
///     .await?;
/// println!("placed {}", order.order_id);
/// # Ok(())
/// # }
/// ```
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// One page (20 entries) of an account's orders. Pages are 1-based.
    pub async fn page(&self, account_id: &AccountId, page: u32) -> Result<Page<Order>> {
        let offset = page.saturating_sub(1) * ORDERS_PAGE_SIZE;
        let mut args = Args::new();
        args.insert("offset".to_string(), json!(offset));
        args.insert("account_id".to_string(), json!(account_id.as_str()));
        self.inner.call_as(&endpoint::ORDERS_BY_PAGE, args).await
    }

    /// Every order the account has ever placed, assembled across pages in
    /// page order.
    pub async fn all(&self, account_id: &AccountId) -> Result<Vec<Order>> {
        fetch_all_pages(ORDERS_PAGE_SIZE, |page| self.page(account_id, page)).await
    }

    /// Pending (working) orders, optionally narrowed to one security.
    pub async fn pending(
        &self,
        account_id: &AccountId,
        ticker: Option<&Ticker>,
    ) -> Result<Vec<Order>> {
        self.by_status(account_id, OrderStatus::Submitted, ticker)
            .await
    }

    /// Filled orders, optionally narrowed to one security.
    pub async fn filled(
        &self,
        account_id: &AccountId,
        ticker: Option<&Ticker>,
    ) -> Result<Vec<Order>> {
        self.by_status(account_id, OrderStatus::Posted, ticker).await
    }

    /// Cancelled orders, optionally narrowed to one security.
    pub async fn cancelled(
        &self,
        account_id: &AccountId,
        ticker: Option<&Ticker>,
    ) -> Result<Vec<Order>> {
        self.by_status(account_id, OrderStatus::Cancelled, ticker)
            .await
    }

    /// Cancel an order. Echoes back the id that was cancelled.
    pub async fn cancel(&self, order_id: &OrderId) -> Result<OrderId> {
        let mut args = Args::new();
        args.insert("order_id".to_string(), json!(order_id.as_str()));
        self.inner.call(&endpoint::CANCEL_ORDER, args).await?;
        Ok(order_id.clone())
    }

    /// Cancel every pending order in the account, returning the cancelled
    /// ids.
    pub async fn cancel_pending(&self, account_id: &AccountId) -> Result<Vec<OrderId>> {
        let pending = self.pending(account_id, None).await?;
        let mut cancelled = Vec::with_capacity(pending.len());
        for order in pending {
            cancelled.push(self.cancel(&order.order_id).await?);
        }
        Ok(cancelled)
    }

    /// Place a market buy.
    pub async fn market_buy(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        quantity: Decimal,
    ) -> Result<Order> {
        self.place(account_id, ticker, OrderAction::Buy, "market", quantity, None, None)
            .await
    }

    /// Place a market sell.
    pub async fn market_sell(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        quantity: Decimal,
    ) -> Result<Order> {
        self.place(account_id, ticker, OrderAction::Sell, "market", quantity, None, None)
            .await
    }

    /// Place a limit buy.
    pub async fn limit_buy(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        quantity: Decimal,
        limit_price: Decimal,
    ) -> Result<Order> {
        self.place(
            account_id,
            ticker,
            OrderAction::Buy,
            "limit",
            quantity,
            Some(limit_price),
            None,
        )
        .await
    }

    /// Place a limit sell.
    pub async fn limit_sell(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        quantity: Decimal,
        limit_price: Decimal,
    ) -> Result<Order> {
        self.place(
            account_id,
            ticker,
            OrderAction::Sell,
            "limit",
            quantity,
            Some(limit_price),
            None,
        )
        .await
    }

    /// Place a stop-limit buy.
    pub async fn stop_limit_buy(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        quantity: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Result<Order> {
        self.place(
            account_id,
            ticker,
            OrderAction::Buy,
            "stop_limit",
            quantity,
            Some(limit_price),
            Some(stop_price),
        )
        .await
    }

    /// Place a stop-limit sell.
    pub async fn stop_limit_sell(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        quantity: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Result<Order> {
        self.place(
            account_id,
            ticker,
            OrderAction::Sell,
            "stop_limit",
            quantity,
            Some(limit_price),
            Some(stop_price),
        )
        .await
    }

    async fn by_status(
        &self,
        account_id: &AccountId,
        status: OrderStatus,
        ticker: Option<&Ticker>,
    ) -> Result<Vec<Order>> {
        let orders = self.all(account_id).await?;
        Ok(orders
            .into_iter()
            .filter(|order| order.status == status)
            .filter(|order| match ticker {
                Some(wanted) => order
                    .ticker()
                    .map(|t| t.weak_eq(wanted))
                    .unwrap_or(false),
                None => true,
            })
            .collect())
    }

    #[allow(clippy::too_many_arguments)]
    async fn place(
        &self,
        account_id: &AccountId,
        ticker: &Ticker,
        action: OrderAction,
        sub_type: &'static str,
        quantity: Decimal,
        limit_price: Option<Decimal>,
        stop_price: Option<Decimal>,
    ) -> Result<Order> {
        let security_id = self.resolve_security_id(ticker).await?;
        let payload = NewOrderPayload {
            account_id: account_id.as_str().to_string(),
            security_id,
            quantity,
            order_type: action.as_order_type(),
            order_sub_type: sub_type,
            time_in_force: "day",
            limit_price,
            stop_price,
        };
        self.inner
            .call_as(&endpoint::PLACE_ORDER, to_args(&payload)?)
            .await
    }

    async fn resolve_security_id(&self, ticker: &Ticker) -> Result<String> {
        if let Some(id) = ticker.id() {
            return Ok(id.to_string());
        }
        let security = DataService::new(self.inner.clone()).security(ticker).await?;
        Ok(security.id)
    }
}
