//! Accounts service: account lists, balances history, activities.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::client::endpoint::{self, Args};
use crate::client::ClientInner;
use crate::models::{
    Account, AccountId, Activity, BankAccount, Deposit, HistoryInterval, HistorySnapshot, Person,
    Position, User,
};
use crate::Result;

/// Default number of activity entries fetched per call.
const ACTIVITIES_LIMIT: u32 = 99;

/// Service for account operations.
///
/// # Example
///
/// ```no_run
/// use wstrade_rs::models::HistoryInterval;
///
/// # async fn example(client: wstrade_rs::WsTradeClient) -> wstrade_rs::Result<()> {
/// let accounts = client.accounts().all().await?;
/// for account in &accounts {
///     let history = client
///         .accounts()
///         .history(&account.id, HistoryInterval::OneMonth)
///         .await?;
///     println!("{}: {} samples", account.id, history.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

#[derive(Deserialize)]
struct Results<T> {
    results: Vec<T>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// All open accounts.
    pub async fn all(&self) -> Result<Vec<Account>> {
        let response: Results<Account> = self
            .inner
            .call_as(&endpoint::ACCOUNT_LIST, Args::new())
            .await?;
        Ok(response
            .results
            .into_iter()
            .filter(Account::is_open)
            .collect())
    }

    /// Ids of all open accounts.
    pub async fn ids(&self) -> Result<Vec<AccountId>> {
        Ok(self.all().await?.into_iter().map(|a| a.id).collect())
    }

    /// Sampled value history of an account over an interval.
    pub async fn history(
        &self,
        account_id: &AccountId,
        interval: HistoryInterval,
    ) -> Result<Vec<HistorySnapshot>> {
        let mut args = Args::new();
        args.insert("interval".to_string(), json!(interval.as_str()));
        args.insert("account_id".to_string(), json!(account_id.as_str()));
        let response: Results<HistorySnapshot> = self
            .inner
            .call_as(&endpoint::ACCOUNT_HISTORY, args)
            .await?;
        Ok(response.results)
    }

    /// Most recent activity entries for an account.
    pub async fn activities(&self, account_id: &AccountId) -> Result<Vec<Activity>> {
        let mut args = Args::new();
        args.insert("account_id".to_string(), json!(account_id.as_str()));
        args.insert("limit".to_string(), json!(ACTIVITIES_LIMIT));
        let response: Results<Activity> = self.inner.call_as(&endpoint::ACTIVITIES, args).await?;
        Ok(response.results)
    }

    /// Positions held in an account.
    pub async fn positions(&self, account_id: &AccountId) -> Result<Vec<Position>> {
        let mut args = Args::new();
        args.insert("account_id".to_string(), json!(account_id.as_str()));
        let response: Results<Position> = self.inner.call_as(&endpoint::POSITIONS, args).await?;
        Ok(response.results)
    }

    /// The authenticated user.
    pub async fn me(&self) -> Result<User> {
        self.inner.call_as(&endpoint::ME, Args::new()).await
    }

    /// Identity details of the account holder.
    pub async fn person(&self) -> Result<Person> {
        self.inner.call_as(&endpoint::PERSON, Args::new()).await
    }

    /// Linked external bank accounts.
    pub async fn bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let response: Results<BankAccount> = self
            .inner
            .call_as(&endpoint::BANK_ACCOUNTS, Args::new())
            .await?;
        Ok(response.results)
    }

    /// Deposits made from linked bank accounts.
    pub async fn deposits(&self) -> Result<Vec<Deposit>> {
        let response: Results<Deposit> =
            self.inner.call_as(&endpoint::DEPOSITS, Args::new()).await?;
        Ok(response.results)
    }
}
