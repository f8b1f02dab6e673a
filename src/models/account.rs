//! Account, position, and activity models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::{AccountId, Money};
use super::security::StockInfo;

/// A Trade account (TFSA, RRSP, crypto, or non-registered).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The account id
    pub id: AccountId,
    /// Account type reported by the API (e.g. `"ca_tfsa"`)
    #[serde(default)]
    pub account_type: Option<String>,
    /// Base currency of the account
    #[serde(default)]
    pub base_currency: Option<String>,
    /// Funds available for trading
    #[serde(default)]
    pub buying_power: Option<Money>,
    /// Current account balance
    #[serde(default)]
    pub current_balance: Option<Money>,
    /// Net lifetime deposits
    #[serde(default)]
    pub net_deposits: Option<Money>,
    /// Funds available to withdraw
    #[serde(default)]
    pub available_to_withdraw: Option<Money>,
    /// External custodian account number
    #[serde(default)]
    pub custodian_account_number: Option<String>,
    /// Account status (e.g. `"open"`)
    #[serde(default)]
    pub status: Option<String>,
    /// When the account was opened
    #[serde(default)]
    pub opened_at: Option<DateTime<Utc>>,
    /// When the account was closed, if it has been
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Whether the account is open (not closed/deleted).
    pub fn is_open(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A position held in an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Internal security id
    pub id: String,
    /// Listing details of the held security
    #[serde(default)]
    pub stock: Option<StockInfo>,
    /// Number of units held
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Total cost basis
    #[serde(default)]
    pub book_value: Option<Money>,
    /// Current market value
    #[serde(default)]
    pub market_value: Option<Money>,
    /// Account holding the position
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

/// Time window for account value history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryInterval {
    /// One day
    OneDay,
    /// One week
    OneWeek,
    /// One month
    OneMonth,
    /// Three months
    ThreeMonths,
    /// One year
    OneYear,
    /// Since account opening
    All,
}

impl HistoryInterval {
    /// The interval as the API path segment expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryInterval::OneDay => "1d",
            HistoryInterval::OneWeek => "1w",
            HistoryInterval::OneMonth => "1m",
            HistoryInterval::ThreeMonths => "3m",
            HistoryInterval::OneYear => "1y",
            HistoryInterval::All => "all",
        }
    }
}

/// One sampled point of account value history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Sample date (`YYYY-MM-DD`)
    pub date: String,
    /// Total account value at the sample
    #[serde(default)]
    pub value: Option<Money>,
    /// Equity portion of the value
    #[serde(default)]
    pub equity_value: Option<Money>,
    /// Net deposits up to the sample
    #[serde(default)]
    pub net_deposits: Option<Money>,
}

/// An entry in the account activity feed (orders, deposits, dividends, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity id
    pub id: String,
    /// Kind of activity, as reported under `object`
    #[serde(rename = "object", default)]
    pub kind: Option<String>,
    /// Account the activity belongs to
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Symbol involved, when the activity concerns a security
    #[serde(default)]
    pub symbol: Option<String>,
    /// When the activity occurred
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A linked external bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    /// Bank account id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub account_name: Option<String>,
    /// Institution name
    #[serde(default)]
    pub institution_name: Option<String>,
    /// Masked account number
    #[serde(default)]
    pub account_number: Option<String>,
}

/// A deposit from a linked bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    /// Deposit id
    pub id: String,
    /// Source bank account id
    #[serde(default)]
    pub bank_account_id: Option<String>,
    /// Deposited amount
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Deposit currency
    #[serde(default)]
    pub currency: Option<String>,
    /// Deposit status (e.g. `"accepted"`)
    #[serde(default)]
    pub status: Option<String>,
}

/// The authenticated user, from the `/me` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User's email address
    #[serde(default)]
    pub email: Option<String>,
    /// Canonical user id
    #[serde(default)]
    pub canonical_id: Option<String>,
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Identity details, from the `/person` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number
    #[serde(default)]
    pub phone_number: Option<String>,
}
