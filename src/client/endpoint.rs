//! Endpoint descriptors and URL building.
//!
//! An [`Endpoint`] is pure data: a method, a path template with `{0}`,
//! `{1}`, ... placeholders, and the ordered argument names that fill them.
//! The static table below is the complete registry consumed by the request
//! pipeline; response handling lives with the services, keeping the table
//! testable as data-only fixtures.

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::{Error, Result};

/// A named argument bag. Keys consumed by URL placeholders are removed
/// during the BUILD stage; whatever remains becomes the JSON request body
/// on non-GET/HEAD methods.
pub(crate) type Args = serde_json::Map<String, Value>;

/// Descriptor for one HTTP operation of the API.
#[derive(Debug)]
pub(crate) struct Endpoint {
    /// Stable name used in error messages
    pub name: &'static str,
    pub method: Method,
    /// Path template with positional placeholders
    pub path: &'static str,
    /// Argument names, in placeholder order: `parameters[i]` fills `{i}`
    pub parameters: &'static [&'static str],
    /// Whether the call carries the access token
    pub auth: bool,
}

impl Endpoint {
    /// BUILD stage: substitute every placeholder from the argument bag,
    /// removing consumed keys, and resolve against the base URL. `Url`
    /// parsing normalizes percent-encoding of substituted values.
    ///
    /// # Errors
    ///
    /// [`Error::MissingParameter`] when a required argument is absent or
    /// null; [`Error::UrlParse`] when the finalized URL is invalid.
    pub(crate) fn build_url(&self, base: &str, args: &mut Args) -> Result<Url> {
        let mut path = self.path.to_string();
        for (position, name) in self.parameters.iter().enumerate() {
            let value = args
                .remove(*name)
                .filter(|value| !value.is_null())
                .ok_or_else(|| Error::MissingParameter {
                    name: (*name).to_string(),
                    endpoint: self.name,
                })?;
            path = path.replace(&format!("{{{}}}", position), &placeholder_text(&value)?);
        }
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    /// Whether the remaining argument bag is discarded rather than sent as
    /// a body.
    pub(crate) fn is_bodyless(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}

/// Render an argument value into URL-placeholder text.
fn placeholder_text(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::InvalidInput(format!(
            "cannot substitute {} into a URL placeholder",
            other
        ))),
    }
}

/// Serialize any model into an argument bag.
pub(crate) fn to_args<T: serde::Serialize>(value: &T) -> Result<Args> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidInput(format!(
            "expected a JSON object for the argument bag, got {}",
            other
        ))),
    }
}

pub(crate) static LOGIN: Endpoint = Endpoint {
    name: "login",
    method: Method::POST,
    path: "/auth/login",
    parameters: &[],
    auth: false,
};

pub(crate) static REFRESH: Endpoint = Endpoint {
    name: "refresh",
    method: Method::POST,
    path: "/auth/refresh",
    parameters: &[],
    auth: false,
};

pub(crate) static ACCOUNT_LIST: Endpoint = Endpoint {
    name: "account-list",
    method: Method::GET,
    path: "/account/list",
    parameters: &[],
    auth: true,
};

pub(crate) static ACCOUNT_HISTORY: Endpoint = Endpoint {
    name: "account-history",
    method: Method::GET,
    path: "/account/history/{0}?account_id={1}",
    parameters: &["interval", "account_id"],
    auth: true,
};

pub(crate) static ACTIVITIES: Endpoint = Endpoint {
    name: "activities",
    method: Method::GET,
    path: "/account/activities?account_ids={0}&limit={1}",
    parameters: &["account_id", "limit"],
    auth: true,
};

pub(crate) static ME: Endpoint = Endpoint {
    name: "me",
    method: Method::GET,
    path: "/me",
    parameters: &[],
    auth: true,
};

pub(crate) static PERSON: Endpoint = Endpoint {
    name: "person",
    method: Method::GET,
    path: "/person",
    parameters: &[],
    auth: true,
};

pub(crate) static BANK_ACCOUNTS: Endpoint = Endpoint {
    name: "bank-accounts",
    method: Method::GET,
    path: "/bank-accounts",
    parameters: &[],
    auth: true,
};

pub(crate) static DEPOSITS: Endpoint = Endpoint {
    name: "deposits",
    method: Method::GET,
    path: "/deposits",
    parameters: &[],
    auth: true,
};

pub(crate) static POSITIONS: Endpoint = Endpoint {
    name: "positions",
    method: Method::GET,
    path: "/account/positions?account_id={0}",
    parameters: &["account_id"],
    auth: true,
};

pub(crate) static ORDERS_BY_PAGE: Endpoint = Endpoint {
    name: "orders-by-page",
    method: Method::GET,
    path: "/orders?offset={0}&account_id={1}",
    parameters: &["offset", "account_id"],
    auth: true,
};

pub(crate) static PLACE_ORDER: Endpoint = Endpoint {
    name: "place-order",
    method: Method::POST,
    path: "/orders",
    parameters: &[],
    auth: true,
};

pub(crate) static CANCEL_ORDER: Endpoint = Endpoint {
    name: "cancel-order",
    method: Method::DELETE,
    path: "/orders/{0}",
    parameters: &["order_id"],
    auth: true,
};

pub(crate) static SECURITIES_SEARCH: Endpoint = Endpoint {
    name: "securities-search",
    method: Method::GET,
    path: "/securities?query={0}",
    parameters: &["query"],
    auth: true,
};

pub(crate) static SECURITY_BY_ID: Endpoint = Endpoint {
    name: "security-by-id",
    method: Method::GET,
    path: "/securities/{0}",
    parameters: &["security_id"],
    auth: true,
};

pub(crate) static EXCHANGE_RATES: Endpoint = Endpoint {
    name: "exchange-rates",
    method: Method::GET,
    path: "/forex",
    parameters: &[],
    auth: true,
};
