//! The client and its request/authentication pipeline.
//!
//! Every API call runs the same pipeline: BUILD the URL from an endpoint
//! descriptor and an argument bag, AUTHENTICATE (implicitly refreshing an
//! expired token when the feature is on), SEND, and CLASSIFY the response
//! against the success set {200, 201}. Transport errors propagate unchanged;
//! there is no retry beyond the single refresh-then-proceed step.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock as StdRwLock};

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{AccountsService, DataService, OrdersService, QuotesService};
use crate::api::quotes::QuoteProvider;
use crate::auth::{OtpProvider, Session};
use crate::cache::FifoCache;
use crate::client::config::{ClientConfig, Feature, FeatureConfig};
use crate::client::endpoint::{Args, Endpoint};
use crate::client::headers::HeaderRegistry;
use crate::models::{Exchange, Security};
use crate::{Error, Result};

/// Returns `true` for the response statuses treated as success.
///
/// 201 Created is in the set because order placement answers with it.
pub(crate) fn is_success(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// The main client for the Wealthsimple Trade API.
///
/// The client owns a session, a feature configuration, a custom header
/// registry, and the securities cache, and hands out per-resource services.
///
/// # Example
///
/// ```no_run
/// use wstrade_rs::WsTradeClient;
///
/// # async fn example() -> wstrade_rs::Result<()> {
/// let client = WsTradeClient::login("me@example.com", "hunter2").await?;
///
/// let accounts = client.accounts().all().await?;
/// println!("{} open accounts", accounts.len());
/// # Ok(())
/// # }
/// ```
pub struct WsTradeClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
    pub(crate) features: StdRwLock<FeatureConfig>,
    pub(crate) headers: Arc<HeaderRegistry>,
    pub(crate) securities_cache: StdMutex<FifoCache<String, Security>>,
    pub(crate) quote_providers: StdRwLock<HashMap<Exchange, Arc<dyn QuoteProvider>>>,
}

impl WsTradeClient {
    /// Log in with email and password (no 2FA) using the default config.
    pub async fn login(email: &str, password: &str) -> Result<Self> {
        Self::login_with_config(email, password, ClientConfig::default()).await
    }

    /// Log in with email, password, and a one-time passcode.
    pub async fn login_with_otp(email: &str, password: &str, otp: &str) -> Result<Self> {
        let client = Self::unauthenticated(ClientConfig::default())?;
        client
            .inner
            .session
            .authenticate(email, password, Some(otp))
            .await?;
        Ok(client)
    }

    /// Log in with an [`OtpProvider`] for accounts with 2FA enabled.
    pub async fn login_with_provider(
        email: &str,
        password: &str,
        provider: &dyn OtpProvider,
    ) -> Result<Self> {
        let client = Self::unauthenticated(ClientConfig::default())?;
        client
            .inner
            .session
            .authenticate_with_provider(email, password, provider)
            .await?;
        Ok(client)
    }

    /// Log in with email/password and a custom configuration.
    pub async fn login_with_config(
        email: &str,
        password: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = Self::unauthenticated(config)?;
        client
            .inner
            .session
            .authenticate(email, password, None)
            .await?;
        Ok(client)
    }

    /// Resume a client from externally persisted tokens.
    pub fn from_tokens(
        access: impl Into<String>,
        refresh: Option<String>,
        expires: Option<i64>,
    ) -> Result<Self> {
        let config = ClientConfig::default();
        let session = Session::from_tokens(&config.base_url, access, refresh, expires);
        Self::with_session(session, config)
    }

    /// Create a client from an existing session and configuration.
    ///
    /// The session is attached to the client's configured transport and
    /// custom header registry, so login and refresh calls carry the same
    /// timeout, user agent, and headers as every other request.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when the configured securities cache
    /// capacity is zero.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        if config.securities_cache_capacity == 0 {
            return Err(Error::InvalidInput(
                "securities cache capacity must be positive".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let headers = Arc::new(HeaderRegistry::new());
        let session = session.with_transport(http.clone(), headers.clone());
        let securities_cache = FifoCache::new(config.securities_cache_capacity);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                config,
                features: StdRwLock::new(FeatureConfig::default()),
                headers,
                securities_cache: StdMutex::new(securities_cache),
                quote_providers: StdRwLock::new(HashMap::new()),
            }),
        })
    }

    fn unauthenticated(config: ClientConfig) -> Result<Self> {
        Self::with_session(Session::new(&config.base_url), config)
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get the market data service.
    pub fn data(&self) -> DataService {
        DataService::new(self.inner.clone())
    }

    /// Get the quotes service.
    pub fn quotes(&self) -> QuotesService {
        QuotesService::new(self.inner.clone())
    }

    /// The custom header registry applied to every outgoing request.
    pub fn headers(&self) -> &HeaderRegistry {
        &self.inner.headers
    }

    /// Toggle an optional feature by name (`no_` prefix disables).
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedFeature`] for unrecognized names.
    pub fn set_feature(&self, name: &str) -> Result<()> {
        self.inner
            .features
            .write()
            .expect("feature config lock poisoned")
            .set(name)
    }

    /// Whether a feature is currently enabled.
    pub fn feature_enabled(&self, feature: Feature) -> bool {
        self.inner
            .features
            .read()
            .expect("feature config lock poisoned")
            .is_enabled(feature)
    }

    /// Manually refresh the session token.
    pub async fn refresh_session(&self) -> Result<()> {
        self.inner.session.refresh().await
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }
}

impl ClientInner {
    /// Run one call through the pipeline and return the raw JSON payload.
    pub(crate) async fn call(&self, endpoint: &'static Endpoint, mut args: Args) -> Result<Value> {
        // BUILD
        let url = endpoint.build_url(&self.config.base_url, &mut args)?;

        // AUTHENTICATE
        if endpoint.auth {
            self.ensure_session_valid().await?;
        }

        let mut request = self.http.request(endpoint.method.clone(), url.clone());
        if endpoint.auth {
            if let Some(token) = self.session.access_token().await {
                // Bare token, no scheme prefix.
                let value = HeaderValue::from_str(token.expose_secret())
                    .map_err(|_| Error::Authentication("malformed access token".to_string()))?;
                request = request.header(AUTHORIZATION, value);
            }
        }
        // Custom headers append in registration order; duplicates survive.
        for (name, value) in self.headers.snapshot() {
            request = request.header(name, value);
        }
        if !endpoint.is_bodyless() {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(&args);
        }

        tracing::trace!(endpoint = endpoint.name, url = %url, "dispatching request");

        // SEND: transport errors propagate unchanged.
        let response = request.send().await?;

        // CLASSIFY
        let status = response.status();
        if is_success(status) {
            Ok(response.json().await?)
        } else {
            let body = response.json().await.unwrap_or_default();
            Err(Error::request_failed(status, body))
        }
    }

    /// Run one call and deserialize the payload into the caller's model.
    pub(crate) async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &'static Endpoint,
        args: Args,
    ) -> Result<T> {
        let payload = self.call(endpoint, args).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// AUTHENTICATE stage: refresh an expired token before proceeding.
    ///
    /// With `implicit_token_refresh` disabled the expiry check is skipped
    /// entirely and a possibly-stale token is sent as-is.
    pub(crate) async fn ensure_session_valid(&self) -> Result<()> {
        let implicit = self
            .features
            .read()
            .expect("feature config lock poisoned")
            .is_enabled(Feature::ImplicitTokenRefresh);
        if !implicit {
            return Ok(());
        }
        if self.session.access_token().await.is_none() {
            return Ok(());
        }
        if !self.session.is_expired().await {
            return Ok(());
        }
        if !self.session.has_refresh_token().await {
            return Err(Error::TokenExpired);
        }
        // Rechecks expiry under the write lock, so racing callers produce
        // one refresh rather than one each.
        self.session
            .refresh_if_expired()
            .await
            .map_err(|source| Error::RefreshFailed {
                source: Box::new(source),
            })
    }

    /// Whether a feature is enabled, for service-side checks.
    pub(crate) fn feature_enabled(&self, feature: Feature) -> bool {
        self.features
            .read()
            .expect("feature config lock poisoned")
            .is_enabled(feature)
    }
}

impl Clone for WsTradeClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for WsTradeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTradeClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_set_is_200_and_201() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::CREATED));
        assert!(!is_success(StatusCode::NO_CONTENT));
        assert!(!is_success(StatusCode::UNAUTHORIZED));
        assert!(!is_success(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_fails_before_send() {
        let session = Session::from_tokens("https://example.invalid", "tok", None, Some(0));
        let client = WsTradeClient::with_session(session, ClientConfig::default()).unwrap();
        assert!(matches!(
            client.inner.ensure_session_valid().await,
            Err(Error::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_disabled_refresh_skips_expiry_check() {
        let session = Session::from_tokens("https://example.invalid", "tok", None, Some(0));
        let client = WsTradeClient::with_session(session, ClientConfig::default()).unwrap();
        client.set_feature("no_implicit_token_refresh").unwrap();
        assert!(client.inner.ensure_session_valid().await.is_ok());
    }

    #[test]
    fn test_zero_cache_capacity_is_rejected() {
        let session = Session::from_tokens("https://example.invalid", "tok", None, None);
        let config = ClientConfig::default().with_securities_cache_capacity(0);
        assert!(matches!(
            WsTradeClient::with_session(session, config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_session_shares_the_client_header_registry() {
        let session = Session::from_tokens("https://example.invalid", "tok", None, None);
        let client = WsTradeClient::with_session(session, ClientConfig::default()).unwrap();
        client.headers().add("X-Device-Id", "abc").unwrap();

        let session_headers = client.inner.session.headers_handle();
        assert!(Arc::ptr_eq(session_headers, &client.inner.headers));
        assert_eq!(session_headers.values().len(), 1);
    }

    #[tokio::test]
    async fn test_unexpired_token_needs_no_refresh() {
        let session =
            Session::from_tokens("https://example.invalid", "tok", None, Some(i64::MAX));
        let client = WsTradeClient::with_session(session, ClientConfig::default()).unwrap();
        assert!(client.inner.ensure_session_valid().await.is_ok());
    }
}
