//! Client configuration and optional feature toggles.

use std::collections::HashSet;
use std::time::Duration;

use crate::{Error, Result};

/// Default API host. All endpoints resolve against this base.
pub const DEFAULT_BASE_URL: &str = "https://trade-service.wealthsimple.com";

/// Default capacity of the securities lookup cache.
pub const DEFAULT_SECURITIES_CACHE_CAPACITY: usize = 100;

/// Configuration for the Wealthsimple Trade client.
///
/// # Example
///
/// ```
/// use wstrade_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for API requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Capacity of the securities lookup cache (used only when the
    /// `securities_cache` feature is enabled)
    pub securities_cache_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("wstrade-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            securities_cache_capacity: DEFAULT_SECURITIES_CACHE_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL. Mainly useful for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the capacity of the securities lookup cache.
    pub fn with_securities_cache_capacity(mut self, capacity: usize) -> Self {
        self.securities_cache_capacity = capacity;
        self
    }
}

/// An optional behavior the client can turn on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Refresh an expired access token automatically before a protected
    /// call proceeds. Enabled by default.
    ImplicitTokenRefresh,
    /// Memoize security lookups in a FIFO cache keyed by normalized ticker.
    /// Disabled by default.
    SecuritiesCache,
}

impl Feature {
    /// The feature's string name as accepted by [`FeatureConfig::set`].
    pub fn name(&self) -> &'static str {
        match self {
            Feature::ImplicitTokenRefresh => "implicit_token_refresh",
            Feature::SecuritiesCache => "securities_cache",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "implicit_token_refresh" => Some(Feature::ImplicitTokenRefresh),
            "securities_cache" => Some(Feature::SecuritiesCache),
            _ => None,
        }
    }
}

/// Session-scoped set of enabled/disabled features.
///
/// Features are identified by name; the `no_` prefix disables. Absence from
/// the disabled set means enabled, so toggling a feature twice to the same
/// state is a no-op.
///
/// # Example
///
/// ```
/// use wstrade_rs::{Feature, FeatureConfig};
///
/// let mut features = FeatureConfig::default();
/// assert!(features.is_enabled(Feature::ImplicitTokenRefresh));
/// assert!(!features.is_enabled(Feature::SecuritiesCache));
///
/// features.set("no_implicit_token_refresh")?;
/// assert!(!features.is_enabled(Feature::ImplicitTokenRefresh));
/// # Ok::<(), wstrade_rs::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    disabled: HashSet<Feature>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        let mut disabled = HashSet::new();
        disabled.insert(Feature::SecuritiesCache);
        Self { disabled }
    }
}

impl FeatureConfig {
    /// Toggle a feature by name. A bare name enables; a `no_` prefix
    /// disables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFeature`] embedding the offending input
    /// verbatim when the name (after prefix handling) is not recognized.
    pub fn set(&mut self, name: &str) -> Result<()> {
        let (bare, enable) = match name.strip_prefix("no_") {
            Some(rest) => (rest, false),
            None => (name, true),
        };
        let feature = Feature::from_name(bare)
            .ok_or_else(|| Error::UnsupportedFeature(name.to_string()))?;
        if enable {
            self.enable(feature);
        } else {
            self.disable(feature);
        }
        Ok(())
    }

    /// Enable a feature.
    pub fn enable(&mut self, feature: Feature) {
        self.disabled.remove(&feature);
    }

    /// Disable a feature.
    pub fn disable(&mut self, feature: Feature) {
        self.disabled.insert(feature);
    }

    /// Returns `true` if the feature is currently enabled.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        !self.disabled.contains(&feature)
    }
}
