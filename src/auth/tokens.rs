//! In-memory token storage with merge-on-update semantics.

use secrecy::SecretString;

/// A partial token update, typically extracted from the response headers of
/// a login or refresh call. Fields left as `None` are preserved in the store.
#[derive(Debug, Default)]
pub struct TokenUpdate {
    /// New access token, if issued
    pub access: Option<String>,
    /// New refresh token, if issued
    pub refresh: Option<String>,
    /// New expiry as epoch seconds, if reported
    pub expires: Option<i64>,
}

/// Holds the current access/refresh tokens and their expiry.
///
/// The store starts empty and is updated after every successful login or
/// refresh. Updates merge: fields omitted from a [`TokenUpdate`] are never
/// cleared. Nothing here is persisted; resuming a session from saved tokens
/// is a caller concern (see `Session::from_tokens`).
#[derive(Default)]
pub struct TokenStore {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
    expires: Option<i64>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a partial update into the store. `None` fields are left as-is.
    pub fn store(&mut self, update: TokenUpdate) {
        if let Some(access) = update.access {
            self.access = Some(SecretString::from(access));
        }
        if let Some(refresh) = update.refresh {
            self.refresh = Some(SecretString::from(refresh));
        }
        if let Some(expires) = update.expires {
            self.expires = Some(expires);
        }
    }

    /// Returns `true` iff an expiry is known and `now` (epoch seconds) has
    /// reached it.
    pub fn expired_at(&self, now: i64) -> bool {
        self.expires.is_some_and(|expires| now >= expires)
    }

    /// Like [`expired_at`](Self::expired_at), with the system clock as `now`.
    pub fn expired(&self) -> bool {
        self.expired_at(chrono::Utc::now().timestamp())
    }

    /// The current access token.
    pub fn access(&self) -> Option<&SecretString> {
        self.access.as_ref()
    }

    /// The current refresh token.
    pub fn refresh(&self) -> Option<&SecretString> {
        self.refresh.as_ref()
    }

    /// The current expiry in epoch seconds.
    pub fn expires(&self) -> Option<i64> {
        self.expires
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("access", &self.access.as_ref().map(|_| "[REDACTED]"))
            .field("refresh", &self.refresh.as_ref().map(|_| "[REDACTED]"))
            .field("expires", &self.expires)
            .finish()
    }
}

impl TokenUpdate {
    /// Shorthand for a full update with all three fields present.
    pub fn full(access: impl Into<String>, refresh: impl Into<String>, expires: i64) -> Self {
        Self {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
            expires: Some(expires),
        }
    }
}
