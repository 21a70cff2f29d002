//! # Token Cache
//!
//! Holds the bearer token obtained from the API key and decides when it has to be
//! exchanged again.
//!
//! Concurrent callers that find the cache empty or expired may each run an
//! exchange; the last one to finish wins. The lock is never held across an
//! `.await`, so a slow exchange does not block callers that still see a valid token.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::claims;
use crate::domain::error::ApiError;
use crate::domain::traits::TokenExchange;
use crate::strings::logs;

/// Validity assumed for tokens whose expiry cannot be decoded.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// A bearer token together with the instant it stops being usable.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedToken {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

impl CachedToken {
    /// Build a cache entry for a freshly issued token.
    ///
    /// Falls back to one hour from `issued_at` when the token's own expiry is unreadable.
    pub fn issued(token: String, issued_at: DateTime<Utc>) -> Self {
        let expiry = match claims::decode_expiry(&token) {
            Ok(expiry) => expiry,
            Err(err) => {
                tracing::warn!("{}", logs::token_expiry_fallback(&err));
                issued_at + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS)
            }
        };
        Self { token, expiry }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}

/// Process-lifetime cache of the current bearer token. Starts empty.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a valid bearer token, exchanging `api_key` for a new one when needed.
    ///
    /// On exchange failure the cached entry is left exactly as it was.
    pub async fn get_token<E>(&self, exchange: &E, api_key: &str) -> Result<String, ApiError>
    where
        E: TokenExchange + ?Sized,
    {
        if let Some(token) = self.valid_token(Utc::now()) {
            tracing::debug!("{}", logs::TOKEN_CACHE_HIT);
            return Ok(token);
        }

        let token = exchange.exchange(api_key).await.inspect_err(|e| {
            tracing::warn!("{}", logs::token_exchange_failed(&e.to_string()));
        })?;

        let entry = CachedToken::issued(token, Utc::now());
        tracing::info!("{}", logs::token_refreshed(&entry.expiry.to_rfc3339()));

        let token = entry.token.clone();
        self.store(entry);
        Ok(token)
    }

    /// Cached token if it is still valid at `now`
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<String> {
        self.slot
            .lock()
            .as_ref()
            .filter(|entry| entry.is_valid_at(now))
            .map(|entry| entry.token.clone())
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<CachedToken> {
        self.slot.lock().clone()
    }

    /// Replace the cached entry. The only place the slot is written with a token.
    pub fn store(&self, entry: CachedToken) {
        *self.slot.lock() = Some(entry);
    }

    /// Drop the cached token so the next call re-authenticates.
    ///
    /// Only clears the slot while it still holds `rejected`; a token refreshed
    /// since then is kept. Returns whether anything was cleared.
    pub fn invalidate(&self, rejected: &str) -> bool {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|entry| entry.token == rejected) {
            slot.take();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::claims::encode_test_token;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out a fixed token and counts how often it was asked.
    struct CountingExchange {
        token: String,
        calls: AtomicUsize,
    }

    impl CountingExchange {
        fn new(token: impl Into<String>) -> Self {
            Self {
                token: token.into(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenExchange for CountingExchange {
        async fn exchange(&self, api_key: &str) -> Result<String, ApiError> {
            assert_eq!(api_key, "pk_test");
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.token.clone())
        }
    }

    struct FailingExchange;

    #[async_trait]
    impl TokenExchange for FailingExchange {
        async fn exchange(&self, _api_key: &str) -> Result<String, ApiError> {
            Err(ApiError::Auth("Request failed with status code 401".into()))
        }
    }

    fn token_expiring_in(seconds: i64) -> String {
        let exp = Utc::now().timestamp() + seconds;
        encode_test_token(&json!({"sub": "acct_1", "exp": exp}))
    }

    #[tokio::test]
    async fn test_valid_token_served_from_cache() {
        let cache = TokenCache::new();
        let exchange = CountingExchange::new(token_expiring_in(3600));

        let first = cache.get_token(&exchange, "pk_test").await.unwrap();
        let second = cache.get_token(&exchange, "pk_test").await.unwrap();

        assert_eq!(first, second);
        // Only the first call hits the network
        assert_eq!(exchange.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_once() {
        let cache = TokenCache::new();
        assert!(cache.snapshot().is_none());

        let token = token_expiring_in(600);
        let exchange = CountingExchange::new(token.clone());
        cache.get_token(&exchange, "pk_test").await.unwrap();

        assert_eq!(exchange.calls(), 1);
        let entry = cache.snapshot().unwrap();
        assert_eq!(entry.token, token);
        assert!(entry.expiry > Utc::now());
    }

    #[tokio::test]
    async fn test_expired_token_refreshed() {
        let cache = TokenCache::new();
        cache.store(CachedToken {
            token: "stale".into(),
            expiry: Utc::now() - Duration::seconds(5),
        });

        let fresh = token_expiring_in(3600);
        let exchange = CountingExchange::new(fresh.clone());
        let token = cache.get_token(&exchange, "pk_test").await.unwrap();

        assert_eq!(token, fresh);
        assert_eq!(exchange.calls(), 1);
        let entry = cache.snapshot().unwrap();
        assert_eq!(entry.token, fresh);
        assert!(entry.expiry > Utc::now() + Duration::seconds(3000));
    }

    #[tokio::test]
    async fn test_undecodable_token_gets_one_hour() {
        let cache = TokenCache::new();
        let exchange = CountingExchange::new("opaque-token");

        let before = Utc::now();
        cache.get_token(&exchange, "pk_test").await.unwrap();
        let after = Utc::now();

        let entry = cache.snapshot().unwrap();
        let lifetime = Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS);
        assert!(entry.expiry >= before + lifetime);
        assert!(entry.expiry <= after + lifetime);
    }

    #[tokio::test]
    async fn test_failed_exchange_leaves_cache_untouched() {
        let cache = TokenCache::new();
        let stale = CachedToken {
            token: "stale".into(),
            expiry: Utc::now() - Duration::seconds(1),
        };
        cache.store(stale.clone());

        let err = cache.get_token(&FailingExchange, "pk_test").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert!(err.to_string().starts_with("Authentication failed"));
        assert_eq!(cache.snapshot(), Some(stale));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let cache = TokenCache::new();
        let exchange = CountingExchange::new(token_expiring_in(3600));

        let token = cache.get_token(&exchange, "pk_test").await.unwrap();
        assert!(cache.invalidate(&token));
        assert!(cache.snapshot().is_none());

        cache.get_token(&exchange, "pk_test").await.unwrap();
        assert_eq!(exchange.calls(), 2);
    }

    #[test]
    fn test_stale_rejection_keeps_newer_token() {
        let cache = TokenCache::new();
        let fresh = CachedToken {
            token: "fresh".into(),
            expiry: Utc::now() + Duration::seconds(600),
        };
        cache.store(fresh.clone());

        // A late 401 for a token that was already replaced
        assert!(!cache.invalidate("old"));
        assert_eq!(cache.snapshot(), Some(fresh));
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let entry = CachedToken {
            token: "t".into(),
            expiry: now,
        };
        // Equal to expiry counts as expired
        assert!(!entry.is_valid_at(now));
        assert!(entry.is_valid_at(now - Duration::milliseconds(1)));
    }
}
