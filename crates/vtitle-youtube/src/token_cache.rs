//! Access token caching for YouTube writes.
//!
//! Provides an async-aware token cache with:
//! - Refresh margin so a token never expires in the middle of a request
//! - Single-flight refresh (double-checked under the write lock)
//! - Forced refresh for callers that saw the API reject a token

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{YouTubeError, YouTubeResult};
use crate::metrics::record_token_refresh;

/// Refresh margin: a token with less than 5 minutes left is refreshed.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

/// Upper bound on the lifetime we trust from the provider.
const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Raw token as issued by the OAuth provider.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Something that can exchange long-lived credentials for an access token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> YouTubeResult<OAuthToken>;
}

/// Cached bearer token with absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Valid only if at least the refresh margin remains.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now >= Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Owner of the current access token.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    cache: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(None),
        }
    }

    /// Return a token with at least the refresh margin left, refreshing if needed.
    pub async fn ensure_valid_token(&self) -> YouTubeResult<AccessToken> {
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
                return Ok(token.clone());
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while we waited
        if let Some(token) = cache.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
            return Ok(token.clone());
        }

        self.refresh(&mut cache).await
    }

    /// Refresh unconditionally, e.g. after the API answered 401.
    pub async fn force_refresh(&self) -> YouTubeResult<AccessToken> {
        let mut cache = self.cache.write().await;
        self.refresh(&mut cache).await
    }

    async fn refresh(&self, cache: &mut Option<AccessToken>) -> YouTubeResult<AccessToken> {
        match self.provider.fetch_token().await {
            Ok(issued) => {
                let now = Utc::now();
                let lifetime =
                    Duration::seconds(issued.expires_in.min(MAX_TOKEN_LIFETIME_SECS) as i64);
                let token = AccessToken {
                    value: issued.access_token,
                    expires_at: now + lifetime,
                };

                if !token.is_valid_at(now) {
                    warn!(
                        expires_in = issued.expires_in,
                        "Issued access token is shorter-lived than the refresh margin"
                    );
                }

                record_token_refresh(true);
                debug!(expires_at = %token.expires_at, "Refreshed YouTube access token");

                *cache = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                record_token_refresh(false);
                *cache = None;
                Err(match e {
                    YouTubeError::AuthError(_) => e,
                    other => YouTubeError::auth_error(format!("Token refresh failed: {}", other)),
                })
            }
        }
    }
}
