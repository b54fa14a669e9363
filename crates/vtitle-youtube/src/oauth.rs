//! OAuth2 refresh-token exchange.

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info_span, Instrument};

use crate::error::{YouTubeError, YouTubeResult};
use crate::metrics::record_request;
use crate::token_cache::{OAuthToken, TokenProvider};

/// Google's OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Lifetime assumed when the provider omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Long-lived OAuth client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges a refresh token for access tokens.
#[derive(Clone)]
pub struct OAuthClient {
    http: Client,
    token_url: String,
    credentials: OAuthCredentials,
}

impl OAuthClient {
    pub fn new(http: Client, token_url: impl Into<String>, credentials: OAuthCredentials) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials,
        }
    }

    /// Perform one refresh-token grant. Failures are not retried here.
    pub async fn refresh(&self) -> YouTubeResult<OAuthToken> {
        let span = info_span!("youtube_request", operation = "token_refresh");
        let start = Instant::now();

        let result = self.exchange().instrument(span).await;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request("token_refresh", status, start.elapsed().as_millis() as f64);

        result
    }

    async fn exchange(&self) -> YouTubeResult<OAuthToken> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| YouTubeError::auth_error(format!("Token endpoint unreachable: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(payload) => match payload.error_description {
                    Some(description) => format!("{}: {}", payload.error, description),
                    None => payload.error,
                },
                Err(_) => body,
            };
            return Err(YouTubeError::auth_error(format!(
                "Token refresh rejected ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            YouTubeError::auth_error(format!("Malformed token response: {}", e))
        })?;

        if token.access_token.is_empty() {
            return Err(YouTubeError::auth_error("Token response carried an empty access_token"));
        }

        let expires_in = token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        debug!(expires_in, "Exchanged refresh token");

        Ok(OAuthToken {
            access_token: token.access_token,
            expires_in,
        })
    }
}

#[async_trait]
impl TokenProvider for OAuthClient {
    async fn fetch_token(&self) -> YouTubeResult<OAuthToken> {
        self.refresh().await
    }
}
