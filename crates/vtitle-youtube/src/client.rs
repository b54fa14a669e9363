//! YouTube Data API v3 client for the `videos` resource.
//!
//! - HTTP client tuning (pooling, request and connect timeouts)
//! - Exponential backoff with jitter on transient read failures
//! - Observability (tracing spans, metrics)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

use crate::error::{YouTubeError, YouTubeResult};
use crate::metrics::record_request;
use crate::retry::RetryConfig;
use crate::types::{Snippet, VideoListResponse, VideoResource, VideoUpdate};

/// Public Data API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

// =============================================================================
// Configuration
// =============================================================================

/// YouTube client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeConfig {
    /// Data API base URL, without trailing slash
    pub api_base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

// =============================================================================
// Platform seam
// =============================================================================

/// Operations the updater needs from the video platform.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Read statistics and snippet with the API key. `None` when no item matches.
    async fn fetch_video(&self, video_id: &str) -> YouTubeResult<Option<VideoResource>>;

    /// Read the snippet as the channel owner. `None` when no item matches.
    async fn fetch_snippet(
        &self,
        access_token: &str,
        video_id: &str,
    ) -> YouTubeResult<Option<Snippet>>;

    /// Write a snippet back. Sent once; failures are never retried here.
    async fn update_video(
        &self,
        access_token: &str,
        update: &VideoUpdate,
    ) -> YouTubeResult<VideoResource>;
}

// =============================================================================
// Client
// =============================================================================

/// YouTube Data API client.
#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    config: YouTubeConfig,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client.
    pub fn new(config: YouTubeConfig, api_key: impl Into<String>) -> YouTubeResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(4)
            .user_agent(concat!("vtitle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(YouTubeError::from)?;

        Ok(Self {
            http,
            config: YouTubeConfig {
                api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
                ..config
            },
            api_key: api_key.into(),
        })
    }

    /// Underlying HTTP client, shared with the OAuth client.
    pub fn http(&self) -> &Client {
        &self.http
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.config.api_base_url)
    }

    /// Execute with retry.
    async fn with_retry<T, F, Fut>(&self, operation: &str, op: F) -> YouTubeResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = YouTubeResult<T>>,
    {
        crate::retry::with_retry(&self.config.retry, operation, op).await
    }

    async fn list_videos(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> YouTubeResult<Option<VideoResource>> {
        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(Self::handle_error_response(operation, response).await);
        }

        let list: VideoListResponse = response.json().await?;
        Ok(list.items.into_iter().next())
    }

    /// Execute a request with tracing and metrics.
    async fn execute_request<T, F>(
        &self,
        operation: &str,
        video_id: &str,
        fut: F,
    ) -> YouTubeResult<T>
    where
        F: std::future::Future<Output = YouTubeResult<T>>,
    {
        let span = info_span!("youtube_request", operation = %operation, video_id = %video_id);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(operation: &str, response: reqwest::Response) -> YouTubeError {
        let status = response.status();
        let retry_after_ms = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return YouTubeError::RateLimited(retry_after_ms.unwrap_or(0));
        }

        YouTubeError::from_http_status(
            status.as_u16(),
            format!("{} failed: {}", operation, api_error_message(&body)),
        )
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn fetch_video(&self, video_id: &str) -> YouTubeResult<Option<VideoResource>> {
        let url = self.videos_url();
        let url = url.as_str();

        self.execute_request(
            "fetch_video",
            video_id,
            self.with_retry("fetch_video", move || {
                let request = self.http.get(url).query(&[
                    ("part", "statistics,snippet"),
                    ("id", video_id),
                    ("key", self.api_key.as_str()),
                ]);
                self.list_videos(request, "fetch_video")
            }),
        )
        .await
    }

    async fn fetch_snippet(
        &self,
        access_token: &str,
        video_id: &str,
    ) -> YouTubeResult<Option<Snippet>> {
        let url = self.videos_url();
        let url = url.as_str();

        let video = self
            .execute_request(
                "fetch_snippet",
                video_id,
                self.with_retry("fetch_snippet", move || {
                    let request = self
                        .http
                        .get(url)
                        .bearer_auth(access_token)
                        .query(&[("part", "snippet"), ("id", video_id)]);
                    self.list_videos(request, "fetch_snippet")
                }),
            )
            .await?;

        match video {
            Some(VideoResource { snippet: Some(snippet), .. }) => Ok(Some(snippet)),
            Some(_) => Err(YouTubeError::invalid_response(format!(
                "video {} returned without a snippet",
                video_id
            ))),
            None => Ok(None),
        }
    }

    async fn update_video(
        &self,
        access_token: &str,
        update: &VideoUpdate,
    ) -> YouTubeResult<VideoResource> {
        // Writes spend quota, so a failed PUT is surfaced without backoff
        self.execute_request("update_video", &update.id, async {
            let response = self
                .http
                .put(self.videos_url())
                .bearer_auth(access_token)
                .query(&[("part", "snippet")])
                .json(update)
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let video: VideoResource = response.json().await?;
                    debug!(video_id = %video.id, "Video snippet updated");
                    Ok(video)
                }
                _ => Err(Self::handle_error_response("update_video", response).await),
            }
        })
        .await
    }
}
