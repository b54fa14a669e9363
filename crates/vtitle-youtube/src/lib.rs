//! YouTube Data API client.
//!
//! This crate provides:
//! - OAuth2 refresh-token exchange against the Google token endpoint
//! - Access token caching with a refresh margin
//! - Video statistics reads and snippet writes on the `videos` resource
//! - Bounded retry with exponential backoff and request metrics

pub mod client;
pub mod error;
pub mod metrics;
pub mod oauth;
pub mod retry;
pub mod token_cache;
pub mod types;


pub use client::{VideoPlatform, YouTubeClient, YouTubeConfig};
pub use error::{YouTubeError, YouTubeResult};
pub use oauth::{OAuthClient, OAuthCredentials};
pub use retry::RetryConfig;
pub use token_cache::{AccessToken, OAuthToken, TokenCache, TokenProvider};
pub use types::{Snippet, Statistics, VideoListResponse, VideoResource, VideoUpdate};
