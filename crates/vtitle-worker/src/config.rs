//! Worker configuration.
//!
//! Everything comes from environment variables (optionally seeded from a
//! `.env` file by the binary). Required credentials and at least one video
//! must be present; tuning knobs fall back to defaults.

use std::fmt;
use std::time::Duration;

use vtitle_models::VideoTask;
use vtitle_youtube::client::DEFAULT_API_BASE_URL;
use vtitle_youtube::oauth::DEFAULT_TOKEN_URL;
use vtitle_youtube::{OAuthCredentials, RetryConfig, YouTubeConfig};

use crate::error::{WorkerError, WorkerResult};

/// Default pause between cycles.
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 480;

/// Longest accepted pause between cycles (one week).
pub const MAX_UPDATE_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default pause between two videos of the same cycle.
pub const DEFAULT_ITEM_DELAY_MS: u64 = 2000;

/// Static secrets. Read-only after load.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// When set, only videos owned by this channel are rewritten
    pub channel_id: Option<String>,
}

impl Credentials {
    pub fn oauth(&self) -> OAuthCredentials {
        OAuthCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub credentials: Credentials,
    /// Videos processed each cycle, in order
    pub tasks: Vec<VideoTask>,
    /// Time between cycle starts
    pub update_interval: Duration,
    /// Pause between consecutive videos in a cycle
    pub item_delay: Duration,
    /// Data API client settings
    pub youtube: YouTubeConfig,
    /// OAuth token endpoint
    pub token_url: String,
    /// Port for the Prometheus listener, if any
    pub metrics_port: Option<u16>,
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WorkerResult<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| WorkerError::config(format!("{} must be set", key)))
        };
        let number = |key: &str, default: u64| {
            get(key)
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(default)
        };

        let credentials = Credentials {
            api_key: require("YOUTUBE_API_KEY")?,
            client_id: require("YOUTUBE_CLIENT_ID")?,
            client_secret: require("YOUTUBE_CLIENT_SECRET")?,
            refresh_token: require("YOUTUBE_REFRESH_TOKEN")?,
            channel_id: get("YOUTUBE_CHANNEL_ID"),
        };

        let mut tasks = Vec::new();
        for index in 1.. {
            let Some(video_id) = get(&format!("VIDEO_ID_{}", index)) else {
                break;
            };
            let original_title = lookup(&format!("VIDEO_TITLE_{}", index))
                .filter(|title| !title.trim().is_empty())
                .ok_or_else(|| {
                    WorkerError::config(format!(
                        "VIDEO_TITLE_{} must be set for VIDEO_ID_{}",
                        index, index
                    ))
                })?;
            tasks.push(VideoTask::new(video_id, original_title));
        }
        if tasks.is_empty() {
            return Err(WorkerError::config(
                "at least one VIDEO_ID_1 / VIDEO_TITLE_1 pair must be set",
            ));
        }

        let interval_secs = number("UPDATE_INTERVAL_SECS", DEFAULT_UPDATE_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(WorkerError::config("UPDATE_INTERVAL_SECS must be greater than zero"));
        }
        if interval_secs > MAX_UPDATE_INTERVAL_SECS {
            return Err(WorkerError::config(format!(
                "UPDATE_INTERVAL_SECS must be at most {} (got {})",
                MAX_UPDATE_INTERVAL_SECS, interval_secs
            )));
        }
        let update_interval = Duration::from_secs(interval_secs);

        let retry_max = number("YOUTUBE_RETRY_MAX", 2);
        let max_retries = u32::try_from(retry_max).map_err(|_| {
            WorkerError::config(format!("YOUTUBE_RETRY_MAX is out of range: {}", retry_max))
        })?;

        let youtube = YouTubeConfig {
            api_base_url: get("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeout: Duration::from_secs(number("YOUTUBE_TIMEOUT_SECS", 30)),
            connect_timeout: Duration::from_secs(number("YOUTUBE_CONNECT_TIMEOUT_SECS", 5)),
            retry: RetryConfig {
                max_retries,
                base_delay_ms: number("YOUTUBE_RETRY_BASE_MS", 250),
                max_delay_ms: number("YOUTUBE_RETRY_MAX_MS", 5000),
            },
        };

        Ok(Self {
            credentials,
            tasks,
            update_interval,
            item_delay: Duration::from_millis(number("ITEM_DELAY_MS", DEFAULT_ITEM_DELAY_MS)),
            youtube,
            token_url: get("YOUTUBE_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            metrics_port: get("METRICS_PORT").and_then(|s| s.parse().ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<String, String> {
        [
            ("YOUTUBE_API_KEY", "key"),
            ("YOUTUBE_CLIENT_ID", "client"),
            ("YOUTUBE_CLIENT_SECRET", "secret"),
            ("YOUTUBE_REFRESH_TOKEN", "refresh"),
            ("VIDEO_ID_1", "abc"),
            ("VIDEO_TITLE_1", "My First Video"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn load(vars: &HashMap<String, String>) -> WorkerResult<WorkerConfig> {
        WorkerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.tasks, vec![VideoTask::new("abc", "My First Video")]);
        assert_eq!(
            config.update_interval,
            Duration::from_secs(DEFAULT_UPDATE_INTERVAL_SECS)
        );
        assert_eq!(config.item_delay, Duration::from_millis(2000));
        assert_eq!(config.youtube, YouTubeConfig::default());
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.credentials.channel_id, None);
        assert_eq!(config.metrics_port, None);
    }

    #[test]
    fn test_missing_required_credential() {
        for key in [
            "YOUTUBE_API_KEY",
            "YOUTUBE_CLIENT_ID",
            "YOUTUBE_CLIENT_SECRET",
            "YOUTUBE_REFRESH_TOKEN",
        ] {
            let mut vars = base_vars();
            vars.remove(key);
            let err = load(&vars).unwrap_err();
            assert!(matches!(err, WorkerError::Config(_)));
            assert!(err.to_string().contains(key));
        }
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("YOUTUBE_CLIENT_SECRET".into(), "   ".into());
        assert!(matches!(load(&vars), Err(WorkerError::Config(_))));
    }

    #[test]
    fn test_requires_at_least_one_video() {
        let mut vars = base_vars();
        vars.remove("VIDEO_ID_1");
        vars.remove("VIDEO_TITLE_1");
        assert!(matches!(load(&vars), Err(WorkerError::Config(_))));
    }

    #[test]
    fn test_video_id_without_title() {
        let mut vars = base_vars();
        vars.insert("VIDEO_ID_2".into(), "def".into());
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("VIDEO_TITLE_2"));
    }

    #[test]
    fn test_videos_read_in_order_until_gap() {
        let mut vars = base_vars();
        vars.insert("VIDEO_ID_2".into(), "def".into());
        vars.insert("VIDEO_TITLE_2".into(), " Second ".into());
        vars.insert("VIDEO_ID_4".into(), "ignored".into());
        vars.insert("VIDEO_TITLE_4".into(), "Ignored".into());

        let config = load(&vars).unwrap();
        let ids: Vec<_> = config.tasks.iter().map(|t| t.video_id.as_str()).collect();
        assert_eq!(ids, vec!["abc", "def"]);
        // Titles are kept verbatim
        assert_eq!(config.tasks[1].original_title, " Second ");
    }

    #[test]
    fn test_tuning_overrides() {
        let mut vars = base_vars();
        vars.insert("UPDATE_INTERVAL_SECS".into(), "60".into());
        vars.insert("ITEM_DELAY_MS".into(), "0".into());
        vars.insert("YOUTUBE_RETRY_MAX".into(), "5".into());
        vars.insert("YOUTUBE_CHANNEL_ID".into(), "UC123".into());
        vars.insert("METRICS_PORT".into(), "9100".into());
        vars.insert("YOUTUBE_TIMEOUT_SECS".into(), "not-a-number".into());

        let config = load(&vars).unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(60));
        assert_eq!(config.item_delay, Duration::ZERO);
        assert_eq!(config.youtube.retry.max_retries, 5);
        assert_eq!(config.youtube.timeout, Duration::from_secs(30));
        assert_eq!(config.credentials.channel_id.as_deref(), Some("UC123"));
        assert_eq!(config.metrics_port, Some(9100));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut vars = base_vars();
        vars.insert("UPDATE_INTERVAL_SECS".into(), "0".into());
        assert!(matches!(load(&vars), Err(WorkerError::Config(_))));
    }

    #[test]
    fn test_interval_above_cap_rejected() {
        let mut vars = base_vars();
        vars.insert("UPDATE_INTERVAL_SECS".into(), u64::MAX.to_string());
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, WorkerError::Config(_)));
        assert!(err.to_string().contains("UPDATE_INTERVAL_SECS"));

        vars.insert(
            "UPDATE_INTERVAL_SECS".into(),
            MAX_UPDATE_INTERVAL_SECS.to_string(),
        );
        let config = load(&vars).unwrap();
        assert_eq!(
            config.update_interval,
            Duration::from_secs(MAX_UPDATE_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_retry_max_out_of_range_rejected() {
        let mut vars = base_vars();
        // One past u32::MAX must not wrap to zero retries
        vars.insert("YOUTUBE_RETRY_MAX".into(), "4294967296".into());
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, WorkerError::Config(_)));
        assert!(err.to_string().contains("YOUTUBE_RETRY_MAX"));

        vars.insert("YOUTUBE_RETRY_MAX".into(), u32::MAX.to_string());
        assert_eq!(load(&vars).unwrap().youtube.retry.max_retries, u32::MAX);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let config = load(&base_vars()).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"secret\""));
        assert!(!debug.contains("\"refresh\""));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        for (key, value) in base_vars() {
            std::env::set_var(key, value);
        }
        std::env::remove_var("VIDEO_ID_2");

        let config = WorkerConfig::from_env().unwrap();
        assert_eq!(config.tasks.len(), 1);
        assert_eq!(config.credentials.api_key, "key");
    }
}
