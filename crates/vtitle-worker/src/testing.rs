//! In-memory fakes for the platform and token seams.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vtitle_youtube::{
    OAuthToken, Snippet, Statistics, TokenProvider, VideoPlatform, VideoResource, VideoUpdate,
    YouTubeError, YouTubeResult,
};

/// Platform double that records every call in order.
#[derive(Default)]
pub struct FakePlatform {
    videos: Mutex<HashMap<String, VideoResource>>,
    read_failure: Mutex<Option<u16>>,
    write_failures: Mutex<VecDeque<u16>>,
    writes: Mutex<Vec<(String, VideoUpdate)>>,
    events: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, video: VideoResource) {
        self.videos.lock().unwrap().insert(video.id.clone(), video);
    }

    /// Convenience for a video with a title and counters.
    pub fn add_video(&self, id: &str, title: &str, views: u64, likes: u64, comments: u64) {
        self.insert(VideoResource {
            id: id.into(),
            snippet: Some(Snippet {
                title: title.into(),
                category_id: Some("22".into()),
                channel_id: Some("UC123".into()),
                ..Snippet::default()
            }),
            statistics: Some(Statistics {
                view_count: views,
                like_count: likes,
                comment_count: comments,
            }),
        });
    }

    /// Every statistics read fails with this status.
    pub fn fail_reads(&self, status: u16) {
        *self.read_failure.lock().unwrap() = Some(status);
    }

    /// The next writes fail with these statuses, one per write.
    pub fn fail_writes(&self, statuses: &[u16]) {
        self.write_failures.lock().unwrap().extend(statuses.iter().copied());
    }

    /// (access token, payload) of every attempted write.
    pub fn writes(&self) -> Vec<(String, VideoUpdate)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Calls in the order they were made, e.g. `fetch:abc`.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn title_of(&self, id: &str) -> Option<String> {
        self.videos
            .lock()
            .unwrap()
            .get(id)
            .and_then(|v| v.snippet.as_ref())
            .map(|s| s.title.clone())
    }

    fn event(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn fetch_video(&self, video_id: &str) -> YouTubeResult<Option<VideoResource>> {
        self.event(format!("fetch:{}", video_id));
        if let Some(status) = *self.read_failure.lock().unwrap() {
            return Err(YouTubeError::from_http_status(status, "fake read failure"));
        }
        Ok(self.videos.lock().unwrap().get(video_id).cloned())
    }

    async fn fetch_snippet(
        &self,
        _access_token: &str,
        video_id: &str,
    ) -> YouTubeResult<Option<Snippet>> {
        self.event(format!("snippet:{}", video_id));
        Ok(self
            .videos
            .lock()
            .unwrap()
            .get(video_id)
            .map(|v| v.snippet.clone().unwrap_or_default()))
    }

    async fn update_video(
        &self,
        access_token: &str,
        update: &VideoUpdate,
    ) -> YouTubeResult<VideoResource> {
        self.event(format!("update:{}", update.id));
        self.writes
            .lock()
            .unwrap()
            .push((access_token.to_string(), update.clone()));

        if let Some(status) = self.write_failures.lock().unwrap().pop_front() {
            return Err(YouTubeError::from_http_status(status, "fake write failure"));
        }

        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&update.id)
            .ok_or_else(|| YouTubeError::not_found(update.id.clone()))?;
        video.snippet = Some(update.snippet.clone());
        Ok(video.clone())
    }
}

/// Token provider issuing `token-1`, `token-2`, ...
pub struct FakeTokens {
    calls: AtomicU32,
    fail: bool,
}

impl FakeTokens {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            fail: true,
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn fetch_token(&self) -> YouTubeResult<OAuthToken> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(YouTubeError::auth_error("Token refresh rejected (400): invalid_grant"));
        }
        Ok(OAuthToken {
            access_token: format!("token-{n}"),
            expires_in: 3600,
        })
    }
}
