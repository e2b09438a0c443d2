//! Now-playing notification and the surfaces that display it

use std::sync::Arc;

use async_trait::async_trait;

use super::action::MediaAction;
use crate::audio::MediaItem;
use crate::model::AppModel;

const UNKNOWN_TITLE: &str = "Unknown";
const UNKNOWN_ARTIST: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub media_id: String,
    pub title: String,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub artwork: Option<Arc<[u8]>>,
    pub is_playing: bool,
    /// Cannot be dismissed while playing
    pub ongoing: bool,
    pub actions: Vec<MediaAction>,
    /// Fired when the notification is dismissed
    pub delete_action: MediaAction,
}

impl Notification {
    pub fn build(item: &MediaItem, is_playing: bool) -> Self {
        let or_unknown = |value: &str, fallback: &str| {
            if value.trim().is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            media_id: item.media_id.clone(),
            title: or_unknown(&item.metadata.title, UNKNOWN_TITLE),
            artist: or_unknown(&item.metadata.artist, UNKNOWN_ARTIST),
            artwork_url: item.metadata.artwork_uri.clone(),
            artwork: None,
            is_playing,
            ongoing: is_playing,
            actions: vec![MediaAction::Previous, MediaAction::PlayPause, MediaAction::Next],
            delete_action: MediaAction::Stop,
        }
    }

    pub fn with_artwork(mut self, artwork: Arc<[u8]>) -> Self {
        self.artwork = Some(artwork);
        self
    }
}

/// Where the playback service publishes the notification
#[async_trait]
pub trait NowPlayingSink: Send + Sync {
    async fn notify(&self, notification: Notification);
    async fn cancel(&self);
}

/// Keeps the latest notification in the app model for the now-playing banner
pub struct ModelSink {
    model: Arc<AppModel>,
}

impl ModelSink {
    pub fn new(model: Arc<AppModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl NowPlayingSink for ModelSink {
    async fn notify(&self, notification: Notification) {
        self.model.set_now_playing(Some(notification)).await;
    }

    async fn cancel(&self) {
        self.model.set_now_playing(None).await;
    }
}
