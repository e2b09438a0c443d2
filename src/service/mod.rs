//! Playback service - keeps the now-playing surface in step with the player
//!
//! - `action`: media actions and the relay that executes them
//! - `notification`: the notification value and its sinks

mod action;
mod notification;

pub use action::{dispatch, spawn_action_relay, MediaAction, TransportControls, UnknownAction};
pub use notification::{ModelSink, Notification, NowPlayingSink};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::audio::{MediaPlayer, PlaybackStatus, PlayerEvent};

const ARTWORK_TIMEOUT: Duration = Duration::from_secs(10);

/// Artwork state for the most recent media item. One download per item.
#[derive(Clone)]
enum Artwork {
    Pending(String),
    Failed(String),
    Ready(String, Arc<[u8]>),
}

impl Artwork {
    fn media_id(&self) -> &str {
        match self {
            Artwork::Pending(id) | Artwork::Failed(id) | Artwork::Ready(id, _) => id,
        }
    }
}

#[derive(Clone)]
pub struct PlaybackService {
    player: Arc<dyn MediaPlayer>,
    sink: Arc<dyn NowPlayingSink>,
    foreground: Arc<AtomicBool>,
    http: reqwest::Client,
    artwork: Arc<Mutex<Option<Artwork>>>,
    listener: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl PlaybackService {
    pub fn new(player: Arc<dyn MediaPlayer>, sink: Arc<dyn NowPlayingSink>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(ARTWORK_TIMEOUT).build()?;

        Ok(Self {
            player,
            sink,
            foreground: Arc::new(AtomicBool::new(false)),
            http,
            artwork: Arc::new(Mutex::new(None)),
            listener: Arc::new(Mutex::new(None)),
        })
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    /// Enter the foreground and publish the notification. No-op when already there.
    pub async fn start(&self) {
        if self.foreground.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Playback service started");
        self.refresh().await;
    }

    /// Leave the foreground and withdraw the notification.
    pub async fn stop(&self) {
        self.foreground.store(false, Ordering::SeqCst);
        self.sink.cancel().await;
        tracing::info!("Playback service stopped");
    }

    pub async fn start_event_listener(&self) {
        let mut events = self.player.subscribe();
        let service = self.clone();

        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => service.handle_event(&event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Service event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("Service event listener stopped");
        });

        if let Some(previous) = self.listener.lock().await.replace(handle) {
            previous.abort();
        }
    }

    pub async fn handle_event(&self, event: &PlayerEvent) {
        match event {
            PlayerEvent::IsPlayingChanged(true) if !self.is_foreground() => self.start().await,
            PlayerEvent::IsPlayingChanged(_)
            | PlayerEvent::MediaItemTransition(_)
            | PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready) => {
                if self.is_foreground() {
                    self.refresh().await;
                }
            }
            PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ended) => self.stop().await,
            _ => {}
        }
    }

    pub async fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
        if self.is_foreground() {
            self.stop().await;
        }
    }

    /// Rebuild the notification from the player's current item.
    async fn refresh(&self) {
        let Some(item) = self.player.current_media_item() else {
            return;
        };
        let mut notification = Notification::build(&item, self.player.is_playing());

        let mut artwork = self.artwork.lock().await;
        let known = artwork
            .as_ref()
            .filter(|state| state.media_id() == item.media_id)
            .cloned();

        match known {
            Some(Artwork::Ready(_, bytes)) => notification = notification.with_artwork(bytes),
            // In flight or already failed
            Some(_) => {}
            None => {
                if let Some(url) = item.metadata.artwork_uri.clone() {
                    *artwork = Some(Artwork::Pending(item.media_id.clone()));
                    self.fetch_artwork(item.media_id.clone(), url);
                }
            }
        }
        drop(artwork);

        self.sink.notify(notification).await;
    }

    /// Download artwork in the background and republish if the item is unchanged.
    fn fetch_artwork(&self, media_id: String, url: String) {
        let service = self.clone();
        tokio::spawn(async move {
            let outcome = service.download(&url).await;

            {
                let mut artwork = service.artwork.lock().await;
                let wanted = matches!(&*artwork, Some(Artwork::Pending(id)) if *id == media_id);
                if !wanted {
                    return;
                }
                *artwork = Some(match &outcome {
                    Ok(bytes) => Artwork::Ready(media_id.clone(), bytes.clone()),
                    Err(_) => Artwork::Failed(media_id.clone()),
                });
            }

            let bytes = match outcome {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "Artwork fetch failed");
                    return;
                }
            };

            let Some(item) = service.player.current_media_item() else {
                return;
            };
            if item.media_id != media_id || !service.is_foreground() {
                return;
            }
            let notification = Notification::build(&item, service.player.is_playing()).with_artwork(bytes);
            service.sink.notify(notification).await;
        });
    }

    async fn download(&self, url: &str) -> reqwest::Result<Arc<[u8]>> {
        let bytes = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
        Ok(Arc::from(bytes.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MediaItem;
    use crate::model::sample_track;
    use crate::testing::{FakePlayer, RecordingSink};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_with(player: Arc<FakePlayer>, sink: Arc<RecordingSink>) -> PlaybackService {
        PlaybackService::new(player, sink).unwrap()
    }

    fn without_artwork(id: u64) -> MediaItem {
        let mut item = MediaItem::from_track(&sample_track(id, "Song"));
        item.metadata.artwork_uri = None;
        item
    }

    fn with_artwork(id: u64, url: String) -> MediaItem {
        let mut item = MediaItem::from_track(&sample_track(id, "Song"));
        item.metadata.artwork_uri = Some(url);
        item
    }

    /// The service calls a track start produces, back to back.
    async fn run_track_start(service: &PlaybackService, item: &MediaItem) {
        service.start().await;
        service
            .handle_event(&PlayerEvent::MediaItemTransition(item.clone()))
            .await;
        service
            .handle_event(&PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready))
            .await;
        service.handle_event(&PlayerEvent::IsPlayingChanged(true)).await;
    }

    async fn wait_for_artwork(service: &PlaybackService) -> Artwork {
        for _ in 0..200 {
            if let Some(state) = service.artwork.lock().await.clone() {
                if !matches!(state, Artwork::Pending(_)) {
                    return state;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("artwork download never settled");
    }

    #[tokio::test]
    async fn artwork_is_downloaded_once_per_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cover.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let item = with_artwork(5, format!("{}/cover.jpg", server.uri()));
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(item.clone());
        player.play();
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player.clone(), sink.clone());

        run_track_start(&service, &item).await;
        assert!(matches!(wait_for_artwork(&service).await, Artwork::Ready(..)));

        player.pause();
        service.handle_event(&PlayerEvent::IsPlayingChanged(false)).await;

        let last = sink.notifications().pop().unwrap();
        assert_eq!(last.artwork.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_artwork_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let item = with_artwork(6, format!("{}/missing.jpg", server.uri()));
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(item.clone());
        player.play();
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player.clone(), sink.clone());

        run_track_start(&service, &item).await;
        assert!(matches!(wait_for_artwork(&service).await, Artwork::Failed(_)));

        player.pause();
        service.handle_event(&PlayerEvent::IsPlayingChanged(false)).await;
        player.play();
        service.handle_event(&PlayerEvent::IsPlayingChanged(true)).await;

        assert!(sink.notifications().iter().all(|n| n.artwork.is_none()));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(without_artwork(1));
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player, sink.clone());

        service.start().await;
        service.start().await;

        assert!(service.is_foreground());
        assert_eq!(sink.notifications().len(), 1);
    }

    #[tokio::test]
    async fn playing_enters_foreground_and_ended_leaves_it() {
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(without_artwork(7));
        player.play();
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player, sink.clone());

        service.handle_event(&PlayerEvent::IsPlayingChanged(true)).await;
        assert!(service.is_foreground());
        let last = sink.notifications().pop().unwrap();
        assert_eq!(last.media_id, "7");
        assert!(last.is_playing);

        service
            .handle_event(&PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ended))
            .await;
        assert!(!service.is_foreground());
        assert_eq!(sink.cancels(), 1);
    }

    #[tokio::test]
    async fn pause_updates_the_notification() {
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(without_artwork(3));
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player.clone(), sink.clone());
        service.start().await;

        player.pause();
        service.handle_event(&PlayerEvent::IsPlayingChanged(false)).await;

        let last = sink.notifications().pop().unwrap();
        assert!(!last.is_playing);
        assert!(!last.ongoing);
    }

    #[tokio::test]
    async fn background_events_are_ignored() {
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(without_artwork(3));
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player, sink.clone());

        service
            .handle_event(&PlayerEvent::MediaItemTransition(without_artwork(4)))
            .await;
        service
            .handle_event(&PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready))
            .await;

        assert!(sink.notifications().is_empty());
    }

    #[tokio::test]
    async fn stop_withdraws_the_notification() {
        let player = Arc::new(FakePlayer::new());
        player.set_media_item(without_artwork(3));
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(player, sink.clone());

        service.start().await;
        service.stop().await;

        assert!(!service.is_foreground());
        assert_eq!(sink.cancels(), 1);
    }
}
