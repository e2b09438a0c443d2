//! In-memory stand-ins for the player, the repository and the now-playing sink

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::audio::{MediaItem, MediaPlayer, PlayerEvent};
use crate::model::Track;
use crate::service::{Notification, NowPlayingSink};
use crate::source::{MusicRepository, Result, SourceError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PlayerCall {
    SetMediaItem(String),
    Prepare,
    Play,
    Pause,
    Stop,
    SeekTo(Duration),
}

#[derive(Default)]
struct FakeState {
    item: Option<MediaItem>,
    is_playing: bool,
    position: Duration,
    duration: Duration,
}

/// Records commands and applies them synchronously; events are only sent via `emit`.
pub(crate) struct FakePlayer {
    calls: Mutex<Vec<PlayerCall>>,
    state: Mutex<FakeState>,
    events: broadcast::Sender<PlayerEvent>,
}

impl FakePlayer {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            state: Mutex::new(FakeState::default()),
            events: broadcast::channel(64).0,
        }
    }

    pub(crate) fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub(crate) fn loaded_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlayerCall::SetMediaItem(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn set_timing(&self, position: Duration, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.position = position;
        state.duration = duration;
    }

    pub(crate) fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, call: PlayerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaPlayer for FakePlayer {
    fn set_media_item(&self, item: MediaItem) {
        self.record(PlayerCall::SetMediaItem(item.media_id.clone()));
        let mut state = self.state.lock().unwrap();
        state.duration = item.duration_hint;
        state.position = Duration::ZERO;
        state.is_playing = false;
        state.item = Some(item);
    }

    fn prepare(&self) {
        self.record(PlayerCall::Prepare);
    }

    fn play(&self) {
        self.record(PlayerCall::Play);
        self.state.lock().unwrap().is_playing = true;
    }

    fn pause(&self) {
        self.record(PlayerCall::Pause);
        self.state.lock().unwrap().is_playing = false;
    }

    fn stop(&self) {
        self.record(PlayerCall::Stop);
        let mut state = self.state.lock().unwrap();
        state.is_playing = false;
        state.position = Duration::ZERO;
    }

    fn seek_to(&self, position: Duration) {
        self.record(PlayerCall::SeekTo(position));
        self.state.lock().unwrap().position = position;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().is_playing
    }

    fn current_position(&self) -> Duration {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Duration {
        self.state.lock().unwrap().duration
    }

    fn current_media_item(&self) -> Option<MediaItem> {
        self.state.lock().unwrap().item.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

/// Serves fixed listings; searches filter titles by substring.
pub(crate) struct FakeRepository {
    online: Mutex<Result<Vec<Track>>>,
    local: Mutex<Result<Vec<Track>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRepository {
    pub(crate) fn new(online: Vec<Track>, local: Vec<Track>) -> Self {
        Self {
            online: Mutex::new(Ok(online)),
            local: Mutex::new(Ok(local)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn fail_online(&self, error: SourceError) {
        *self.online.lock().unwrap() = Err(error);
    }

    pub(crate) fn set_online(&self, tracks: Vec<Track>) {
        *self.online.lock().unwrap() = Ok(tracks);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn filter_titles(tracks: &Result<Vec<Track>>, query: &str) -> Result<Vec<Track>> {
    let needle = query.to_lowercase();
    tracks.clone().map(|tracks| {
        tracks
            .into_iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect()
    })
}

#[async_trait]
impl MusicRepository for FakeRepository {
    async fn get_chart_tracks(&self) -> Result<Vec<Track>> {
        self.record("chart".to_string());
        self.online.lock().unwrap().clone()
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>> {
        self.record(format!("search:{query}"));
        filter_titles(&self.online.lock().unwrap(), query)
    }

    async fn get_track(&self, id: u64) -> Result<Track> {
        self.record(format!("track:{id}"));
        self.online
            .lock()
            .unwrap()
            .clone()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| SourceError::Network(format!("no track {id}")))
    }

    async fn get_local_tracks(&self) -> Result<Vec<Track>> {
        self.record("local".to_string());
        self.local.lock().unwrap().clone()
    }

    async fn search_local_tracks(&self, query: &str) -> Result<Vec<Track>> {
        self.record(format!("local_search:{query}"));
        filter_titles(&self.local.lock().unwrap(), query)
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
    cancels: AtomicUsize,
}

impl RecordingSink {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub(crate) fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NowPlayingSink for RecordingSink {
    async fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    async fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}
