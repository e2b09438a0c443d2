//! Audio playback backend
//!
//! The output device is owned by a dedicated thread (`OutputStream` is not
//! `Send`). [`AudioPlayer`] forwards commands to it over a channel and
//! republishes its lifecycle as [`PlayerEvent`]s on a broadcast channel.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::model::Track;

const DEVICE_TICK: Duration = Duration::from_millis(10);
const EVENT_CAPACITY: usize = 64;
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Display metadata attached to a media item
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaMetadata {
    pub title: String,
    pub artist: String,
    pub album_title: String,
    pub artwork_uri: Option<String>,
}

/// Something the player can load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaItem {
    pub media_id: String,
    pub uri: String,
    pub metadata: MediaMetadata,
    /// Used until the decoder reports a real length.
    pub duration_hint: Duration,
}

impl MediaItem {
    pub fn from_track(track: &Track) -> Self {
        Self {
            media_id: track.id.to_string(),
            uri: track.preview.clone(),
            metadata: MediaMetadata {
                title: track.title.clone(),
                artist: track.artist.name.clone(),
                album_title: track.album.title.clone(),
                artwork_uri: track.artwork_url().map(str::to_string),
            },
            duration_hint: track.duration(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// Player lifecycle notifications
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    IsPlayingChanged(bool),
    PlaybackStateChanged(PlaybackStatus),
    PositionDiscontinuity(Duration),
    MediaItemTransition(MediaItem),
    Error(String),
}

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("No audio output device available: {0}")]
    DeviceUnavailable(String),

    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("Nothing to play")]
    NoMediaItem,
}

/// The playback surface the controller drives.
///
/// Commands are fire-and-forget; outcomes arrive as [`PlayerEvent`]s.
pub trait MediaPlayer: Send + Sync {
    fn set_media_item(&self, item: MediaItem);
    fn prepare(&self);
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn seek_to(&self, position: Duration);
    fn is_playing(&self) -> bool;
    fn current_position(&self) -> Duration;
    /// Zero while unknown.
    fn duration(&self) -> Duration;
    fn current_media_item(&self) -> Option<MediaItem>;
    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent>;
}

enum PlayerCommand {
    SetMediaItem(MediaItem),
    Prepare,
    Play,
    Pause,
    Stop,
    SeekTo(Duration),
    Shutdown,
}

#[derive(Default)]
struct SharedState {
    item: Option<MediaItem>,
    status: PlaybackStatus,
    is_playing: bool,
    position: Duration,
    duration: Duration,
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// rodio-backed player running on its own thread
pub struct AudioPlayer {
    commands: Sender<PlayerCommand>,
    state: Arc<Mutex<SharedState>>,
    events: broadcast::Sender<PlayerEvent>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (commands, receiver) = mpsc::channel();
        let state = Arc::new(Mutex::new(SharedState::default()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let thread_state = state.clone();
        let thread_events = events.clone();
        let spawned = thread::Builder::new()
            .name("audio-player".to_string())
            .spawn(move || PlayerThread::open(thread_state, thread_events).run(receiver));
        if let Err(e) = spawned {
            tracing::error!(error = %e, "Failed to spawn audio thread");
        }

        Self {
            commands,
            state,
            events,
        }
    }

    fn send(&self, command: PlayerCommand) {
        if self.commands.send(command).is_err() {
            tracing::error!("Audio thread is not running");
            let _ = self
                .events
                .send(PlayerEvent::Error("Audio thread is not running".to_string()));
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
    }
}

impl MediaPlayer for AudioPlayer {
    fn set_media_item(&self, item: MediaItem) {
        self.send(PlayerCommand::SetMediaItem(item));
    }

    fn prepare(&self) {
        self.send(PlayerCommand::Prepare);
    }

    fn play(&self) {
        self.send(PlayerCommand::Play);
    }

    fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    fn stop(&self) {
        self.send(PlayerCommand::Stop);
    }

    fn seek_to(&self, position: Duration) {
        self.send(PlayerCommand::SeekTo(position));
    }

    fn is_playing(&self) -> bool {
        lock(&self.state).is_playing
    }

    fn current_position(&self) -> Duration {
        lock(&self.state).position
    }

    fn duration(&self) -> Duration {
        lock(&self.state).duration
    }

    fn current_media_item(&self) -> Option<MediaItem> {
        lock(&self.state).item.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

struct Device {
    _stream: OutputStream,
    sink: Sink,
}

struct PlayerThread {
    device: Result<Device, String>,
    http: Option<reqwest::blocking::Client>,
    state: Arc<Mutex<SharedState>>,
    events: broadcast::Sender<PlayerEvent>,
    loaded: bool,
}

impl PlayerThread {
    fn open(state: Arc<Mutex<SharedState>>, events: broadcast::Sender<PlayerEvent>) -> Self {
        let device = OutputStream::try_default()
            .map_err(|e| e.to_string())
            .and_then(|(stream, handle)| {
                Sink::try_new(&handle)
                    .map(|sink| Device {
                        _stream: stream,
                        sink,
                    })
                    .map_err(|e| e.to_string())
            });
        match &device {
            Ok(_) => tracing::info!("Audio output opened"),
            Err(e) => tracing::error!(error = %e, "Audio output unavailable"),
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| tracing::error!(error = %e, "Failed to build HTTP client for streaming"))
            .ok();

        Self {
            device,
            http,
            state,
            events,
            loaded: false,
        }
    }

    fn run(mut self, commands: Receiver<PlayerCommand>) {
        loop {
            match commands.recv_timeout(DEVICE_TICK) {
                Ok(PlayerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(command) => self.handle(command),
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.tick();
        }
        if let Ok(device) = &self.device {
            device.sink.clear();
        }
        tracing::debug!("Audio thread stopped");
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    fn handle(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetMediaItem(item) => self.set_media_item(item),
            PlayerCommand::Prepare => self.prepare(),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::SeekTo(position) => self.seek_to(position),
            PlayerCommand::Shutdown => {}
        }
    }

    fn set_media_item(&mut self, item: MediaItem) {
        if let Ok(device) = &self.device {
            device.sink.clear();
        }
        self.loaded = false;

        let was_playing = {
            let mut state = lock(&self.state);
            let was_playing = state.is_playing;
            state.item = Some(item.clone());
            state.status = PlaybackStatus::Idle;
            state.is_playing = false;
            state.position = Duration::ZERO;
            state.duration = item.duration_hint;
            was_playing
        };

        if was_playing {
            self.emit(PlayerEvent::IsPlayingChanged(false));
        }
        tracing::debug!(media_id = %item.media_id, uri = %item.uri, "Media item set");
        self.emit(PlayerEvent::MediaItemTransition(item));
    }

    fn prepare(&mut self) {
        let Some(item) = lock(&self.state).item.clone() else {
            self.emit(PlayerEvent::Error(PlayerError::NoMediaItem.to_string()));
            return;
        };
        let device = match &self.device {
            Ok(device) => device,
            Err(e) => {
                let error = PlayerError::DeviceUnavailable(e.clone());
                self.emit(PlayerEvent::Error(error.to_string()));
                return;
            }
        };

        lock(&self.state).status = PlaybackStatus::Buffering;
        self.emit(PlayerEvent::PlaybackStateChanged(PlaybackStatus::Buffering));

        device.sink.clear();
        match append_source(&device.sink, self.http.as_ref(), &item.uri) {
            Ok(total) => {
                let duration = total.filter(|d| !d.is_zero()).unwrap_or(item.duration_hint);
                {
                    let mut state = lock(&self.state);
                    state.status = PlaybackStatus::Ready;
                    state.position = Duration::ZERO;
                    state.duration = duration;
                }
                self.loaded = true;
                tracing::info!(media_id = %item.media_id, duration_ms = duration.as_millis() as u64, "Media prepared");
                self.emit(PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready));
            }
            Err(e) => {
                lock(&self.state).status = PlaybackStatus::Idle;
                tracing::error!(media_id = %item.media_id, error = %e, "Failed to prepare media");
                self.emit(PlayerEvent::Error(e.to_string()));
            }
        }
    }

    fn play(&mut self) {
        if !self.loaded {
            let has_item = lock(&self.state).item.is_some();
            if has_item {
                self.prepare();
            }
            if !self.loaded {
                return;
            }
        }
        if let Ok(device) = &self.device {
            device.sink.play();
        }
        self.set_playing(true);
    }

    fn pause(&mut self) {
        if let Ok(device) = &self.device {
            if self.loaded {
                device.sink.pause();
                lock(&self.state).position = device.sink.get_pos();
            }
        }
        self.set_playing(false);
    }

    fn stop(&mut self) {
        if let Ok(device) = &self.device {
            device.sink.clear();
        }
        self.loaded = false;
        {
            let mut state = lock(&self.state);
            state.status = PlaybackStatus::Idle;
            state.position = Duration::ZERO;
        }
        self.set_playing(false);
        self.emit(PlayerEvent::PlaybackStateChanged(PlaybackStatus::Idle));
    }

    fn seek_to(&mut self, position: Duration) {
        let Ok(device) = &self.device else {
            return;
        };
        if !self.loaded {
            return;
        }
        let duration = lock(&self.state).duration;
        let target = if duration.is_zero() { position } else { position.min(duration) };

        match device.sink.try_seek(target) {
            Ok(()) => {
                lock(&self.state).position = target;
                self.emit(PlayerEvent::PositionDiscontinuity(target));
            }
            Err(e) => tracing::warn!(error = %e, target_ms = target.as_millis() as u64, "Seek failed"),
        }
    }

    fn set_playing(&self, is_playing: bool) {
        let changed = {
            let mut state = lock(&self.state);
            let changed = state.is_playing != is_playing;
            state.is_playing = is_playing;
            changed
        };
        if changed {
            self.emit(PlayerEvent::IsPlayingChanged(is_playing));
        }
    }

    /// Track the sink position and detect the end of the current item.
    fn tick(&mut self) {
        let Ok(device) = &self.device else {
            return;
        };
        if !self.loaded || device.sink.is_paused() {
            return;
        }

        if device.sink.empty() {
            self.loaded = false;
            {
                let mut state = lock(&self.state);
                state.status = PlaybackStatus::Ended;
                state.position = state.duration;
            }
            self.set_playing(false);
            self.emit(PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ended));
        } else {
            lock(&self.state).position = device.sink.get_pos();
        }
    }
}

fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Decode `uri` into the sink and return the decoder's total duration, if known.
fn append_source(
    sink: &Sink,
    http: Option<&reqwest::blocking::Client>,
    uri: &str,
) -> Result<Option<Duration>, PlayerError> {
    if is_remote(uri) {
        let fetch_error = |source| PlayerError::Fetch {
            url: uri.to_string(),
            source,
        };
        let bytes = match http {
            Some(client) => client.get(uri).send(),
            None => reqwest::blocking::get(uri),
        }
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(fetch_error)?;

        let decoder = Decoder::new(Cursor::new(bytes))?;
        let total = decoder.total_duration();
        sink.append(decoder);
        Ok(total)
    } else {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let file = File::open(path).map_err(|source| PlayerError::Open {
            path: path.to_string(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file))?;
        let total = decoder.total_duration();
        sink.append(decoder);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_track;

    #[test]
    fn media_item_carries_track_metadata() {
        let track = sample_track(42, "Song");
        let item = MediaItem::from_track(&track);

        assert_eq!(item.media_id, "42");
        assert_eq!(item.uri, "https://cdn.example/42.mp3");
        assert_eq!(item.metadata.title, "Song");
        assert_eq!(item.metadata.artist, "Artist");
        assert_eq!(item.metadata.album_title, "Album");
        assert_eq!(item.metadata.artwork_uri.as_deref(), Some("https://covers.example/42.jpg"));
        assert_eq!(item.duration_hint, Duration::from_secs(30));
    }

    #[test]
    fn empty_cover_means_no_artwork() {
        let mut track = sample_track(1, "Song");
        track.album.cover.clear();
        assert!(MediaItem::from_track(&track).metadata.artwork_uri.is_none());
    }

    #[test]
    fn remote_uris_are_detected() {
        assert!(is_remote("https://cdn.example/a.mp3"));
        assert!(is_remote("http://cdn.example/a.mp3"));
        assert!(!is_remote("/home/me/Music/a.mp3"));
        assert!(!is_remote("file:///home/me/Music/a.mp3"));
    }
}
