//! Controller module - application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! drives the player and keeps the model in step with it. It is organized
//! into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback control and the progress poll loop
//! - `navigation`: Track list fetching and selection
//! - `player_events`: Player lifecycle event listener

mod input;
mod navigation;
mod playback;
mod player_events;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::audio::MediaPlayer;
use crate::model::AppModel;
use crate::service::{spawn_action_relay, MediaAction, PlaybackService};
use crate::source::MusicRepository;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) repository: Arc<dyn MusicRepository>,
    pub(crate) player: Arc<dyn MediaPlayer>,
    pub(crate) service: PlaybackService,
    actions: mpsc::UnboundedSender<MediaAction>,
    poll_interval: Duration,
    progress_job: Arc<Mutex<Option<JoinHandle<()>>>>,
    background: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl AppController {
    pub fn new(
        model: Arc<AppModel>,
        repository: Arc<dyn MusicRepository>,
        player: Arc<dyn MediaPlayer>,
        service: PlaybackService,
        actions: mpsc::UnboundedSender<MediaAction>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            model,
            repository,
            player,
            service,
            actions,
            poll_interval,
            progress_job: Arc::new(Mutex::new(None)),
            background: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start the player event listeners and the media action relay.
    pub async fn start(&self, actions: mpsc::UnboundedReceiver<MediaAction>) {
        self.service.start_event_listener().await;
        let listener = self.start_player_event_listener();
        let relay = spawn_action_relay(actions, self.clone());
        self.background.lock().await.extend([listener, relay]);
        tracing::info!("Controller started");
    }

    /// Queue a media action as if it came from the now-playing controls.
    pub(crate) async fn send_action(&self, action: MediaAction) {
        if self.actions.send(action).is_err() {
            tracing::warn!(action = %action, "Media action relay is not running");
            self.model
                .set_error(format!("Playback controls unavailable ({action})"))
                .await;
        }
    }

    /// Stop playback and every background task owned by the controller.
    pub async fn shutdown(&self) {
        tracing::info!("Controller shutting down");
        self.stop_progress_update().await;
        self.player.stop();
        self.service.shutdown().await;
        for handle in self.background.lock().await.drain(..) {
            handle.abort();
        }
    }
}
