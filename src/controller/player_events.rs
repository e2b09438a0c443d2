//! Player lifecycle event listener

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::audio::{PlaybackStatus, PlayerEvent};
use crate::model::PlayerScreenState;

use super::AppController;

impl AppController {
    pub(crate) fn start_player_event_listener(&self) -> JoinHandle<()> {
        let mut events = self.player.subscribe();
        let controller = self.clone();
        tracing::info!("Starting player event listener");

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if controller.model.should_quit().await {
                            tracing::debug!("Player event listener shutting down");
                            break;
                        }
                        controller.handle_player_event(event).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Player event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    pub async fn handle_player_event(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::IsPlayingChanged(is_playing) => {
                tracing::debug!(is_playing, "PlayerEvent::IsPlayingChanged");
                self.model.update_snapshot(|s| s.with_playing(is_playing)).await;
                if is_playing {
                    self.start_progress_update().await;
                } else {
                    self.stop_progress_update().await;
                    self.update_progress().await;
                }
            }
            PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready) => {
                tracing::debug!(duration_ms = self.player.duration().as_millis() as u64, "PlayerEvent::Ready");
                self.update_progress().await;
            }
            PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ended) => {
                tracing::info!("PlayerEvent::Ended");
                self.stop_progress_update().await;
                self.model
                    .update_snapshot(|s| s.with_playing(false).completed())
                    .await;
                self.play_next().await;
            }
            PlayerEvent::PlaybackStateChanged(status) => {
                tracing::trace!(?status, "PlayerEvent::PlaybackStateChanged");
            }
            PlayerEvent::PositionDiscontinuity(position) => {
                tracing::trace!(position_ms = position.as_millis() as u64, "PlayerEvent::PositionDiscontinuity");
                self.update_progress().await;
            }
            PlayerEvent::MediaItemTransition(item) => {
                tracing::debug!(media_id = %item.media_id, title = %item.metadata.title, "PlayerEvent::MediaItemTransition");
            }
            PlayerEvent::Error(message) => {
                tracing::error!(error = %message, "PlayerEvent::Error");
                self.stop_progress_update().await;
                self.model.update_snapshot(|s| s.with_playing(false)).await;
                self.model.set_error(message.clone()).await;
                self.model.set_player_screen(PlayerScreenState::Error(message)).await;
            }
        }
    }
}
