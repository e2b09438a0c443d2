//! Playback control methods

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;

use crate::audio::MediaItem;
use crate::model::{PlaybackSnapshot, PlayerScreenState, Track};
use crate::service::TransportControls;

use super::AppController;

impl AppController {
    /// Load `track` into the player and start it.
    pub async fn play_track(&self, track: Track) {
        let track = match self.resolve_playable(track).await {
            Ok(track) => track,
            Err(message) => {
                tracing::error!(error = %message, "Track cannot be played");
                self.model.set_player_screen(PlayerScreenState::Error(message)).await;
                return;
            }
        };

        let item = MediaItem::from_track(&track);
        tracing::info!(
            track = %track.title,
            artist = %track.artist.name,
            media_id = %item.media_id,
            streamed = track.is_streamed(),
            "Playing track"
        );

        let duration = track.duration();
        self.model
            .update_snapshot(|_| PlaybackSnapshot {
                duration,
                ..PlaybackSnapshot::default()
            })
            .await;
        self.model.set_player_screen(PlayerScreenState::Success(track)).await;
        self.service.start().await;

        self.player.set_media_item(item);
        self.player.prepare();
        self.player.play();
    }

    /// Start the queue's current track.
    pub async fn play_current(&self) {
        match self.model.current_track().await {
            Some(track) => self.play_track(track).await,
            None => {
                tracing::warn!("Play requested with no current track");
                self.model
                    .set_player_screen(PlayerScreenState::Error("No track selected".to_string()))
                    .await;
            }
        }
    }

    /// Catalog listings may omit the preview; fetch the full track once.
    async fn resolve_playable(&self, track: Track) -> Result<Track, String> {
        if track.is_playable() {
            return Ok(track);
        }
        tracing::debug!(id = track.id, "Track has no preview, fetching details");
        match self.repository.get_track(track.id).await {
            Ok(full) if full.is_playable() => Ok(full),
            Ok(_) => Err(format!("No preview available for {}", track.title)),
            Err(e) => Err(e.to_string()),
        }
    }

    pub async fn toggle_play_pause(&self) {
        if self.player.is_playing() {
            tracing::debug!("Pausing playback");
            self.player.pause();
            return;
        }
        if self.player.current_media_item().is_some() {
            tracing::debug!("Resuming playback");
            self.service.start().await;
            self.player.play();
        } else {
            self.play_current().await;
        }
    }

    /// Seek to a fraction of the current item, clamped to `0.0..=1.0`.
    pub async fn seek_to(&self, fraction: f32) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let duration = self.player.duration();
        let position = duration.mul_f32(fraction);
        tracing::debug!(fraction, position_ms = position.as_millis() as u64, "Seeking");
        self.player.seek_to(position);
        self.update_progress().await;
    }

    /// Seek relative to the current progress.
    pub async fn seek_by(&self, delta: f32) {
        let progress = self.model.get_snapshot().await.progress;
        self.seek_to(progress + delta).await;
    }

    pub async fn play_next(&self) {
        match self.model.queue_next().await {
            Some(track) => self.play_track(track).await,
            None => tracing::debug!("Queue is empty, nothing to skip to"),
        }
    }

    pub async fn play_previous(&self) {
        match self.model.queue_previous().await {
            Some(track) => self.play_track(track).await,
            None => tracing::debug!("Queue is empty, nothing to go back to"),
        }
    }

    /// Stop playback and tear down the now-playing surface.
    pub async fn stop(&self) {
        tracing::info!("Stopping playback");
        self.stop_progress_update().await;
        self.player.stop();
        self.model
            .update_snapshot(|s| s.with_playing(false).with_timing(Duration::ZERO, s.duration))
            .await;
        self.service.stop().await;
    }

    /// Start the progress poll loop, replacing any running one.
    pub(crate) async fn start_progress_update(&self) {
        let controller = self.clone();
        let period = self.poll_interval;

        let mut job = self.progress_job.lock().await;
        if let Some(previous) = job.take() {
            previous.abort();
        }
        *job = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                controller.update_progress().await;
            }
        }));
    }

    pub(crate) async fn stop_progress_update(&self) {
        if let Some(job) = self.progress_job.lock().await.take() {
            job.abort();
        }
    }

    pub(crate) async fn is_progress_updating(&self) -> bool {
        self.progress_job
            .lock()
            .await
            .as_ref()
            .is_some_and(|job| !job.is_finished())
    }

    /// Publish the player's position and duration to the snapshot.
    pub(crate) async fn update_progress(&self) {
        let position = self.player.current_position();
        let duration = self.player.duration();
        self.model
            .update_snapshot(|s| s.with_timing(position, duration))
            .await;
    }
}

#[async_trait]
impl TransportControls for AppController {
    async fn play_pause(&self) {
        self.toggle_play_pause().await;
    }

    async fn skip_next(&self) {
        self.play_next().await;
    }

    async fn skip_previous(&self) {
        self.play_previous().await;
    }

    async fn stop(&self) {
        AppController::stop(self).await;
    }
}
