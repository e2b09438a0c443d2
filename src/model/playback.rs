//! Playback-related types and state management

use std::time::Duration;

use super::track::Track;
use crate::service::Notification;

/// Immutable playback status published to the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    /// Fraction of the duration elapsed, always within `0.0..=1.0`.
    pub progress: f32,
    pub position: Duration,
    pub duration: Duration,
}

impl PlaybackSnapshot {
    pub fn with_playing(self, is_playing: bool) -> Self {
        Self { is_playing, ..self }
    }

    /// Recompute progress from the player's position and duration.
    ///
    /// A zero duration (nothing loaded yet, or a stream of unknown length)
    /// keeps the previous progress.
    pub fn with_timing(self, position: Duration, duration: Duration) -> Self {
        let progress = progress_fraction(position, duration).unwrap_or(self.progress);
        Self {
            progress,
            position,
            duration,
            ..self
        }
    }

    /// Snapshot for a track that played to its end.
    pub fn completed(self) -> Self {
        Self {
            progress: 1.0,
            position: self.duration,
            ..self
        }
    }
}

pub fn progress_fraction(position: Duration, duration: Duration) -> Option<f32> {
    if duration.is_zero() {
        return None;
    }
    Some((position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32)
}

/// Outcome of loading a track into the now-playing screen
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PlayerScreenState {
    #[default]
    Loading,
    Success(Track),
    Error(String),
}

impl PlayerScreenState {
    pub fn track(&self) -> Option<&Track> {
        match self {
            PlayerScreenState::Success(track) => Some(track),
            _ => None,
        }
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub snapshot: PlaybackSnapshot,
    pub screen: PlayerScreenState,
    pub now_playing: Option<Notification>,
    pub queue_position: Option<(usize, usize)>,
}
