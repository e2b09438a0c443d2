//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `track`: Track metadata shared by the catalog and the local library
//! - `queue`: The ordered track list in play and its current-position pointer
//! - `types`: Core type definitions (screens, fetch outcomes, UI state)
//! - `playback`: Playback snapshot and now-playing screen state
//! - `app_model`: Main application model with state management methods

mod track;
mod queue;
mod types;
mod playback;
mod app_model;

#[cfg(test)]
pub(crate) use track::sample_track;

// Re-export all public types for convenient access
pub use track::{Album, Artist, LocalTrack, Track};

pub use queue::TrackQueue;

pub use types::{
    ActiveScreen, ContentState, FetchState, ListKind, TrackListScreen, UiState,
};

pub use playback::{
    progress_fraction, PlaybackInfo, PlaybackSnapshot, PlayerScreenState,
};

pub use app_model::AppModel;
