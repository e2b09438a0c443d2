//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Top bar (screen tabs, search box)
//! - `content`: Online and local track list screens
//! - `player`: Now-playing screen
//! - `progress`: Progress bar rendering
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod player;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ContentState, PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState, content_state: &ContentState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs + search
                Constraint::Min(0),    // Active screen
                Constraint::Length(3), // Progress bar with playback info
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, content_state, playback.queue_position);

        match ui_state.active_screen.list_kind() {
            Some(kind) => {
                let current_playing_uri = playback.screen.track().map(|t| t.preview.as_str());
                content::render_track_list_screen(
                    frame,
                    chunks[1],
                    kind,
                    content_state.screen(kind),
                    current_playing_uri,
                );
            }
            None => player::render_player(frame, chunks[1], playback),
        }

        progress::render_progress_bar(frame, chunks[2], playback);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
