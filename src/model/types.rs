//! Core type definitions for the application

use std::time::Instant;

use super::track::Track;

/// Which screen is currently shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveScreen {
    Online,
    Local,
    Player,
}

impl ActiveScreen {
    pub fn next(self) -> Self {
        match self {
            ActiveScreen::Online => ActiveScreen::Local,
            ActiveScreen::Local => ActiveScreen::Player,
            ActiveScreen::Player => ActiveScreen::Online,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveScreen::Online => ActiveScreen::Player,
            ActiveScreen::Local => ActiveScreen::Online,
            ActiveScreen::Player => ActiveScreen::Local,
        }
    }

    pub fn list_kind(self) -> Option<ListKind> {
        match self {
            ActiveScreen::Online => Some(ListKind::Online),
            ActiveScreen::Local => Some(ListKind::Local),
            ActiveScreen::Player => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActiveScreen::Online => "Online",
            ActiveScreen::Local => "Local",
            ActiveScreen::Player => "Now Playing",
        }
    }
}

/// The two track-list screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Online,
    Local,
}

/// Outcome of a screen's list fetch
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Loading,
    Success(Vec<Track>),
    Error(String),
}

impl FetchState {
    pub fn tracks(&self) -> &[Track] {
        match self {
            FetchState::Success(tracks) => tracks,
            _ => &[],
        }
    }
}

/// State of one track-list screen
#[derive(Clone, Debug, Default)]
pub struct TrackListScreen {
    pub state: FetchState,
    pub query: String,
    pub selected: usize,
    /// Bumped on every fetch so a slow response cannot overwrite a newer one.
    pub generation: u64,
}

impl TrackListScreen {
    pub fn selected_track(&self) -> Option<&Track> {
        self.state.tracks().get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.state.tracks().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }
}

/// Both list screens, cloned out of the model for rendering
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub online: TrackListScreen,
    pub local: TrackListScreen,
}

impl ContentState {
    pub fn screen(&self, kind: ListKind) -> &TrackListScreen {
        match kind {
            ListKind::Online => &self.online,
            ListKind::Local => &self.local,
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_screen: ActiveScreen,
    pub search_focused: bool,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_screen: ActiveScreen::Online,
            search_focused: false,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::track::sample_track;

    #[test]
    fn screens_cycle_both_ways() {
        let mut screen = ActiveScreen::Online;
        for _ in 0..3 {
            screen = screen.next();
        }
        assert_eq!(screen, ActiveScreen::Online);
        assert_eq!(ActiveScreen::Online.prev(), ActiveScreen::Player);
        assert_eq!(ActiveScreen::Player.list_kind(), None);
        assert_eq!(ActiveScreen::Local.list_kind(), Some(ListKind::Local));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut screen = TrackListScreen {
            state: FetchState::Success(vec![sample_track(1, "a"), sample_track(2, "b")]),
            ..Default::default()
        };
        screen.move_up();
        assert_eq!(screen.selected, 0);
        screen.move_down();
        screen.move_down();
        assert_eq!(screen.selected, 1);
        assert_eq!(screen.selected_track().map(|t| t.id), Some(2));

        screen.state = FetchState::Error("boom".to_string());
        assert!(screen.selected_track().is_none());
    }
}
