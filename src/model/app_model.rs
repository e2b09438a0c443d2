//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::playback::{PlaybackInfo, PlaybackSnapshot, PlayerScreenState};
use super::queue::TrackQueue;
use super::track::Track;
use super::types::{ActiveScreen, ContentState, FetchState, ListKind, TrackListScreen, UiState};
use crate::service::Notification;

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Main application model containing all state
pub struct AppModel {
    queue: Arc<Mutex<TrackQueue>>,
    snapshot: Arc<Mutex<PlaybackSnapshot>>,
    player_screen: Arc<Mutex<PlayerScreenState>>,
    now_playing: Arc<Mutex<Option<Notification>>>,
    online: Arc<Mutex<TrackListScreen>>,
    local: Arc<Mutex<TrackListScreen>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(TrackQueue::new())),
            snapshot: Arc::new(Mutex::new(PlaybackSnapshot::default())),
            player_screen: Arc::new(Mutex::new(PlayerScreenState::default())),
            now_playing: Arc::new(Mutex::new(None)),
            online: Arc::new(Mutex::new(TrackListScreen::default())),
            local: Arc::new(Mutex::new(TrackListScreen::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    fn list(&self, kind: ListKind) -> &Arc<Mutex<TrackListScreen>> {
        match kind {
            ListKind::Online => &self.online,
            ListKind::Local => &self.local,
        }
    }

    // ========================================================================
    // Queue
    // ========================================================================

    pub async fn replace_queue(&self, tracks: Vec<Track>) {
        self.queue.lock().await.replace(tracks);
    }

    pub async fn select_in_queue(&self, id: u64) -> Option<Track> {
        self.queue.lock().await.select_by_id(id).cloned()
    }

    pub async fn current_track(&self) -> Option<Track> {
        self.queue.lock().await.current().cloned()
    }

    pub async fn queue_next(&self) -> Option<Track> {
        self.queue.lock().await.next().cloned()
    }

    pub async fn queue_previous(&self) -> Option<Track> {
        self.queue.lock().await.previous().cloned()
    }

    pub async fn queue_tracks(&self) -> Vec<Track> {
        self.queue.lock().await.tracks().to_vec()
    }

    /// 1-based position of the current track and the queue length
    pub async fn queue_position(&self) -> Option<(usize, usize)> {
        let queue = self.queue.lock().await;
        queue.current_index().map(|i| (i + 1, queue.len()))
    }

    // ========================================================================
    // Playback state
    // ========================================================================

    pub async fn get_snapshot(&self) -> PlaybackSnapshot {
        *self.snapshot.lock().await
    }

    pub async fn update_snapshot<F>(&self, update: F) -> PlaybackSnapshot
    where
        F: FnOnce(PlaybackSnapshot) -> PlaybackSnapshot,
    {
        let mut snapshot = self.snapshot.lock().await;
        *snapshot = update(*snapshot);
        *snapshot
    }

    pub async fn is_playing(&self) -> bool {
        self.snapshot.lock().await.is_playing
    }

    pub async fn set_player_screen(&self, state: PlayerScreenState) {
        *self.player_screen.lock().await = state;
    }

    pub async fn get_player_screen(&self) -> PlayerScreenState {
        self.player_screen.lock().await.clone()
    }

    pub async fn set_now_playing(&self, notification: Option<Notification>) {
        *self.now_playing.lock().await = notification;
    }

    pub async fn get_now_playing(&self) -> Option<Notification> {
        self.now_playing.lock().await.clone()
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        PlaybackInfo {
            snapshot: self.get_snapshot().await,
            screen: self.get_player_screen().await,
            now_playing: self.get_now_playing().await,
            queue_position: self.queue_position().await,
        }
    }

    // ========================================================================
    // Track lists
    // ========================================================================

    /// Mark a list as loading and return the generation the result must match.
    pub async fn begin_fetch(&self, kind: ListKind) -> u64 {
        let mut screen = self.list(kind).lock().await;
        screen.generation += 1;
        screen.state = FetchState::Loading;
        screen.generation
    }

    /// Store a fetch outcome unless a newer fetch has started since.
    pub async fn finish_fetch(&self, kind: ListKind, generation: u64, state: FetchState) -> bool {
        let mut screen = self.list(kind).lock().await;
        if screen.generation != generation {
            return false;
        }
        screen.state = state;
        screen.selected = 0;
        true
    }

    pub async fn get_fetch_state(&self, kind: ListKind) -> FetchState {
        self.list(kind).lock().await.state.clone()
    }

    pub async fn list_tracks(&self, kind: ListKind) -> Vec<Track> {
        self.list(kind).lock().await.state.tracks().to_vec()
    }

    pub async fn selected_track(&self, kind: ListKind) -> Option<Track> {
        self.list(kind).lock().await.selected_track().cloned()
    }

    pub async fn get_query(&self, kind: ListKind) -> String {
        self.list(kind).lock().await.query.clone()
    }

    pub async fn set_query(&self, kind: ListKind, query: String) {
        self.list(kind).lock().await.query = query;
    }

    pub async fn append_to_query(&self, kind: ListKind, c: char) {
        self.list(kind).lock().await.query.push(c);
    }

    pub async fn backspace_query(&self, kind: ListKind) {
        self.list(kind).lock().await.query.pop();
    }

    pub async fn move_selection_up(&self, kind: ListKind) {
        self.list(kind).lock().await.move_up();
    }

    pub async fn move_selection_down(&self, kind: ListKind) {
        self.list(kind).lock().await.move_down();
    }

    pub async fn get_content_state(&self) -> ContentState {
        ContentState {
            online: self.online.lock().await.clone(),
            local: self.local.lock().await.clone(),
        }
    }

    // ========================================================================
    // UI
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn active_screen(&self) -> ActiveScreen {
        self.ui_state.lock().await.active_screen
    }

    pub async fn set_active_screen(&self, screen: ActiveScreen) {
        let mut state = self.ui_state.lock().await;
        state.active_screen = screen;
        state.search_focused = false;
    }

    pub async fn cycle_screen_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_screen = state.active_screen.next();
        state.search_focused = false;
    }

    pub async fn cycle_screen_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_screen = state.active_screen.prev();
        state.search_focused = false;
    }

    pub async fn set_search_focused(&self, focused: bool) {
        self.ui_state.lock().await.search_focused = focused;
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() >= ERROR_DISPLAY_TIME {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::track::sample_track;

    #[tokio::test]
    async fn stale_fetch_results_are_dropped() {
        let model = AppModel::new();
        let first = model.begin_fetch(ListKind::Online).await;
        let second = model.begin_fetch(ListKind::Online).await;

        let applied = model
            .finish_fetch(ListKind::Online, first, FetchState::Success(vec![sample_track(1, "old")]))
            .await;
        assert!(!applied);
        assert_eq!(model.get_fetch_state(ListKind::Online).await, FetchState::Loading);

        let applied = model
            .finish_fetch(ListKind::Online, second, FetchState::Success(vec![sample_track(2, "new")]))
            .await;
        assert!(applied);
        assert_eq!(model.list_tracks(ListKind::Online).await[0].id, 2);
        assert!(model.list_tracks(ListKind::Local).await.is_empty());
    }

    #[tokio::test]
    async fn queue_position_is_one_based() {
        let model = AppModel::new();
        model
            .replace_queue(vec![sample_track(1, "a"), sample_track(2, "b"), sample_track(3, "c")])
            .await;
        assert_eq!(model.queue_position().await, None);

        model.select_in_queue(2).await;
        assert_eq!(model.queue_position().await, Some((2, 3)));
    }

    #[tokio::test]
    async fn switching_screens_drops_search_focus() {
        let model = AppModel::new();
        model.set_search_focused(true).await;
        model.cycle_screen_forward().await;

        let ui = model.get_ui_state().await;
        assert_eq!(ui.active_screen, ActiveScreen::Local);
        assert!(!ui.search_focused);
    }
}
