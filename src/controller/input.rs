//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveScreen;
use crate::service::MediaAction;

use super::AppController;

/// Fraction of the track skipped by one seek key press
pub const SEEK_STEP: f32 = 0.05;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let model = &self.model;

        // Error message blocks all other interactions
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return;
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return;
        }

        let ui_state = model.get_ui_state().await;
        let list_kind = ui_state.active_screen.list_kind();

        if ui_state.search_focused {
            if let Some(kind) = list_kind {
                match key.code {
                    KeyCode::Enter => self.submit_search(kind).await,
                    KeyCode::Esc => model.set_search_focused(false).await,
                    KeyCode::Backspace => model.backspace_query(kind).await,
                    KeyCode::Tab => model.cycle_screen_forward().await,
                    KeyCode::BackTab => model.cycle_screen_backward().await,
                    KeyCode::Char(c) => {
                        // Ctrl+Q still quits while typing
                        if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                            model.set_should_quit(true).await;
                        } else {
                            model.append_to_query(kind, c).await;
                        }
                    }
                    _ => {}
                }
                return;
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => model.set_should_quit(true).await,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                model.cycle_screen_backward().await
            }
            KeyCode::Tab => model.cycle_screen_forward().await,
            KeyCode::BackTab => model.cycle_screen_backward().await,
            KeyCode::Char('1') => model.set_active_screen(ActiveScreen::Online).await,
            KeyCode::Char('2') => model.set_active_screen(ActiveScreen::Local).await,
            KeyCode::Char('3') => model.set_active_screen(ActiveScreen::Player).await,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => model.show_help_popup().await,

            KeyCode::Char(' ') => self.send_action(MediaAction::PlayPause).await,
            KeyCode::Char('n') | KeyCode::Char('N') => self.send_action(MediaAction::Next).await,
            KeyCode::Char('p') | KeyCode::Char('P') => self.send_action(MediaAction::Previous).await,
            KeyCode::Char('s') | KeyCode::Char('S') => self.send_action(MediaAction::Stop).await,
            KeyCode::Left => self.seek_by(-SEEK_STEP).await,
            KeyCode::Right => self.seek_by(SEEK_STEP).await,

            code => {
                if let Some(kind) = list_kind {
                    match code {
                        KeyCode::Char('/') => model.set_search_focused(true).await,
                        KeyCode::Up => model.move_selection_up(kind).await,
                        KeyCode::Down => model.move_selection_down(kind).await,
                        KeyCode::Enter => self.select_track(kind).await,
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            self.refresh_list(kind);
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
