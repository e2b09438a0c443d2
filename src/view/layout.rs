//! Top bar rendering (screen tabs, search box)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Padding, Paragraph, Tabs},
    Frame,
};

use crate::model::{ActiveScreen, ContentState, UiState};

const SCREENS: [ActiveScreen; 3] = [ActiveScreen::Online, ActiveScreen::Local, ActiveScreen::Player];

pub fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    queue_position: Option<(usize, usize)>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(38), // Screen tabs
            Constraint::Min(0),     // Search input
        ])
        .split(area);

    let selected = SCREENS
        .iter()
        .position(|s| *s == ui_state.active_screen)
        .unwrap_or(0);
    let tabs = Tabs::new(SCREENS.iter().map(|s| s.title()))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" Music "));
    frame.render_widget(tabs, chunks[0]);

    let Some(kind) = ui_state.active_screen.list_kind() else {
        let queue_text = match queue_position {
            Some((index, total)) => format!("Track {} of {}", index, total),
            None => "Queue is empty".to_string(),
        };
        let queue = Paragraph::new(queue_text)
            .style(Style::default().fg(Color::Cyan))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Queue ")
                    .padding(Padding::horizontal(1)),
            );
        frame.render_widget(queue, chunks[1]);
        return;
    };

    let query = &content_state.screen(kind).query;
    let focused = ui_state.search_focused;

    let (search_text, search_style) = if query.is_empty() && !focused {
        ("Press / to search...".to_string(), Style::default().fg(Color::DarkGray))
    } else if focused {
        (format!("{}▏", query), Style::default().fg(Color::Green))
    } else {
        (query.clone(), Style::default().fg(Color::White))
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(if focused {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, chunks[1]);
}
