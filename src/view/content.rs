//! Track list screens (online catalog, local library)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{FetchState, ListKind, Track, TrackListScreen};
use super::utils::{calculate_num_width, format_duration, render_scrollable_list, truncate_string};

fn screen_title(kind: ListKind, query: &str) -> String {
    let query = query.trim();
    match (kind, query.is_empty()) {
        (ListKind::Online, true) => " Top Chart ".to_string(),
        (ListKind::Online, false) => format!(" Search: {} ", query),
        (ListKind::Local, true) => " Local Library ".to_string(),
        (ListKind::Local, false) => format!(" Local: {} ", query),
    }
}

pub fn render_track_list_screen(
    frame: &mut Frame,
    area: Rect,
    kind: ListKind,
    screen: &TrackListScreen,
    current_playing_uri: Option<&str>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(screen_title(kind, &screen.query))
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    match &screen.state {
        FetchState::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(loading, area);
        }
        FetchState::Error(message) => {
            let error = Paragraph::new(format!("{}\n\nPress r to retry", message))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(error, area);
        }
        FetchState::Success(tracks) if tracks.is_empty() => {
            let hint = match kind {
                ListKind::Online => "No tracks found",
                ListKind::Local => "No audio files found in the music directory",
            };
            let empty = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
        }
        FetchState::Success(tracks) => {
            let content_width = area.width.saturating_sub(4) as usize;
            let items = track_items(tracks, screen.selected, current_playing_uri, content_width);
            // +1 for header
            render_scrollable_list(frame, area, items, screen.selected + 1, block);
        }
    }
}

fn track_items(
    tracks: &[Track],
    selected_index: usize,
    current_playing_uri: Option<&str>,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(tracks.len());
    let duration_width = 8;
    let fixed_width = 1 + num_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    let mut items: Vec<ListItem<'static>> = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<title_width$}   {:<artist_width$}   {}",
            "#", "Title", "Artist", "Duration",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(tracks.iter().enumerate().map(|(i, track)| {
        let is_playing = current_playing_uri.is_some_and(|uri| uri == track.preview);
        let style = if i == selected_index {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if is_playing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let playing_indicator = if is_playing { "▶" } else { " " };
        let track_num = format!("{}{:<num_width$}", playing_indicator, i + 1);
        let title = truncate_string(&track.title, title_width);
        let artist = truncate_string(&track.artist.name, artist_width);
        let duration = format_duration(track.duration());

        ListItem::new(format!("{}   {}   {}   {}", track_num, title, artist, duration)).style(style)
    }));

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_follow_the_query() {
        assert_eq!(screen_title(ListKind::Online, ""), " Top Chart ");
        assert_eq!(screen_title(ListKind::Online, " daft "), " Search: daft ");
        assert_eq!(screen_title(ListKind::Local, "  "), " Local Library ");
        assert_eq!(screen_title(ListKind::Local, "live"), " Local: live ");
    }
}
