//! Now-playing screen

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{PlaybackInfo, PlayerScreenState, Track};
use super::utils::format_duration;

pub fn render_player(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Now Playing ")
        .padding(Padding::new(2, 2, 1, 1))
        .border_style(Style::default().fg(Color::Green));

    let paragraph = match &playback.screen {
        PlayerScreenState::Loading => Paragraph::new("Pick a track on the Online or Local screen and press Enter")
            .style(Style::default().fg(Color::DarkGray)),
        PlayerScreenState::Error(message) => Paragraph::new(message.clone())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false }),
        PlayerScreenState::Success(track) => Paragraph::new(track_lines(track, playback)),
    };

    frame.render_widget(paragraph.block(block), area);
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>10}  ", label), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn track_lines(track: &Track, playback: &PlaybackInfo) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            track.title.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Artist", track.artist.name.clone()),
        field("Album", track.album.title.clone()),
        field("Length", format_duration(track.duration())),
        field(
            "Source",
            if track.is_streamed() { "Preview stream".to_string() } else { track.preview.clone() },
        ),
    ];

    if let Some((index, total)) = playback.queue_position {
        lines.push(field("Queue", format!("{} of {}", index, total)));
    }

    if let Some(now_playing) = &playback.now_playing {
        if let Some(artwork) = &now_playing.artwork {
            lines.push(field("Artwork", format!("{} KB", artwork.len().div_ceil(1024))));
        }
        lines.push(Line::from(""));

        let mut controls: Vec<Span<'static>> = now_playing
            .actions
            .iter()
            .flat_map(|action| {
                [
                    Span::styled(
                        format!("[ {} ]", action.label(now_playing.is_playing)),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                ]
            })
            .collect();
        controls.push(Span::styled(
            format!("[ {} ]", now_playing.delete_action.label(false)),
            Style::default().fg(Color::Red),
        ));
        lines.push(Line::from(controls));
    }

    lines
}
