//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlaybackInfo;
use super::utils::format_duration;

/// Status line shown as the gauge title, taken from the now-playing notification
pub(crate) fn status_text(playback: &PlaybackInfo) -> String {
    match &playback.now_playing {
        Some(now_playing) => {
            let icon = if playback.snapshot.is_playing { "▶" } else { "⏸" };
            format!(" {} {} | {} ", icon, now_playing.title, now_playing.artist)
        }
        None => match playback.screen.track() {
            Some(track) => format!(" ■ {} | {} ", track.title, track.artist.name),
            None => " No track playing ".to_string(),
        },
    }
}

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let snapshot = &playback.snapshot;

    let time_str = format!(
        "{} / {}",
        format_duration(snapshot.position),
        format_duration(snapshot.duration)
    );

    let controls_info = " Space play/pause | n/p next/prev | ←/→ seek | s stop | h help ";

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text(playback))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(snapshot.progress.clamp(0.0, 1.0)))
        .label(time_str);

    frame.render_widget(gauge, area);
}
