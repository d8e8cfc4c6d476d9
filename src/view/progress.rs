//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::player::{PlaybackState, PlaybackStatus};
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackState, title: Option<&str>) {
    let name = title.unwrap_or("No podcast loaded");
    let status_text = match playback.status {
        PlaybackStatus::Idle => " No podcast loaded".to_string(),
        PlaybackStatus::Loading => format!(" ⟳ Loading {}", name),
        PlaybackStatus::Playing => format!(" ▶ {}", name),
        PlaybackStatus::Paused => format!("⏸  {}", name),
        PlaybackStatus::Error => format!(" ✖ {}", name),
    };

    let caption_text = match (playback.captions_available, playback.captions_enabled) {
        (false, _) => "CC: n/a",
        (true, true) => "CC: On",
        (true, false) => "CC: Off",
    };

    let time_str = format!(
        "{} / {}",
        format_duration(Some(playback.position)),
        format_duration(playback.duration)
    );

    let gauge_color = if playback.status == PlaybackStatus::Error {
        Color::Red
    } else {
        Color::Green
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(format!(" {} ", caption_text)).right_aligned()),
        )
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(playback.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
