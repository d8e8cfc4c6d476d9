//! Layout rendering (top bar, podcast list, details pane)

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{InputMode, Podcast, PodcastStatus, UiState};
use super::utils::{render_scrollable_list, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, last_refreshed: Option<DateTime<Local>>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Topic input
            Constraint::Length(30), // Notice / refresh time
        ])
        .split(area);

    let editing = ui_state.input_mode == InputMode::Topic;
    let input_style = if editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input_text = if editing {
        format!("{}▏", ui_state.topic_input)
    } else {
        "Press / to generate a podcast about a topic".to_string()
    };

    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" New podcast ")
            .padding(Padding::horizontal(1))
            .border_style(if editing {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(input, chunks[0]);

    let (status_text, status_style) = match (&ui_state.notice, last_refreshed) {
        (Some(notice), _) => (notice.clone(), Style::default().fg(Color::Yellow)),
        (None, Some(at)) => (format!("Updated {}", at.format("%H:%M:%S")), Style::default().fg(Color::Cyan)),
        (None, None) => ("Not loaded".to_string(), Style::default().fg(Color::DarkGray)),
    };
    let status = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);
}

fn status_style(status: &PodcastStatus) -> Style {
    match status {
        PodcastStatus::Ready => Style::default().fg(Color::Green),
        PodcastStatus::Failed => Style::default().fg(Color::Red),
        PodcastStatus::Pending | PodcastStatus::Other(_) => Style::default().fg(Color::Yellow),
    }
}

pub fn render_podcast_list(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    podcasts: &[Podcast],
    now_playing: Option<&str>,
) {
    let title_width = (area.width as usize).saturating_sub(16).max(8);

    let items: Vec<ListItem> = podcasts
        .iter()
        .enumerate()
        .map(|(i, podcast)| {
            let marker = if now_playing == Some(podcast.id.as_str()) { "♪ " } else { "  " };
            let title_style = if i == ui_state.podcast_selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(truncate_string(&podcast.title, title_width), title_style),
                Span::raw(" "),
                Span::styled(podcast.status.as_str().to_string(), status_style(&podcast.status)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Podcasts ({}) ", podcasts.len()))
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if items.is_empty() {
        let empty = Paragraph::new("No podcasts yet. Press r to refresh or / to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    render_scrollable_list(frame, area, items, ui_state.podcast_selected, block);
}

pub fn render_details(frame: &mut Frame, area: Rect, podcast: Option<&Podcast>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .padding(Padding::uniform(1));

    let Some(podcast) = podcast else {
        frame.render_widget(block, area);
        return;
    };

    let hint = match &podcast.status {
        PodcastStatus::Ready => "Enter to play",
        status if status.is_terminal() => "Generation failed",
        _ => "Still generating, press r to refresh",
    };

    let label = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(Span::styled(
            podcast.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(podcast.description.clone(), status_style(&podcast.status))),
        Line::from(vec![Span::styled("Cover  ", label), Span::raw(podcast.cover_locator())]),
        Line::from(vec![Span::styled("Audio  ", label), Span::raw(podcast.audio_locator())]),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::Cyan))),
    ];

    let details = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(details, area);
}
