//! Player panel rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::model::{LayoutMode, PlayerInfo};

pub fn render_player_panel(frame: &mut Frame, area: Rect, player: &PlayerInfo) {
    let status_text = if !player.selection.has_sources() {
        " ■ No sources".to_string()
    } else if player.is_playing {
        format!(" ▶ {}", player.title)
    } else {
        format!(" ⏸ {}", player.title)
    };

    let quality_text = if player.selection.has_sources() {
        let label = match player.selection.selected_link() {
            Some(_) => player.selection.selected_quality.clone(),
            None => "default".to_string(),
        };
        format!("Quality: {}", label)
    } else {
        "Quality: -".to_string()
    };
    let autoplay_text = if player.selection.auto_play { "Autoplay: On" } else { "Autoplay: Off" };
    let controls_info = format!(" {} | {} ", quality_text, autoplay_text);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if player.is_playing {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        })
        .title(format!("{} ", status_text))
        .title_bottom(Line::from(controls_info).right_aligned());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Compact modes only get the title line
    if player.mode == LayoutMode::PictureInPicture {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen
            Constraint::Length(2), // Available qualities and hints
        ])
        .split(inner);

    let screen = match (&player.now_playing, player.selection.has_sources()) {
        (_, false) => Paragraph::new("This video has no playable sources."),
        (Some(uri), true) => Paragraph::new(vec![
            Line::from(Span::styled(
                if player.is_playing { "Playing in external player" } else { "Ready" },
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(uri.clone(), Style::default().fg(Color::DarkGray))),
        ]),
        (None, true) => Paragraph::new("Press Space to play"),
    };
    frame.render_widget(
        screen.alignment(Alignment::Center).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let qualities: Vec<Span> = player
        .selection
        .qualities()
        .into_iter()
        .map(|q| {
            if q == player.selection.selected_quality {
                Span::styled(format!("[{}] ", q), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::styled(format!("{} ", q), Style::default().fg(Color::White))
            }
        })
        .collect();
    let footer = Paragraph::new(vec![
        Line::from(qualities),
        Line::from(Span::styled(
            "Space play/stop · V quality · F full screen · P picture-in-picture",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(footer, chunks[1]);
}
