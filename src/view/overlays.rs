//! Overlay rendering (error notification, help popup)

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;
use super::utils::centered_rect;

/// Transient error box; the model clears it after a few seconds.
pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(error_msg) = ui_state.error_message.as_deref() else {
        return;
    };
    let area = frame.area();

    let popup_width = 56.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;
    let wrapped_lines = error_msg.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_area = centered_rect(area, popup_width, wrapped_lines + 2);

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error_msg.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = vec![
        ("", "── Home ──"),
        ("Tab", "Videos / Subscriptions"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Open video"),
        ("S", "Cycle sort order"),
        ("R", "Retry failed page"),
        ("T", "Toggle dark theme"),
        ("", ""),
        ("", "── Video ──"),
        ("Tab / ← →", "Switch tab"),
        ("1 / 2 / 3", "Introduction / Comments / Similar"),
        ("Enter", "Open similar video"),
        ("Space", "Play / Stop"),
        ("V", "Next quality"),
        ("F", "Toggle full screen"),
        ("P", "Toggle picture-in-picture"),
        ("A", "Toggle autoplay"),
        ("W", "Autoplay on unmetered only"),
        ("R", "Retry"),
        ("Esc", "Leave mode / Go back"),
        ("", ""),
        ("", "── General ──"),
        ("? / H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|&(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
