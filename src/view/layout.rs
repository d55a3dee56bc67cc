//! Layout rendering (status bar, tab headers, splash and login screens)

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::model::{Route, SplashState, StatusBarStyle};
use super::utils::centered_rect;

pub fn render_status_bar(frame: &mut Frame, area: Rect, style: StatusBarStyle, route: &Route) {
    let bar_style = match style {
        StatusBarStyle::Light => Style::default().fg(Color::Black).bg(Color::White),
        StatusBarStyle::Dark => Style::default().fg(Color::White).bg(Color::Black),
        StatusBarStyle::Hidden => return,
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // App name + screen
            Constraint::Length(7),  // Clock
        ])
        .split(area);

    let screen = match route {
        Route::Splash => "Starting",
        Route::Login => "Login",
        Route::Index => "Home",
        Route::Video(_) => "Video",
    };
    let left = Paragraph::new(Line::from(vec![
        Span::styled(" iwara-tui ", bar_style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("· {}", screen), bar_style),
    ]))
    .style(bar_style);
    frame.render_widget(left, chunks[0]);

    let clock = Paragraph::new(Local::now().format("%H:%M ").to_string())
        .style(bar_style)
        .alignment(Alignment::Right);
    frame.render_widget(clock, chunks[1]);
}

/// One-line tab header with the active tab highlighted
pub fn render_tabs(frame: &mut Frame, area: Rect, titles: Vec<&'static str>, selected: usize) {
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|")
        .padding(" ", " ");
    frame.render_widget(tabs, area);
}

pub fn render_splash(frame: &mut Frame, area: Rect, splash: &SplashState) {
    let message = if splash.checked {
        "Session checked"
    } else {
        "Checking session..."
    };
    let popup = centered_rect(area, 40, 5);
    let widget = Paragraph::new(vec![
        Line::from(Span::styled(
            "iwara-tui",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(widget, popup);
}

pub fn render_login(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 60, 8);
    let widget = Paragraph::new(vec![
        Line::from("Your session is missing or no longer accepted."),
        Line::from(""),
        Line::from("Set source.session in the config file, then press R to check again."),
    ])
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::White))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Login ")
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(widget, popup);
}
