//! Video screen: layout per presentation mode and the info tabs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{DataState, LayoutMode, VideoContent, VideoDetail, VideoTab, VideoView};
use super::content::{comment_item, render_page_list};
use super::layout::render_tabs;
use super::player::render_player_panel;
use super::utils::{format_count, format_date, render_scrollable_list, truncate_string};

pub fn render_video(frame: &mut Frame, area: Rect, view: &VideoView) {
    match view.player.mode {
        LayoutMode::FullScreen => {
            render_player_panel(frame, area, &view.player);
        }
        LayoutMode::PictureInPicture => {
            let width = (area.width / 3).max(24).min(area.width);
            let height = 3.min(area.height);
            let pip = Rect {
                x: area.x + area.width - width,
                y: area.y + area.height - height,
                width,
                height,
            };
            frame.render_widget(Clear, pip);
            render_player_panel(frame, pip, &view.player);
        }
        LayoutMode::Portrait => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            render_player_panel(frame, chunks[0], &view.player);
            render_info_column(frame, chunks[1], view);
        }
        LayoutMode::Landscape => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            render_player_panel(frame, chunks[0], &view.player);
            render_info_column(frame, chunks[1], view);
        }
    }
}

fn render_info_column(frame: &mut Frame, area: Rect, view: &VideoView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Tab body
        ])
        .split(area);

    let selected = VideoTab::ALL.iter().position(|t| *t == view.tab).unwrap_or(0);
    render_tabs(
        frame,
        chunks[0],
        VideoTab::ALL.iter().map(|t| t.title()).collect(),
        selected,
    );

    let body = chunks[1];
    let detail = match &view.detail {
        DataState::Empty | DataState::Loading => {
            render_message(frame, body, "Loading...", Color::Yellow);
            return;
        }
        DataState::Error(e) => {
            let message = format!("Failed to load video: {}\n\nPress R to retry", e);
            render_message(frame, body, &message, Color::Red);
            return;
        }
        DataState::Success(VideoContent::Private) => {
            render_message(frame, body, "This video is private.", Color::DarkGray);
            return;
        }
        DataState::Success(VideoContent::Deleted) => {
            render_message(frame, body, "This video has been deleted.", Color::DarkGray);
            return;
        }
        DataState::Success(VideoContent::Available(detail)) => detail,
    };

    match view.tab {
        VideoTab::Introduction => render_introduction(frame, body, detail),
        VideoTab::Comments => {
            let width = body.width.saturating_sub(4) as usize;
            render_page_list(
                frame,
                body,
                " Comments ",
                &view.comments,
                view.comments_selected,
                |c, selected| comment_item(c, selected, width),
            );
        }
        VideoTab::Similar => render_similar(frame, body, detail, view.similar_selected),
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_introduction(frame: &mut Frame, area: Rect, detail: &VideoDetail) {
    let mut lines = vec![
        Line::from(Span::styled(
            detail.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(detail.author.clone(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  {}", format_date(detail.posted_at)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} views · {} likes",
                format_count(detail.views),
                format_count(detail.likes)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if !detail.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            detail.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "),
            Style::default().fg(Color::Cyan),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(detail.description.lines().map(|l| Line::from(l.to_string())));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Introduction ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_similar(frame: &mut Frame, area: Rect, detail: &VideoDetail, selected: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Similar videos ")
        .padding(Padding::horizontal(1));

    if detail.similar.is_empty() {
        let widget = Paragraph::new("No similar videos.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = detail
        .similar
        .iter()
        .enumerate()
        .map(|(i, preview)| {
            let style = if i == selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(vec![
                Line::from(Span::styled(truncate_string(&preview.title, width), style)),
                Line::from(Span::styled(
                    format!("  {} · {} views", preview.author, format_count(preview.views)),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, block);
}
