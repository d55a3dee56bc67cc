//! Paged list rendering (index tabs, comment threads)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{
    Comment, IndexTab, IndexView, MediaKind, MediaPreview, PageListState, PageStatus, SORT_ORDERS,
};
use super::layout::render_tabs;
use super::utils::{format_count, format_date, render_scrollable_list, truncate_string};

pub fn render_index(frame: &mut Frame, area: Rect, index: &IndexView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // List
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let selected_tab = match index.tab {
        IndexTab::Videos => 0,
        IndexTab::Subscriptions => 1,
    };
    render_tabs(
        frame,
        chunks[0],
        vec![IndexTab::Videos.title(), IndexTab::Subscriptions.title()],
        selected_tab,
    );

    let width = chunks[1].width.saturating_sub(4) as usize;
    match index.tab {
        IndexTab::Videos => {
            let sort = index.videos.query.as_deref().unwrap_or(SORT_ORDERS[0]);
            let title = format!(" Videos · sorted by {} ", sort);
            render_page_list(frame, chunks[1], &title, &index.videos, index.videos_selected, |p, selected| {
                preview_item(p, selected, width)
            });
        }
        IndexTab::Subscriptions => {
            render_page_list(
                frame,
                chunks[1],
                " Subscriptions ",
                &index.subscriptions,
                index.subscriptions_selected,
                |p, selected| preview_item(p, selected, width),
            );
        }
    }

    let hints = Paragraph::new(" Tab switch · ↑↓ move · Enter open · S sort · R retry · T theme · ? help · Q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, chunks[2]);
}

fn preview_item(preview: &MediaPreview, selected: bool, width: usize) -> ListItem<'static> {
    let kind = match preview.kind {
        MediaKind::Video => "▶",
        MediaKind::Image => "▣",
    };
    let stats = format!(
        "{:>6} views {:>6} likes",
        format_count(preview.views),
        format_count(preview.likes)
    );
    let author_width = 16;
    let title_width = width.saturating_sub(stats.len() + author_width + 6);

    let style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{} ", kind), Style::default().fg(Color::Cyan)),
        Span::styled(truncate_string(&preview.title, title_width), style),
        Span::raw("  "),
        Span::styled(
            truncate_string(&preview.author, author_width),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(stats, Style::default().fg(Color::DarkGray)),
    ]))
}

pub fn comment_item(comment: &Comment, selected: bool, width: usize) -> ListItem<'static> {
    let header_style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let mut header = vec![
        Span::styled(comment.author.clone(), header_style),
        Span::styled(
            format!("  {}", format_date(comment.posted_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if comment.replies > 0 {
        header.push(Span::styled(
            format!("  {} replies", comment.replies),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(vec![
        Line::from(header),
        Line::from(format!("  {}", truncate_string(&comment.body, width.saturating_sub(2)).trim_end())),
    ])
}

/// Render a paged list with its loading, error, empty and end-of-list states.
pub fn render_page_list<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &PageListState<T>,
    selected: usize,
    item: impl Fn(&T, bool) -> ListItem<'static>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1));

    if state.items.is_empty() {
        let (message, color) = match state.status {
            PageStatus::Idle | PageStatus::Loading => ("Loading...".to_string(), Color::Yellow),
            PageStatus::Empty => ("Nothing here yet.".to_string(), Color::DarkGray),
            PageStatus::Error => (
                format!(
                    "Failed to load: {}\n\nPress R to retry",
                    state.error.as_deref().unwrap_or("unknown error")
                ),
                Color::Red,
            ),
            PageStatus::Success => ("Nothing here yet.".to_string(), Color::DarkGray),
        };
        let widget = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let footer = match state.status {
        PageStatus::Loading => Some(Line::from(Span::styled(
            " Loading more... ",
            Style::default().fg(Color::Yellow),
        ))),
        PageStatus::Error => Some(Line::from(Span::styled(
            format!(
                " Failed to load more: {} (R to retry) ",
                state.error.as_deref().unwrap_or("unknown error")
            ),
            Style::default().fg(Color::Red),
        ))),
        _ if state.end_reached => Some(Line::from(Span::styled(
            " End of list ",
            Style::default().fg(Color::DarkGray),
        ))),
        _ => None,
    };
    let block = match footer {
        Some(footer) => block.title_bottom(footer.right_aligned()),
        None => block,
    };

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(i, entry)| item(entry, i == selected))
        .collect();

    render_scrollable_list(frame, area, items, selected, block);
}
