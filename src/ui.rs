//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from session state ([`App`]) and
//! input handling ([`crate::input`]).  Rendering only reads `App`; the story
//! slice comes from [`App::view`].
//!
//! ## For contributors
//!
//! * The layout is four rows: search bar, card grid, detail line of the
//!   highlighted story, status bar.
//! * The grid is [`GRID_COLUMNS`] wide; the row count follows from the page
//!   size.
//! * Colours and styles are defined inline.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FetchStatus, InputMode};
use crate::source::Story;
use crate::view::{SortKey, View};

/// Cards per grid row.
pub const GRID_COLUMNS: usize = 3;

/// Draw the complete UI for one frame.
pub fn draw(app: &App, frame: &mut Frame) {
    draw_at(app, frame, Utc::now());
}

/// Like [`draw`], with an explicit clock for story ages.
pub fn draw_at(app: &App, frame: &mut Frame, now: DateTime<Utc>) {
    let [search_area, grid_area, detail_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let view = app.view();

    draw_search_bar(app, frame, search_area);
    match (&app.status, app.batch.is_some()) {
        (FetchStatus::Loading, false) => draw_placeholders(app.page_size, frame, grid_area),
        (FetchStatus::Failed(reason), false) => draw_error(reason, frame, grid_area),
        _ => draw_grid(app, &view, frame, grid_area, now),
    }
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, &view, frame, status_area);
}

/// Split `area` into `count` cells, [`GRID_COLUMNS`] per row.
fn grid_cells(area: Rect, count: usize) -> Vec<Rect> {
    let rows = count.div_ceil(GRID_COLUMNS).max(1);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::horizontal(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row)
                .to_vec()
        })
        .take(count)
        .collect()
}

fn draw_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.mode == InputMode::Search;
    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Blue)
    };

    let term = app.view_state.search_term();
    let text = if term.is_empty() && !editing {
        Span::styled("Search stories... (press /)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(term)
    };

    let title = format!(" Top {} Stories ", app.source_name);
    let input = Paragraph::new(Line::from(vec![Span::raw("🔍 "), text]))
        .block(Block::default().title(title).borders(Borders::ALL).border_style(border));
    frame.render_widget(input, area);

    if editing {
        // "🔍 " is three cells wide, plus the left border.
        let typed = u16::try_from(term.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(4).saturating_add(typed);
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y.saturating_add(1)));
    }
}

/// Render empty cards while the first fetch is in flight.
fn draw_placeholders(count: usize, frame: &mut Frame, area: Rect) {
    for cell in grid_cells(area, count) {
        let card = Paragraph::new(Line::styled("Loading…", Style::default().fg(Color::DarkGray)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(card, cell);
    }
}

fn draw_error(reason: &str, frame: &mut Frame, area: Rect) {
    let message = Paragraph::new(vec![
        Line::styled(format!("Error: {reason}"), Style::default().fg(Color::Red)),
        Line::raw(""),
        Line::raw("Press r to retry."),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, area);
}

fn draw_grid(app: &App, view: &View<'_>, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
    if view.items.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No stories match your search.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let cells = grid_cells(area, app.page_size);
    for (index, (story, cell)) in view.items.iter().zip(cells).enumerate() {
        draw_card(story, index == app.selected, frame, cell, now);
    }
}

fn draw_card(story: &Story, selected: bool, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue)
    };

    let link = match &story.url {
        Some(url) => Span::styled(url.as_str(), Style::default().fg(Color::Cyan)),
        None => Span::styled("(no link)", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::styled(
            story.title.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::styled(format!("Upvotes: {}", story.points), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(
                format!("{} comments", story.num_comments),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::styled(
            format!("by {} · {}", story.author_label(), story.age_label(now)),
            Style::default().fg(Color::DarkGray),
        ),
        Line::from(link),
    ];

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(card, area);
}

/// One line with the highlighted story's link.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let line = match app.selected_story() {
        Some(story) => Line::from(vec![
            Span::styled(" ▸ ", Style::default().fg(Color::Yellow)),
            Span::raw(story.url.as_deref().unwrap_or("(no link)")),
        ]),
        None => Line::raw(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn sort_label(key: SortKey) -> Vec<Span<'static>> {
    SortKey::ALL
        .into_iter()
        .map(|k| {
            if k == key {
                Span::styled(format!("[{k}]"), Style::default().fg(Color::Yellow))
            } else {
                Span::raw(format!(" {k} "))
            }
        })
        .collect()
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, view: &View<'_>, frame: &mut Frame, area: Rect) {
    let status = match &app.status {
        FetchStatus::Loading => Span::styled("Loading…", Style::default().fg(Color::Yellow)),
        FetchStatus::Ready => {
            let rejected = app.batch.as_ref().map_or(0, |b| b.rejected);
            if rejected > 0 {
                Span::styled(
                    format!("Ready ({rejected} records skipped)"),
                    Style::default().fg(Color::Yellow),
                )
            } else {
                Span::styled("Ready", Style::default().fg(Color::Green))
            }
        }
        FetchStatus::Failed(reason) => {
            Span::styled(format!("Error: {reason}"), Style::default().fg(Color::Red))
        }
    };

    let mut spans = vec![
        Span::raw(" "),
        status,
        Span::raw("  "),
        Span::styled(
            format!("{} stories", view.matched),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("page {}/{}", view.current_page, view.total_pages),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  sort:"),
    ];
    spans.extend(sort_label(app.view_state.sort_key()));
    spans.push(Span::raw(match app.mode {
        InputMode::Search => "  Enter/Esc: done  Ctrl-U: clear",
        InputMode::Browse => "  q: quit  /: search  s: sort  ←/→: page  r: retry",
    }));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests (smoke tests against an in-memory backend)
// ---------------------------------------------------------------------------
