//! UI rendering with ratatui.
//!
//! Two panes: ranked results on the left, a read-only preview of the current
//! candidate on the right with its last-known line highlighted. A query bar
//! and a status bar frame the bottom.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::App;
use crate::core::{PickerMode, ScoredCandidate};

fn accent() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn selected_row() -> Style {
    Style::default().bg(Color::Rgb(40, 44, 52))
}

fn highlight_row() -> Style {
    Style::default().bg(Color::Rgb(58, 52, 30))
}

/// Main render function.
pub fn render(frame: &mut Frame, app: &mut App) {
    let _timer = crate::metrics::Timer::start("render_frame");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Query bar
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[0]);

    render_results(frame, app, main[0]);
    render_preview(frame, app, main[1]);
    render_query_bar(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" files ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    if visible == 0 {
        return;
    }

    // Keep the selection in view.
    if app.list.selected < app.list.scroll {
        app.list.scroll = app.list.selected;
    } else if app.list.selected >= app.list.scroll + visible {
        app.list.scroll = app.list.selected - visible + 1;
    }

    let lines: Vec<Line> = app
        .results
        .iter()
        .enumerate()
        .skip(app.list.scroll)
        .take(visible)
        .map(|(i, scored)| result_line(scored, i == app.list.selected))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// One results row: selection marker plus the path with matched characters
/// emphasized.
fn result_line(scored: &ScoredCandidate, selected: bool) -> Line<'_> {
    let mut spans = Vec::with_capacity(8);
    spans.push(if selected {
        Span::styled("▌ ", accent())
    } else {
        Span::raw("  ")
    });

    let rel = scored.candidate.rel.as_str();
    let dir_len = rel.len() - scored.candidate.basename.len();

    match &scored.positions {
        Some(positions) => spans.extend(emphasized_spans(rel, dir_len, positions)),
        None => {
            spans.push(Span::styled(&rel[..dir_len], dim()));
            spans.push(Span::raw(&rel[dir_len..]));
        }
    }

    let line = Line::from(spans);
    if selected {
        line.style(selected_row())
    } else {
        line
    }
}

/// Split a path into spans, grouping consecutive matched/unmatched runs so
/// span count stays small.
fn emphasized_spans<'a>(rel: &'a str, dir_len: usize, positions: &[u32]) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut run_start = 0;
    let mut run_matched = false;
    let mut pos_iter = positions.iter().peekable();

    let flush = |spans: &mut Vec<Span<'a>>, start: usize, end: usize, matched: bool| {
        if start == end {
            return;
        }
        // A run never spans the directory/basename boundary (see below), so
        // the base style is decided by where it starts.
        let base = if start < dir_len { dim() } else { Style::default() };
        let style = if matched { accent() } else { base };
        spans.push(Span::styled(&rel[start..end], style));
    };

    for (offset, _) in rel.char_indices() {
        while pos_iter.peek().is_some_and(|&&p| (p as usize) < offset) {
            pos_iter.next();
        }
        let matched = pos_iter.peek().is_some_and(|&&p| p as usize == offset);
        let boundary = offset == dir_len;
        if matched != run_matched || boundary {
            flush(&mut spans, run_start, offset, run_matched);
            run_start = offset;
            run_matched = matched;
        }
    }
    flush(&mut spans, run_start, rel.len(), run_matched);
    spans
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let title = app
        .host
        .preview
        .as_ref()
        .map(|p| format!(" {} ", p.rel))
        .unwrap_or_else(|| " preview ".to_string());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(pane) = &app.host.preview else {
        return;
    };
    if pane.buffer.is_binary() {
        frame.render_widget(Paragraph::new(Line::styled("(binary file)", dim())), inner);
        return;
    }

    let visible = inner.height as usize;
    let total = pane.buffer.line_count();
    // Center the highlighted line in the pane.
    let first = match pane.highlight {
        Some(h) => (h as usize)
            .saturating_sub(visible / 2)
            .min(total.saturating_sub(visible)),
        None => 0,
    };

    let gutter_width = total.to_string().len().max(3);
    let lines: Vec<Line> = (first..total.min(first + visible))
        .map(|i| {
            let text = pane.buffer.line_str(i).unwrap_or_default();
            let gutter = format!("{:>width$} ", i + 1, width = gutter_width);
            let line = Line::from(vec![Span::styled(gutter, dim()), Span::raw(text)]);
            if pane.highlight == Some(i as u32) {
                line.style(highlight_row())
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_query_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.mode {
        PickerMode::Standard => "jump",
        PickerMode::RecentFiles => "recent",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", mode), accent()),
        Span::raw("› "),
        Span::raw(app.query.as_str()),
        Span::styled("█", dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left = if let Some(error) = &app.ui.error {
        Span::styled(error.as_str(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.ui.status {
        Span::styled(status.as_str(), dim())
    } else {
        Span::styled("enter: open · esc: cancel · ^y: yank path", dim())
    };

    let position = if app.results.is_empty() {
        format!("0/{} files", app.candidate_count())
    } else {
        format!(
            "{}/{} · {} files",
            app.list.selected + 1,
            app.results.len(),
            app.candidate_count()
        )
    };

    let pad = (area.width as usize)
        .saturating_sub(left.content.len() + position.len() + 2);
    let line = Line::from(vec![
        Span::raw(" "),
        left,
        Span::raw(" ".repeat(pad)),
        Span::styled(position, dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
