use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::{App, Popover};

const POPOVER_WIDTH: u16 = 60;
const POPOVER_MAX_ROWS: u16 = 8;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let dirty = if app.is_dirty() { " *" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {}{dirty} ", app.note));
    let inner = block.inner(chunks[0]);

    let cursor = app.buffer.cursor();
    let height = usize::from(inner.height.max(1));
    let scroll = cursor.line.saturating_sub(height - 1);
    let lines: Vec<Line> = (scroll..app.buffer.line_count().min(scroll + height))
        .map(|n| Line::raw(app.buffer.line(n).unwrap_or_default().into_owned()))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let line = app.buffer.line(cursor.line).unwrap_or_default();
    let column = |ch: usize| Span::raw(&line[..ch.min(line.len())]).width() as u16;
    let cursor_x = inner.x + column(cursor.ch).min(inner.width.saturating_sub(1));
    let cursor_y = inner.y + (cursor.line - scroll) as u16;
    f.set_cursor_position((cursor_x, cursor_y));

    if let Some(popover) = app.popover.as_mut()
        && !popover.suggestions.candidates.is_empty()
    {
        let left = app.search.delimiters().left().len();
        let anchor_x = inner.x + column(popover.suggestions.span.start.saturating_sub(left));
        render_popover(f, popover, inner, anchor_x, cursor_y);
    }

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(status, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("Ctrl-K: Search | "),
        Span::raw("↑/↓: Choose | "),
        Span::raw("Enter/Tab: Accept | "),
        Span::raw("Ctrl-A: Add alias | "),
        Span::raw("Ctrl-S: Save | "),
        Span::raw("Esc: Quit"),
    ]));
    f.render_widget(help, chunks[2]);
}

/// Draws the suggestion list under the cursor row, or above it when there
/// is no room below.
fn render_popover(f: &mut Frame, popover: &mut Popover, bounds: Rect, anchor_x: u16, row: u16) {
    let rows = (popover.suggestions.candidates.len() as u16).min(POPOVER_MAX_ROWS);
    let height = rows + 2;
    let width = POPOVER_WIDTH.min(bounds.width);
    let x = anchor_x.min(bounds.right().saturating_sub(width));
    let y = if row + 1 + height <= bounds.bottom() {
        row + 1
    } else {
        row.saturating_sub(height).max(bounds.y)
    };
    let area = Rect::new(x, y, width, height.min(bounds.height));

    let items: Vec<ListItem> = popover
        .suggestions
        .candidates
        .iter()
        .map(|candidate| {
            let mut spans = vec![Span::raw(candidate.title().to_string())];
            let note = candidate.note();
            if !note.is_empty() {
                spans.push(Span::styled(
                    format!("  {note}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let aux = candidate.aux().to_string();
            if !aux.is_empty() {
                spans.push(Span::styled(
                    format!("  {aux}"),
                    Style::default().fg(Color::Cyan),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let hints = popover
        .suggestions
        .instructions()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("  ");

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Link to ")
                .title_bottom(Line::styled(
                    hints,
                    Style::default().add_modifier(Modifier::DIM),
                )),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut popover.state);
}
