use ratatui::{prelude::*, widgets::*};

use crate::app::form::Form;
use crate::app::state::StatusLine;
use crate::messages::ui_events::InputMode;
use crate::models::Album;

/// Height of one bordered form field
pub const FIELD_HEIGHT: u16 = 3;

/// Border style for a field given focus and edit mode
pub fn field_border_style(is_focused: bool, input_mode: InputMode) -> Style {
    if is_focused && input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Draw every field of `form` stacked from the top of `area`, placing the
/// terminal cursor in the selected field while editing.
pub fn render_form(f: &mut Frame, form: &Form, input_mode: InputMode, area: Rect) {
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.selected;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(field_border_style(is_focused, input_mode))
            .title(format!(" {} ", field.label));
        f.render_widget(Paragraph::new(field.display()).block(block), chunks[i]);

        if is_focused && input_mode == InputMode::Editing {
            let rect = chunks[i];
            let max_x = rect.x + rect.width.saturating_sub(2);
            let cursor_x = (rect.x + form.cursor_column() as u16 + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, rect.y + 1));
        }
    }
}

/// Style for a status line
pub fn status_style(status: &StatusLine) -> Style {
    if status.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

/// One card-like list item per album
pub fn album_items(albums: &[Album]) -> Vec<ListItem<'static>> {
    albums
        .iter()
        .map(|album| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("UserID: {}", album.user_id),
                    Style::default().fg(Color::Cyan).bold(),
                )),
                Line::from(format!("ID: {}", album.id)),
                Line::from(format!("Title: {}", album.title)),
                Line::from(""),
            ])
        })
        .collect()
}

/// Vertical menu with the selected entry highlighted
pub fn render_menu<'a>(entries: &[&'a str], selected: usize, title: &'a str) -> List<'a> {
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default()
            };
            ListItem::new(format!(" {}. {} ", i + 1, entry)).style(style)
        })
        .collect();

    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

/// Rect of `percent_x` by `percent_y` centered inside `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
