//! Shared chrome for single-line input controls

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows an input control occupies (borders + value line + helper line)
pub const INPUT_HEIGHT: u16 = 4;

/// Draw a labeled single-line input with an optional helper line.
///
/// `error` switches the border to the error visual state.
pub fn draw_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    helper: Option<&str>,
    focused: bool,
    error: bool,
) {
    let border_style = if error {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = if value.is_empty() && !focused {
        "(empty)"
    } else {
        value
    };

    let cursor = if focused { "▌" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(display_value.to_string(), value_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ])];
    if let Some(helper) = helper {
        lines.push(Line::from(Span::styled(
            helper.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
