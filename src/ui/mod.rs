//! UI module for rendering a mounted stepper

pub mod components;
pub(crate) mod input;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::stepper::Stepper;
use components::button::{render_control_button, BUTTON_HEIGHT, BUTTON_WIDTH};

/// Marker prefixed to every displayed validation error line.
///
/// The test driver scans the rendered buffer for it, so it must not occur
/// anywhere else in the layout.
pub const ERROR_MARKER: &str = "✗ ";

/// Draw the stepper over the whole frame
pub fn draw(frame: &mut Frame, stepper: &Stepper) {
    let area = frame.area();
    draw_in(frame, area, stepper);
}

/// Draw the stepper into a caller-chosen area (wrapper chrome goes outside)
pub fn draw_in(frame: &mut Frame, area: Rect, stepper: &Stepper) {
    let errors = stepper.visible_errors();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(errors.len() as u16),
            Constraint::Length(BUTTON_HEIGHT),
        ])
        .margin(1)
        .split(area);

    draw_header(frame, chunks[0], stepper);
    if stepper.is_review() {
        draw_review(frame, chunks[1], stepper);
    } else {
        draw_fields(frame, chunks[1], stepper);
    }
    draw_errors(frame, chunks[2], &errors);
    draw_buttons(frame, chunks[3], stepper);
}

fn draw_header(frame: &mut Frame, area: Rect, stepper: &Stepper) {
    let manifest = stepper.manifest();
    let position = if let Some(step) = stepper.current_step() {
        format!(
            "Step {} of {}: {}",
            stepper.state().active_step + 1,
            manifest.step_count(),
            step.title
        )
    } else {
        "Review".to_string()
    };

    let lines = vec![
        Line::from(Span::styled(
            manifest.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(position, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_fields(frame: &mut Frame, area: Rect, stepper: &Stepper) {
    let Some(step) = stepper.current_step() else {
        return;
    };

    let field_count = step.schema.len();
    let on_buttons = stepper.state().is_buttons_row_active(field_count);

    let mut constraints: Vec<Constraint> = Vec::with_capacity(field_count + 1);
    for field in &step.schema {
        let height = stepper
            .extension_for(field)
            .map(|e| e.height())
            .unwrap_or(1);
        constraints.push(Constraint::Length(height));
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, field) in step.schema.iter().enumerate() {
        match stepper.extension_for(field) {
            Ok(extension) => {
                let focused = !on_buttons && idx == stepper.state().active_field;
                let props = stepper.field_props(field, focused);
                extension.render(frame, chunks[idx], &props);
            }
            Err(err) => {
                // Surfaced as a typed error on the next validation pass
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        err.to_string(),
                        Style::default().fg(Color::DarkGray),
                    )),
                    chunks[idx],
                );
            }
        }
    }
}

fn draw_review(frame: &mut Frame, area: Rect, stepper: &Stepper) {
    let mut lines = vec![Line::from(Span::styled(
        "Review the collected values, then press Create.",
        Style::default().fg(Color::DarkGray),
    ))];
    for (name, value) in &stepper.state().form_data {
        lines.push(Line::from(vec![
            Span::styled(format!("{name}: "), Style::default().fg(Color::Cyan)),
            Span::raw(value.to_string()),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_errors(frame: &mut Frame, area: Rect, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let lines: Vec<Line> = errors
        .iter()
        .map(|message| {
            Line::from(Span::styled(
                format!("{ERROR_MARKER}{message}"),
                Style::default().fg(Color::Red),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_buttons(frame: &mut Frame, area: Rect, stepper: &Stepper) {
    let controls = stepper.controls();
    let field_count = stepper.field_count();
    let on_buttons = stepper.state().is_buttons_row_active(field_count);
    let selected = stepper.state().selected_button.min(controls.len() - 1);

    let constraints: Vec<Constraint> = controls
        .iter()
        .map(|_| Constraint::Length(BUTTON_WIDTH))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (idx, control) in controls.iter().enumerate() {
        render_control_button(frame, chunks[idx], *control, on_buttons && idx == selected);
    }
}
