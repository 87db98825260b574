//! Default single-line text field

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use serde_json::Value;

use crate::extension::{FieldExtension, FieldProps};
use crate::ui::input::draw_input;

/// Built-in extension backing fields that declare no custom one.
///
/// Stores its value as a plain JSON string. Validation is left to the host;
/// the schema's `required` flag only affects the rendered label.
#[derive(Debug, Default)]
pub struct TextInput;

impl TextInput {
    pub const NAME: &'static str = "Text";

    pub fn new() -> Self {
        Self
    }

    fn current_text<'a>(props: &'a FieldProps<'_>) -> &'a str {
        props.form_data.and_then(Value::as_str).unwrap_or("")
    }
}

#[async_trait]
impl FieldExtension for TextInput {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &FieldProps<'_>) {
        let text = Self::current_text(props);
        let label = if props.required {
            format!("{} *", props.schema.title)
        } else {
            props.schema.title.clone()
        };
        let error = !props.raw_errors.is_empty() && text.is_empty();
        draw_input(
            frame,
            area,
            &label,
            text,
            props.schema.description.as_deref(),
            props.focused,
            error,
        );
    }

    fn on_key(&self, key: KeyEvent, props: &FieldProps<'_>) -> Option<Value> {
        let mut text = Self::current_text(props).to_string();
        match key.code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return None,
        }
        Some(Value::String(text))
    }
}
