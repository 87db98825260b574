//! Input field whose validation completes only after an artificial delay
//!
//! Used to exercise the stepper's handling of slow remote checks. The value
//! is an object with a single `test` key; validation passes only when that
//! key holds exactly `"pass"`.

use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use serde_json::{json, Value};

use crate::extension::{FieldExtension, FieldProps, ValidationSink};
use crate::ui::input::draw_input;

/// Validation error reported for any value other than `"pass"`
pub const VALIDATION_MESSAGE: &str = "value was not equal to pass";

const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Field extension simulating a slow remote validation check
#[derive(Debug, Clone)]
pub struct DelayingInput {
    delay: Duration,
}

impl DelayingInput {
    pub const NAME: &'static str = "DelayingInput";

    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }

    /// Override the validation delay (tests run it near-instantly)
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn current_text<'a>(props: &'a FieldProps<'_>) -> &'a str {
        props
            .form_data
            .and_then(|v| v.get("test"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

impl Default for DelayingInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldExtension for DelayingInput {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &FieldProps<'_>) {
        // Identity marker for manual confirmation, silent under the default filter
        tracing::trace!(field = %props.schema.name, "rendering delaying input");

        let text = Self::current_text(props);
        let error = !props.raw_errors.is_empty() && text.is_empty();
        draw_input(
            frame,
            area,
            &props.schema.title,
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
        Some(json!({ "test": text }))
    }

    async fn validate(&self, value: &Value, sink: &mut ValidationSink) {
        tokio::time::sleep(self.delay).await;

        let test = value.get("test").and_then(Value::as_str);
        if test != Some("pass") {
            sink.add_error(VALIDATION_MESSAGE);
        }
    }
}
