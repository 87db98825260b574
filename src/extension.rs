//! Field extension contract for pluggable form controls
//!
//! A field extension is a render function plus an async validator, registered
//! under a name that manifests refer to. Extensions hold no state: the host
//! stepper owns every field value and hands it back in on each render.

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde_json::Value;

use crate::manifest::FieldSchema;

/// Collected validation errors for one field value.
///
/// Validators report failure by appending messages here; they never return an
/// error or panic.
#[derive(Debug, Default)]
pub struct ValidationSink {
    errors: Vec<String>,
}

impl ValidationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Props handed to a field extension on every render and keystroke
pub struct FieldProps<'a> {
    /// Current value of the field, if any has been entered
    pub form_data: Option<&'a Value>,
    /// Validation errors currently recorded against this field
    pub raw_errors: &'a [String],
    pub required: bool,
    pub schema: &'a FieldSchema,
    /// Whether this field currently has input focus
    pub focused: bool,
}

/// A pluggable form control: rendering plus asynchronous validation
#[async_trait]
pub trait FieldExtension: Send + Sync {
    /// Registration name used by manifests to select this extension
    fn name(&self) -> &str;

    /// Render the control into the given area
    fn render(&self, frame: &mut Frame, area: Rect, props: &FieldProps<'_>);

    /// Handle a keystroke while focused. Returns the full replacement value
    /// for the field when the keystroke edits it, `None` otherwise.
    fn on_key(&self, _key: KeyEvent, _props: &FieldProps<'_>) -> Option<Value> {
        None
    }

    /// Validate a committed value, reporting failures through the sink
    async fn validate(&self, _value: &Value, _sink: &mut ValidationSink) {}

    /// Rows of terminal space the control occupies
    fn height(&self) -> u16 {
        crate::ui::input::INPUT_HEIGHT
    }
}
