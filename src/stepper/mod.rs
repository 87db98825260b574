//! Host component for multi-step forms
//!
//! The stepper owns the manifest, the registered field extensions and the
//! transient form state. Manifest steps are followed by a review screen; the
//! controls rendered at each position drive which programmatic presses are
//! legal.

mod state;

pub use state::{FormData, StepperState};

use std::fmt;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use thiserror::Error;

use crate::extension::{FieldExtension, FieldProps, ValidationSink};
use crate::extensions::TextInput;
use crate::manifest::{FieldSchema, FormStep, Manifest};

/// Form controls addressable by the driver and the buttons row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Back,
    Next,
    Create,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Back => "Back",
            Control::Next => "Next",
            Control::Create => "Create",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Back => write!(f, "back button"),
            Control::Next => write!(f, "next button"),
            Control::Create => write!(f, "create button"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StepperError {
    /// The targeted control is not part of the current render. Treated as a
    /// test setup error and surfaced immediately.
    #[error("{0} is not rendered")]
    ControlNotFound(Control),
    #[error("no field extension registered for \"{0}\"")]
    UnknownExtension(String),
}

/// Callback invoked when the form is submitted successfully
#[cfg_attr(test, mockall::automock)]
pub trait CreateHandler: Send {
    fn created(&mut self, data: &FormData);
}

/// A mounted multi-step form
pub struct Stepper {
    manifest: Manifest,
    extensions: Vec<Arc<dyn FieldExtension>>,
    state: StepperState,
    on_create: Option<Box<dyn CreateHandler>>,
}

impl Stepper {
    /// Mount a form described by `manifest` with the given field extensions.
    ///
    /// The built-in text input is always available as a fallback for fields
    /// that name no extension.
    pub fn new(manifest: Manifest, extensions: Vec<Arc<dyn FieldExtension>>) -> Self {
        let mut extensions = extensions;
        if !extensions.iter().any(|e| e.name() == TextInput::NAME) {
            extensions.push(Arc::new(TextInput::new()));
        }
        Self {
            manifest,
            extensions,
            state: StepperState::default(),
            on_create: None,
        }
    }

    /// Seed field values before the first render
    pub fn set_form_data(&mut self, data: FormData) {
        self.state.form_data = data;
    }

    pub fn set_create_handler(&mut self, handler: Box<dyn CreateHandler>) {
        self.on_create = Some(handler);
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn state(&self) -> &StepperState {
        &self.state
    }

    /// Whether the review screen (past the last manifest step) is active
    pub fn is_review(&self) -> bool {
        self.state.active_step >= self.manifest.step_count()
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    pub fn current_step(&self) -> Option<&FormStep> {
        self.manifest.steps.get(self.state.active_step)
    }

    /// Fields on the active step (zero on the review screen)
    pub fn field_count(&self) -> usize {
        self.current_step().map(|s| s.schema.len()).unwrap_or(0)
    }

    /// Controls rendered at the current position, in layout order
    pub fn controls(&self) -> Vec<Control> {
        let mut controls = Vec::new();
        if self.state.active_step > 0 {
            controls.push(Control::Back);
        }
        if self.is_review() {
            controls.push(Control::Create);
        } else {
            controls.push(Control::Next);
        }
        controls
    }

    /// Resolve the extension responsible for a field
    pub fn extension_for(
        &self,
        schema: &FieldSchema,
    ) -> Result<&Arc<dyn FieldExtension>, StepperError> {
        let name = schema.field.as_deref().unwrap_or(TextInput::NAME);
        self.extensions
            .iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| StepperError::UnknownExtension(name.to_string()))
    }

    pub(crate) fn field_props<'a>(
        &'a self,
        schema: &'a FieldSchema,
        focused: bool,
    ) -> FieldProps<'a> {
        FieldProps {
            form_data: self.state.form_data.get(&schema.name),
            raw_errors: self.state.errors_for(&schema.name),
            required: schema.required,
            schema,
            focused,
        }
    }

    /// Error texts attributable to the active step, in field order
    pub fn visible_errors(&self) -> Vec<String> {
        let Some(step) = self.current_step() else {
            return Vec::new();
        };
        step.schema
            .iter()
            .flat_map(|f| self.state.errors_for(&f.name).iter())
            .filter(|e| !e.is_empty())
            .cloned()
            .collect()
    }

    /// Activate a control, as a click on it would.
    ///
    /// `Next` validates the active step first and only advances when every
    /// field passes; failed validations leave their messages in the state.
    /// Pressing a control that is not currently rendered fails.
    pub async fn press(&mut self, control: Control) -> Result<(), StepperError> {
        if !self.controls().contains(&control) {
            return Err(StepperError::ControlNotFound(control));
        }

        match control {
            Control::Back => {
                self.state.active_step -= 1;
                self.state.clear_errors();
                self.reset_focus();
            }
            Control::Next => {
                let step = self.state.active_step;
                if self.validate_step(step).await? {
                    self.state.active_step += 1;
                    self.reset_focus();
                } else {
                    tracing::debug!(step, "validation kept the form on its step");
                }
            }
            Control::Create => {
                self.state.completed = true;
                tracing::info!("form completed");
                if let Some(handler) = self.on_create.as_mut() {
                    handler.created(&self.state.form_data);
                }
            }
        }
        Ok(())
    }

    /// Press the button currently selected on the buttons row
    pub async fn press_selected(&mut self) -> Result<(), StepperError> {
        let controls = self.controls();
        let index = self.state.selected_button.min(controls.len() - 1);
        self.press(controls[index]).await
    }

    /// Route a keystroke: focus cycling, button selection, or field editing
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<(), StepperError> {
        let field_count = self.field_count();
        let on_buttons = self.state.is_buttons_row_active(field_count);

        match key.code {
            KeyCode::Tab => self.state.next_field(field_count),
            KeyCode::BackTab => self.state.prev_field(field_count),
            KeyCode::Left if on_buttons => {
                let count = self.controls().len();
                if self.state.selected_button == 0 {
                    self.state.selected_button = count - 1;
                } else {
                    self.state.selected_button -= 1;
                }
            }
            KeyCode::Right if on_buttons => {
                self.state.selected_button = (self.state.selected_button + 1) % self.controls().len();
            }
            KeyCode::Enter if on_buttons => self.press_selected().await?,
            _ if !on_buttons => self.edit_focused_field(key)?,
            _ => {}
        }
        Ok(())
    }

    fn edit_focused_field(&mut self, key: KeyEvent) -> Result<(), StepperError> {
        let Some(schema) = self
            .current_step()
            .and_then(|s| s.schema.get(self.state.active_field))
            .cloned()
        else {
            return Ok(());
        };
        let extension = self.extension_for(&schema)?.clone();

        let updated = {
            let props = self.field_props(&schema, true);
            extension.on_key(key, &props)
        };
        if let Some(value) = updated {
            self.state.form_data.insert(schema.name.clone(), value);
        }
        Ok(())
    }

    async fn validate_step(&mut self, step: usize) -> Result<bool, StepperError> {
        let Some(step_def) = self.manifest.steps.get(step) else {
            return Ok(true);
        };
        let fields = step_def.schema.clone();

        let mut all_ok = true;
        for field in &fields {
            let extension = self.extension_for(field)?.clone();
            let value = self
                .state
                .form_data
                .get(&field.name)
                .cloned()
                .unwrap_or(Value::Null);

            let mut sink = ValidationSink::new();
            if field.required && is_empty_value(&value) {
                sink.add_error(format!("{} is a required field", field.title));
            }
            extension.validate(&value, &mut sink).await;

            all_ok &= sink.is_empty();
            self.state.set_errors(&field.name, sink.into_errors());
        }
        Ok(all_ok)
    }

    fn reset_focus(&mut self) {
        self.state.active_field = 0;
        self.state.selected_button = 0;
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::DelayingInput;
    use crate::manifest::{FieldSchema, FormStep, Manifest};
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use std::time::Duration;

    fn fast_delaying() -> Arc<dyn FieldExtension> {
        Arc::new(DelayingInput::with_delay(Duration::from_millis(1)))
    }

    fn single_step_manifest() -> Manifest {
        Manifest::new("Demo").with_step(
            FormStep::new("Check").with_field(FieldSchema::extension(
                "check",
                "Test Field",
                DelayingInput::NAME,
            )),
        )
    }

    fn two_step_manifest() -> Manifest {
        Manifest::new("Demo")
            .with_step(FormStep::new("Details").with_field(FieldSchema::text("name", "Name")))
            .with_step(FormStep::new("Extras").with_field(FieldSchema::text("notes", "Notes")))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    mod controls {
        use super::*;

        #[test]
        fn test_first_step_renders_next_only() {
            let stepper = Stepper::new(two_step_manifest(), vec![]);
            assert_eq!(stepper.controls(), vec![Control::Next]);
        }

        #[tokio::test]
        async fn test_later_steps_render_back() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.press(Control::Next).await.unwrap();
            assert_eq!(stepper.controls(), vec![Control::Back, Control::Next]);
        }

        #[tokio::test]
        async fn test_review_renders_create() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.press(Control::Next).await.unwrap();
            stepper.press(Control::Next).await.unwrap();
            assert!(stepper.is_review());
            assert_eq!(stepper.controls(), vec![Control::Back, Control::Create]);
        }

        #[tokio::test]
        async fn test_pressing_missing_control_fails() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);

            let err = stepper.press(Control::Back).await.unwrap_err();
            assert!(matches!(err, StepperError::ControlNotFound(Control::Back)));
            assert_eq!(err.to_string(), "back button is not rendered");

            let err = stepper.press(Control::Create).await.unwrap_err();
            assert!(matches!(
                err,
                StepperError::ControlNotFound(Control::Create)
            ));
        }
    }

    mod navigation {
        use super::*;

        #[tokio::test]
        async fn test_next_advances_when_validation_passes() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.press(Control::Next).await.unwrap();
            assert_eq!(stepper.state().active_step, 1);
            assert!(!stepper.state().has_errors());
        }

        #[tokio::test]
        async fn test_back_returns_and_clears_errors() {
            let mut stepper = Stepper::new(single_step_manifest(), vec![fast_delaying()]);
            stepper.press(Control::Next).await.unwrap();
            assert!(stepper.state().has_errors());

            // the step did not advance, so back stays unavailable
            let err = stepper.press(Control::Back).await.unwrap_err();
            assert!(matches!(err, StepperError::ControlNotFound(_)));

            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.press(Control::Next).await.unwrap();
            stepper.press(Control::Back).await.unwrap();
            assert_eq!(stepper.state().active_step, 0);
            assert!(!stepper.state().has_errors());
        }

        #[tokio::test]
        async fn test_required_field_blocks_advancement() {
            let manifest = Manifest::new("Demo").with_step(
                FormStep::new("Details").with_field(FieldSchema::text("name", "Name").required()),
            );
            let mut stepper = Stepper::new(manifest, vec![]);

            stepper.press(Control::Next).await.unwrap();
            assert_eq!(stepper.state().active_step, 0);
            assert_eq!(
                stepper.visible_errors(),
                vec!["Name is a required field".to_string()]
            );

            stepper
                .state
                .form_data
                .insert("name".to_string(), Value::String("svc".to_string()));
            stepper.press(Control::Next).await.unwrap();
            assert_eq!(stepper.state().active_step, 1);
            assert!(stepper.visible_errors().is_empty());
        }

        #[tokio::test]
        async fn test_failed_validator_records_errors() {
            let mut stepper = Stepper::new(single_step_manifest(), vec![fast_delaying()]);
            stepper.press(Control::Next).await.unwrap();

            assert_eq!(stepper.state().active_step, 0);
            assert_eq!(
                stepper.visible_errors(),
                vec!["value was not equal to pass".to_string()]
            );
        }

        #[tokio::test]
        async fn test_unknown_extension_fails_loudly() {
            let manifest = Manifest::new("Demo").with_step(
                FormStep::new("Check").with_field(FieldSchema::extension(
                    "check",
                    "Check",
                    "Missing",
                )),
            );
            let mut stepper = Stepper::new(manifest, vec![]);

            let err = stepper.press(Control::Next).await.unwrap_err();
            assert!(matches!(err, StepperError::UnknownExtension(name) if name == "Missing"));
        }
    }

    mod creation {
        use super::*;

        #[tokio::test]
        async fn test_create_invokes_handler_with_form_data() {
            let mut handler = MockCreateHandler::new();
            handler
                .expect_created()
                .times(1)
                .withf(|data| data.get("check") == Some(&json!({ "test": "pass" })))
                .returning(|_| ());

            let mut stepper = Stepper::new(single_step_manifest(), vec![fast_delaying()]);
            let mut initial = FormData::new();
            initial.insert("check".to_string(), json!({ "test": "pass" }));
            stepper.set_form_data(initial);
            stepper.set_create_handler(Box::new(handler));

            stepper.press(Control::Next).await.unwrap();
            assert!(stepper.is_review());
            stepper.press(Control::Create).await.unwrap();
            assert!(stepper.is_completed());
        }

        #[tokio::test]
        async fn test_create_without_handler_still_completes() {
            let mut stepper = Stepper::new(Manifest::new("Empty"), vec![]);
            assert!(stepper.is_review());
            stepper.press(Control::Create).await.unwrap();
            assert!(stepper.is_completed());
        }
    }

    mod key_handling {
        use super::*;

        #[tokio::test]
        async fn test_typing_edits_the_focused_field() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.handle_key(key(KeyCode::Char('h'))).await.unwrap();
            stepper.handle_key(key(KeyCode::Char('i'))).await.unwrap();
            assert_eq!(
                stepper.state().form_data.get("name"),
                Some(&Value::String("hi".to_string()))
            );

            stepper.handle_key(key(KeyCode::Backspace)).await.unwrap();
            assert_eq!(
                stepper.state().form_data.get("name"),
                Some(&Value::String("h".to_string()))
            );
        }

        #[tokio::test]
        async fn test_enter_on_buttons_row_presses_selected() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.handle_key(key(KeyCode::Tab)).await.unwrap(); // buttons row
            stepper.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(stepper.state().active_step, 1);
        }

        #[tokio::test]
        async fn test_button_selection_wraps() {
            let mut stepper = Stepper::new(two_step_manifest(), vec![]);
            stepper.press(Control::Next).await.unwrap(); // [Back, Next]
            stepper.handle_key(key(KeyCode::Tab)).await.unwrap();

            stepper.handle_key(key(KeyCode::Right)).await.unwrap();
            assert_eq!(stepper.state().selected_button, 1);
            stepper.handle_key(key(KeyCode::Right)).await.unwrap();
            assert_eq!(stepper.state().selected_button, 0);
            stepper.handle_key(key(KeyCode::Left)).await.unwrap();
            assert_eq!(stepper.state().selected_button, 1);
        }
    }
}
