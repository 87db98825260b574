//! Transient state of a mounted multi-step form

use std::collections::BTreeMap;

use serde_json::Value;

/// Form data collected across steps, keyed by field name
pub type FormData = serde_json::Map<String, Value>;

/// Mutable state owned by a [`Stepper`](crate::stepper::Stepper).
///
/// Positions `0..step_count` are manifest steps; position `step_count` is the
/// review screen. `active_field == field_count` means the buttons row has
/// focus.
#[derive(Debug, Clone, Default)]
pub struct StepperState {
    pub active_step: usize,
    pub active_field: usize,
    pub selected_button: usize,
    pub form_data: FormData,
    pub completed: bool,
    errors: BTreeMap<String, Vec<String>>,
}

impl StepperState {
    pub fn new(initial: FormData) -> Self {
        Self {
            form_data: initial,
            ..Self::default()
        }
    }

    /// Move focus to the next position, wrapping past the buttons row
    pub fn next_field(&mut self, field_count: usize) {
        self.active_field = (self.active_field + 1) % (field_count + 1);
    }

    /// Move focus to the previous position, wrapping to the buttons row
    pub fn prev_field(&mut self, field_count: usize) {
        if self.active_field == 0 {
            self.active_field = field_count;
        } else {
            self.active_field -= 1;
        }
    }

    pub fn is_buttons_row_active(&self, field_count: usize) -> bool {
        self.active_field == field_count
    }

    /// Errors currently recorded against a field
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_errors(&mut self, field: &str, errors: Vec<String>) {
        if errors.is_empty() {
            self.errors.remove(field);
        } else {
            self.errors.insert(field.to_string(), errors);
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
