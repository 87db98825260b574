//! Stepform TUI - terminal harness for multi-step scaffolding forms
//!
//! Two pieces of tooling over one small form host: pluggable field
//! extensions (including an input whose validation completes only after an
//! artificial delay), and a test driver that mounts a multi-step form in a
//! test terminal and drives it programmatically.

pub mod config;
pub mod driver;
pub mod extension;
pub mod extensions;
pub mod manifest;
pub mod stepper;
pub mod ui;

pub use driver::{render_in_form, CreateSpy, FormRender, RenderOptions};
pub use extension::{FieldExtension, FieldProps, ValidationSink};
pub use extensions::{DelayingInput, TextInput};
pub use manifest::{FieldSchema, FormStep, Manifest};
pub use stepper::{Control, CreateHandler, FormData, Stepper, StepperError};
