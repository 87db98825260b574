//! Test driver for mounting and programmatically exercising stepper forms
//!
//! Mounts a [`Stepper`] onto a ratatui [`TestBackend`] terminal and exposes
//! imperative actions over it. Every action awaits the stepper (including any
//! pending validation delay) and flushes a redraw before returning, so
//! assertions made afterwards observe settled UI.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use ratatui::{backend::TestBackend, layout::Rect, Frame, Terminal};

use crate::extension::FieldExtension;
use crate::manifest::Manifest;
use crate::stepper::{Control, CreateHandler, FormData, Stepper};
use crate::ui;

const TERMINAL_WIDTH: u16 = 80;
const TERMINAL_HEIGHT: u16 = 30;

/// Chrome drawn around the form; returns the inner area the form occupies
pub type Wrapper = Box<dyn Fn(&mut Frame<'_>, Rect) -> Rect + Send>;

/// Options for [`render_in_form`]
pub struct RenderOptions {
    pub manifest: Manifest,
    pub extensions: Vec<Arc<dyn FieldExtension>>,
    pub initial_state: Option<FormData>,
    pub wrapper: Option<Wrapper>,
}

impl RenderOptions {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            extensions: Vec::new(),
            initial_state: None,
            wrapper: None,
        }
    }

    pub fn with_extension(mut self, extension: Arc<dyn FieldExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn with_initial_state(mut self, state: FormData) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn with_wrapper(mut self, wrapper: Wrapper) -> Self {
        self.wrapper = Some(wrapper);
        self
    }
}

/// Records invocations of the form's completion callback
#[derive(Clone, Default)]
pub struct CreateSpy {
    calls: Arc<Mutex<Vec<FormData>>>,
}

impl CreateSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("create spy poisoned").len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Payloads the callback was invoked with, in order
    pub fn calls(&self) -> Vec<FormData> {
        self.calls.lock().expect("create spy poisoned").clone()
    }
}

impl CreateHandler for CreateSpy {
    fn created(&mut self, data: &FormData) {
        self.calls
            .lock()
            .expect("create spy poisoned")
            .push(data.clone());
    }
}

/// Handle over a mounted form, owned by a single test
pub struct FormRender {
    terminal: Terminal<TestBackend>,
    stepper: Stepper,
    wrapper: Option<Wrapper>,
    on_create: CreateSpy,
}

/// Mount the form described by `options` into a test terminal and perform the
/// first draw
pub fn render_in_form(options: RenderOptions) -> Result<FormRender> {
    let RenderOptions {
        manifest,
        extensions,
        initial_state,
        wrapper,
    } = options;

    let on_create = CreateSpy::new();
    let mut stepper = Stepper::new(manifest, extensions);
    if let Some(state) = initial_state {
        stepper.set_form_data(state);
    }
    stepper.set_create_handler(Box::new(on_create.clone()));

    let backend = TestBackend::new(TERMINAL_WIDTH, TERMINAL_HEIGHT);
    let terminal = Terminal::new(backend)?;

    let mut render = FormRender {
        terminal,
        stepper,
        wrapper,
        on_create,
    };
    render.redraw()?;
    Ok(render)
}

impl FormRender {
    /// Activate the "next" control and wait for the UI to settle
    pub async fn navigate_to_next_step(&mut self) -> Result<()> {
        self.stepper.press(Control::Next).await?;
        self.redraw()
    }

    /// Activate the "back" control and wait for the UI to settle
    pub async fn navigate_to_previous_step(&mut self) -> Result<()> {
        self.stepper.press(Control::Back).await?;
        self.redraw()
    }

    /// Activate the "create" control and wait for the UI to settle
    pub async fn submit_form(&mut self) -> Result<()> {
        self.stepper.press(Control::Create).await?;
        self.redraw()
    }

    /// Advance through every step declared in the manifest, then submit
    pub async fn auto_complete_form(&mut self) -> Result<()> {
        for _ in 0..self.stepper.manifest().step_count() {
            self.navigate_to_next_step().await?;
        }
        self.submit_form().await
    }

    /// Text of every validation error currently displayed, empty entries
    /// filtered out
    pub fn errors(&self) -> Vec<String> {
        self.rows()
            .iter()
            .filter_map(|row| {
                row.trim_start()
                    .strip_prefix(ui::ERROR_MARKER)
                    .map(|rest| rest.trim().to_string())
            })
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// The completion-callback spy
    pub fn on_create(&self) -> &CreateSpy {
        &self.on_create
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// The rendered buffer as text, for content assertions
    pub fn buffer_text(&self) -> String {
        self.rows()
            .iter()
            .map(|row| row.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn rows(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn redraw(&mut self) -> Result<()> {
        let Self {
            terminal,
            stepper,
            wrapper,
            ..
        } = self;
        terminal.draw(|frame| {
            let area = frame.area();
            let inner = match wrapper {
                Some(wrapper) => wrapper(frame, area),
                None => area,
            };
            ui::draw_in(frame, inner, stepper);
        })?;
        Ok(())
    }
}
