//! Stepform TUI - demo harness for multi-step scaffolding forms
//!
//! Mounts the demo manifest with the delaying field registered and drives it
//! in a real terminal.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stepform_tui::config::TuiConfig;
use stepform_tui::extensions::DelayingInput;
use stepform_tui::manifest::{FieldSchema, FormStep, Manifest};
use stepform_tui::stepper::Stepper;
use stepform_tui::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepform_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = TuiConfig::load().unwrap_or_default();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut stepper = demo_stepper(&config);
    let result = run_app(&mut terminal, &mut stepper, config.poll_interval()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Demo form: one plain step plus the delayed-validation check
fn demo_stepper(config: &TuiConfig) -> Stepper {
    let manifest = Manifest::new("Scaffold a Service")
        .with_step(
            FormStep::new("Details").with_field(
                FieldSchema::text("name", "Name")
                    .required()
                    .with_description("name of the new service"),
            ),
        )
        .with_step(
            FormStep::new("Validation check").with_field(
                FieldSchema::extension("check", "Test Field", DelayingInput::NAME)
                    .with_description("type pass to continue"),
            ),
        );

    Stepper::new(
        manifest,
        vec![Arc::new(DelayingInput::with_delay(
            config.validation_delay(),
        ))],
    )
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    stepper: &mut Stepper,
    poll_interval: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, stepper))?;

        if stepper.is_completed() {
            tracing::info!("form submitted, exiting");
            return Ok(());
        }

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                // Global quit: Esc or Ctrl+C
                if key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    return Ok(());
                }

                stepper.handle_key(key).await?;
            }
        }
    }
}
