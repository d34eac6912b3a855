//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cloakdiff_core::loader::Loader;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use super::app::{App, AppSettings, LoadTarget};
use super::event::{handle_key, handle_mouse, poll_event, HandleResult};
use super::ui;

/// Redraw and timer resolution
const TICK: Duration = Duration::from_millis(100);

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the viewer until the user quits. Must be called from within a tokio
/// runtime; retrievals run as tasks on it.
pub fn run(target: LoadTarget, settings: AppSettings, loader: Loader) -> Result<()> {
    let loader = Arc::new(loader);
    let mut app = App::new(target, settings);

    let mut terminal = init_terminal()?;
    app.begin_load(loader.clone());

    let result = run_loop(&mut terminal, &mut app, &loader);

    // Outstanding retrievals must not outlive the session
    app.cancel_pending();

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    loader: &Arc<Loader>,
) -> Result<()> {
    loop {
        let completed = terminal.draw(|frame| ui::render(frame, app))?;
        if app.viewport != completed.area {
            app.viewport = completed.area;
            app.clamp_scroll();
        }

        if let Some(event) = poll_event(TICK)? {
            let now = Instant::now();
            let outcome = match event {
                Event::Key(key) => handle_key(app, key, now),
                Event::Mouse(mouse) => handle_mouse(app, mouse, now),
                // Geometry is recomputed on the next draw
                Event::Resize(_, _) => HandleResult::Continue,
                _ => HandleResult::Continue,
            };

            match outcome {
                HandleResult::Quit => break,
                HandleResult::Continue => {}
                HandleResult::SwitchScenario(name) => {
                    info!(scenario = %name, "switching sample scenario");
                    app.switch_scenario(&name, loader.clone());
                }
                HandleResult::Reload => app.begin_load(loader.clone()),
                HandleResult::LayoutChanged => {
                    app.clamp_scroll();
                    app.persist_layout();
                }
            }
        }

        app.poll_load();
        if app.tick(Instant::now()) {
            app.status_message = None;
        }
    }

    Ok(())
}
