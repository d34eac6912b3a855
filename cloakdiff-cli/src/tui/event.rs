//! Event handling for the TUI

use std::time::{Duration, Instant};

use cloakdiff_core::layout::pointer_fraction;
use cloakdiff_core::Side;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use super::app::{copy_button_span, App, Phase};

/// Keyboard nudge applied by `<` and `>`
const NUDGE: f64 = 0.05;
/// Lines per mouse wheel notch
const WHEEL_LINES: isize = 3;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Load the named sample scenario
    SwitchScenario(String),
    /// Retry the current load
    Reload,
    /// Split ratio committed; persist it
    LayoutChanged,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> HandleResult {
    if key.kind == KeyEventKind::Release {
        return HandleResult::Continue;
    }

    // Global quit shortcuts (Ctrl+C, Ctrl+Q)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            _ => {}
        }
    }

    match app.phase {
        Phase::Loading => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => HandleResult::Quit,
            _ => HandleResult::Continue,
        },
        Phase::Failed(_) => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => HandleResult::Quit,
            KeyCode::Char('r') => HandleResult::Reload,
            _ => scenario_keys(app, key),
        },
        Phase::Ready => handle_ready(app, key, now),
    }
}

fn handle_ready(app: &mut App, key: KeyEvent, now: Instant) -> HandleResult {
    let focus = app.focus;
    match key.code {
        KeyCode::Char('q') => HandleResult::Quit,

        // Focus
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            HandleResult::Continue
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.focus = Side::Left;
            HandleResult::Continue
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.focus = Side::Right;
            HandleResult::Continue
        }

        // Scrolling
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll(focus, 1);
            HandleResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll(focus, -1);
            HandleResult::Continue
        }
        KeyCode::PageDown | KeyCode::Char(' ') => {
            let page = app.page_height(focus) as isize;
            app.scroll(focus, page);
            HandleResult::Continue
        }
        KeyCode::PageUp => {
            let page = app.page_height(focus) as isize;
            app.scroll(focus, -page);
            HandleResult::Continue
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.scroll_to(focus, 0);
            HandleResult::Continue
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.scroll_to(focus, usize::MAX);
            HandleResult::Continue
        }

        // Clipboard
        KeyCode::Char('c') => {
            app.copy(focus, now);
            HandleResult::Continue
        }

        // Split
        KeyCode::Char('<') => {
            app.layout_mut().nudge(-NUDGE);
            HandleResult::LayoutChanged
        }
        KeyCode::Char('>') => {
            app.layout_mut().nudge(NUDGE);
            HandleResult::LayoutChanged
        }
        KeyCode::Char('=') => {
            app.layout_mut().reset();
            HandleResult::LayoutChanged
        }

        _ => scenario_keys(app, key),
    }
}

/// `s` cycles scenarios, `1`..`9` pick one; only while browsing samples
fn scenario_keys(app: &mut App, key: KeyEvent) -> HandleResult {
    if app.scenario.is_none() {
        return HandleResult::Continue;
    }
    match key.code {
        KeyCode::Char('s') => match app.next_scenario() {
            Some(name) => HandleResult::SwitchScenario(name),
            None => HandleResult::Continue,
        },
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            match app.catalog.scenarios().get(index) {
                Some(scenario) => HandleResult::SwitchScenario(scenario.name.clone()),
                None => {
                    app.set_status(format!("No scenario #{digit}"));
                    HandleResult::Continue
                }
            }
        }
        _ => HandleResult::Continue,
    }
}

/// Handle a mouse event
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) -> HandleResult {
    if app.phase != Phase::Ready {
        return HandleResult::Continue;
    }
    let geometry = app.geometry();
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if geometry.on_divider(column, row) {
                app.layout_mut().begin_drag();
                return HandleResult::Continue;
            }
            if let Some(side) = geometry.side_at(column, row) {
                app.focus = side;
                let pane = geometry.pane(side);
                let copied = app
                    .session
                    .as_ref()
                    .map(|session| session.ack().is_copied(side))
                    .unwrap_or(false);
                let (start, end) = copy_button_span(pane, copied);
                if row == pane.y && column >= start && column < end {
                    app.copy(side, now);
                }
            }
            HandleResult::Continue
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let (origin, extent) = geometry.track();
            let fraction = pointer_fraction(column, origin, extent);
            app.layout_mut().drag_to(fraction);
            HandleResult::Continue
        }
        MouseEventKind::Up(MouseButton::Left) => match app.layout_mut().end_drag() {
            Some(_) => HandleResult::LayoutChanged,
            None => HandleResult::Continue,
        },
        MouseEventKind::ScrollDown => {
            if let Some(side) = geometry.side_at(column, row) {
                app.scroll(side, WHEEL_LINES);
            }
            HandleResult::Continue
        }
        MouseEventKind::ScrollUp => {
            if let Some(side) = geometry.side_at(column, row) {
                app.scroll(side, -WHEEL_LINES);
            }
            HandleResult::Continue
        }
        _ => HandleResult::Continue,
    }
}
