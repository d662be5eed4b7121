//! Interactive demo shell.
//!
//! A minimal terminal host that drives the session gate and the layout
//! selector the way the full back office would: terminal resize events feed
//! the environment hub, a keypress plays the role of the settings toggle
//! that writes the forced-mobile flag, and other keys simulate auth
//! provider transitions. The shell prints the gate decision and layout mode
//! whenever either changes.

use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::auth::MemoryAuthProvider;
use crate::config::FlagStore;
use crate::constants::FORCE_MOBILE_KEY;
use crate::env::EnvironmentHub;
use crate::gate::SessionGate;
use crate::layout::{LayoutModeSelector, StandardLayoutPolicy};
use crate::models::{Role, Session, User};

/// Rough logical-pixel width of one terminal cell, used to map terminal
/// columns onto the viewport breakpoint.
pub const PIXELS_PER_CELL: u16 = 8;

/// Runs the demo shell until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event polling fails.
pub fn run_shell(
    provider: &MemoryAuthProvider,
    hub: &EnvironmentHub,
    store: Rc<dyn FlagStore>,
) -> Result<()> {
    let gate = SessionGate::new(provider.clone());
    let policy = Rc::new(StandardLayoutPolicy::new(Rc::clone(&store)));
    let selector = LayoutModeSelector::mount(hub, policy);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let result = event_loop(&gate, &selector, hub, &store);
    disable_raw_mode().context("Failed to disable raw mode")?;

    result
}

/// Main event loop: poll with a 100ms timeout, translate host events into
/// hub events, reprint status on change.
fn event_loop(
    gate: &SessionGate<MemoryAuthProvider>,
    selector: &LayoutModeSelector,
    hub: &EnvironmentHub,
    store: &Rc<dyn FlagStore>,
) -> Result<()> {
    print_help()?;

    let mut last_status = String::new();
    loop {
        let status = format_status(gate, selector);
        if status != last_status {
            print_line(&status)?;
            last_status = status;
        }

        if !event::poll(Duration::from_millis(100)).context("Failed to poll terminal events")? {
            continue;
        }

        match event::read().context("Failed to read terminal event")? {
            Event::Key(key) => {
                if handle_key(&key, gate, hub, store)? {
                    break; // User quit
                }
            }
            Event::Resize(cols, rows) => {
                hub.notify_resized(cols * PIXELS_PER_CELL, rows * PIXELS_PER_CELL);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Handles one keypress. Returns true when the user quits.
fn handle_key(
    key: &KeyEvent,
    gate: &SessionGate<MemoryAuthProvider>,
    hub: &EnvironmentHub,
    store: &Rc<dyn FlagStore>,
) -> Result<bool> {
    if key.kind != KeyEventKind::Press {
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('m') => {
            // The settings toggle: write the store, then notify, exactly
            // like a second app instance would.
            let next = !store.forced_mobile();
            store.set_forced_mobile(next)?;
            hub.notify_flag_changed(FORCE_MOBILE_KEY);
            print_line(&format!("forced-mobile flag set to {next}"))?;
        }
        KeyCode::Char('i') => {
            let user = User::new("u-demo", "Demo Cashier", Role::Cashier);
            let session = Session::new("demo-token");
            gate.provider().sign_in(user, session);
        }
        KeyCode::Char('o') => gate.provider().sign_out(),
        KeyCode::Char('l') => gate.provider().begin_loading(),
        KeyCode::Char('r') => gate.provider().resolve_signed_out(),
        _ => {}
    }

    Ok(false)
}

fn format_status(gate: &SessionGate<MemoryAuthProvider>, selector: &LayoutModeSelector) -> String {
    let mode = selector.mode();
    format!(
        "gate: {:?} | layout: mobile={} (device={})",
        gate.decide(),
        mode.is_mobile,
        mode.is_actual_mobile
    )
}

fn print_help() -> Result<()> {
    print_line("keys: [i] sign in  [o] sign out  [l] loading  [r] resolve  [m] toggle mobile  [q] quit")
}

/// Prints one line in raw mode (explicit carriage return).
fn print_line(line: &str) -> Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{line}\r\n").context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}
