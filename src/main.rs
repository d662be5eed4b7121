//! PrintDesk - session gate and layout demo shell
//!
//! Runs the shell core against a simulated auth provider inside the
//! terminal: resize the window to cross the mobile breakpoint, toggle the
//! persisted forced-mobile flag, and walk the gate through its states.

use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use printdesk::app::{run_shell, PIXELS_PER_CELL};
use printdesk::auth::MemoryAuthProvider;
use printdesk::config::{FlagStore, MemoryFlagStore, SettingsFlagStore};
use printdesk::constants::APP_NAME;
use printdesk::env::{EnvironmentHub, Viewport};

/// PrintDesk - session gate and layout demo shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// User-agent string reported to the device heuristic
    #[arg(long, default_value = "PrintDesk/terminal (X11; Linux x86_64)")]
    user_agent: String,

    /// Start with the forced-mobile flag set
    #[arg(long)]
    force_mobile: bool,

    /// Read and write the flag through the persisted settings store
    /// instead of an in-memory one
    #[arg(long)]
    persist: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!("Session gate and layout demo shell");
    println!();

    let store: Rc<dyn FlagStore> = if cli.persist {
        let store = SettingsFlagStore::new();
        if cli.force_mobile {
            store.set_forced_mobile(true)?;
        }
        Rc::new(store)
    } else {
        Rc::new(MemoryFlagStore::new(cli.force_mobile))
    };

    // Seed the viewport from the real terminal size; resize events keep it
    // current from here on.
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let viewport = Viewport::new(cols * PIXELS_PER_CELL, rows * PIXELS_PER_CELL);
    let hub = EnvironmentHub::new(viewport, cli.user_agent);

    // A real provider would resolve a persisted session here; the demo
    // resolves straight to signed-out and lets keys drive transitions.
    let provider = MemoryAuthProvider::new();
    provider.resolve_signed_out();

    run_shell(&provider, &hub, store)
}
