//! hn-front — the Hacker News front page in your terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ FetchResult ┌──────────┐ compute_view ┌──────────┐
//! │ fetch.rs  │ ──────────► │  app.rs  │ ───────────► │  ui.rs   │
//! │ (tokio)   │  (channel)  │ (state)  │   (view.rs)  │ (render) │
//! └───────────┘             └──────────┘              └──────────┘
//!       ▲ request() on retry     ▲
//!       └────────────────────────┤ handle_key_event()
//!                           ┌──────────┐
//!                           │ input.rs │
//!                           └──────────┘
//! ```
//!
//! * **`source/`** — the `StorySource` trait, the `Story`/`Batch` types and
//!   the Algolia implementation.
//! * **`fetch`** — runs one fetch at a time on the tokio runtime; newer
//!   requests supersede older ones.
//! * **`view`** — the pure filter/sort/paginate pipeline.
//! * **`app`** — owns session state (cached batch, view state, status).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`**, **`logging`** — command line and log file setup.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod config;
mod fetch;
mod input;
mod logging;
mod source;
mod ui;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Cli;
use fetch::Fetcher;
use source::AlgoliaSource;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        log::error!("panic: {info}");
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.no_log {
        logging::initialize(&cli.log_file, cli.log_level);
    }
    install_panic_hook();

    // -- story source + background fetcher -----------------------------------
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let source = AlgoliaSource::new(cli.algolia_settings()).context("failed to build HTTP client")?;
    let mut fetcher = Fetcher::new(Arc::new(source), runtime.handle().clone());

    let mut app = App::new(cli.view_state(), cli.page_size(), fetcher.source_name());
    app.apply_fetch(fetcher.request());

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Fold in a finished fetch, if any.
    //   2. Render.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    //   4. Start a new fetch if the user asked for one.
    let tick_rate = Duration::from_millis(100);

    loop {
        if let Some(result) = fetcher.poll() {
            app.apply_fetch(result);
        }

        guard.terminal.draw(|f| ui::draw(&app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }

        if app.take_retry() {
            app.apply_fetch(fetcher.request());
        }
    }

    log::info!("exiting");
    // `guard` is dropped here, restoring the terminal; the runtime is dropped
    // after it and cancels any fetch still in flight.
    Ok(())
}
