//! MovieTUI - terminal movie browser backed by TMDB
//!
//! Browse, search and filter movies, keep favorites and find trailers,
//! all from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! movietui
//!
//! # CLI mode (for automation)
//! movietui search "blade runner"
//! movietui discover --genre 878 --min-rating 7
//! movietui favorites list --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use movietui::cli::{Cli, Command, ExitCode, Output};
use movietui::config::Config;
use movietui::controller::{Completion, Controller};
use movietui::storage::FileStore;
use movietui::store::Stores;
use movietui::{commands, logging, ui, App};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui(cli).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    logging::init_stderr_logging(cli.verbose);
    let output = Output::new(&cli);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
    };

    match cli.command {
        Some(Command::Discover(cmd)) => commands::discover_cmd(cmd, &config, &output).await,

        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &config, &output).await,

        Some(Command::Trending(cmd)) => commands::trending_cmd(cmd, &config, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &config, &output).await,

        Some(Command::Genres) => commands::genres_cmd(&config, &output).await,

        Some(Command::Favorites(cmd)) => commands::favorites_cmd(cmd, &config, &output).await,

        Some(Command::Theme(cmd)) => commands::theme_cmd(cmd, &config, &output).await,

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = match logging::init_file_logging(&config.log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };

    // Fail before touching the terminal if there is no API key
    let client = config.client()?;
    let storage_path = config.storage_path();
    let storage = FileStore::open(&storage_path)
        .with_context(|| format!("Cannot open storage {}", storage_path.display()))?;

    let mut app = App::new(Stores::with_storage(Arc::new(storage)));
    let (controller, completions) = Controller::new(client);
    tracing::info!("Starting TUI");

    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &controller, completions).await;

    app.shutdown();

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - renders, handles input, dispatches work and applies
/// finished work
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    controller: &Controller,
    mut completions: UnboundedReceiver<Completion>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        for intent in app.drain_intents() {
            controller.dispatch(intent);
        }

        while let Ok(completion) = completions.try_recv() {
            app.apply(completion);
        }

        // Applying completions can queue follow-up work
        for intent in app.drain_intents() {
            controller.dispatch(intent);
        }
    }

    tracing::info!("TUI exited");
    Ok(())
}
