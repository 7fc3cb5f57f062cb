//! CLI - Command Line Interface for MovieTUI
//!
//! Every browse action of the TUI is scriptable. Output is JSON when
//! `--json` is given or stdout is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Discover with filters
//! movietui discover --genre 28 --year 1999 --min-rating 7
//!
//! # Search and inspect
//! movietui search "alien" --json
//! movietui info 348
//!
//! # Local state
//! movietui favorites add 348
//! movietui theme toggle
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::TmdbError;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error
    Error = 1,
    InvalidArgs = 2,
    NetworkError = 3,
    /// Movie or resource does not exist
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&TmdbError> for ExitCode {
    fn from(err: &TmdbError) -> ExitCode {
        match err {
            TmdbError::NotFound => ExitCode::NotFound,
            TmdbError::RequestFailed(_) | TmdbError::ServerError(_) => ExitCode::NetworkError,
            TmdbError::Unauthorized | TmdbError::InvalidResponse(_) => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MovieTUI - terminal movie browser backed by TMDB
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "movietui",
    version,
    author = "Gorka & Hermes",
    about = "Terminal movie browser backed by TMDB",
    long_about = "Browse, search and filter movies from TMDB, keep a list of \
                  favorites and watch trailers.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  movietui                            Launch interactive TUI\n\
                  movietui search \"alien\"             Search by title\n\
                  movietui discover --genre 28        Discover action movies\n\
                  movietui favorites list --json      List favorites as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse movies by genre, year and rating
    #[command(visible_alias = "d")]
    Discover(DiscoverCmd),

    /// Search movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Movies trending this week
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Details and trailer for one movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List the genre taxonomy
    Genres,

    /// Manage favorites
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),

    /// Show or change the color theme
    Theme(ThemeCmd),
}

fn page_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..)
}

/// Filter-driven listing
#[derive(Args, Debug)]
pub struct DiscoverCmd {
    /// TMDB genre id (see `movietui genres`)
    #[arg(long, short = 'g')]
    pub genre: Option<u32>,

    /// Primary release year
    #[arg(long, short = 'y')]
    pub year: Option<u16>,

    /// Minimum vote average (0-10)
    #[arg(long, short = 'r')]
    pub min_rating: Option<f32>,

    /// Page number
    #[arg(long, short = 'p', default_value_t = 1, value_parser = page_parser())]
    pub page: u32,
}

/// Title search; a blank query falls back to discover
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query
    #[arg(required = true)]
    pub query: String,

    /// Page number
    #[arg(long, short = 'p', default_value_t = 1, value_parser = page_parser())]
    pub page: u32,
}

#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Page number
    #[arg(long, short = 'p', default_value_t = 1, value_parser = page_parser())]
    pub page: u32,
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB movie id
    #[arg(required = true)]
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct FavoritesCmd {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesAction {
    /// Show favorites with their details
    #[command(visible_alias = "ls")]
    List,
    /// Add a movie id
    Add { id: u64 },
    /// Remove a movie id
    #[command(visible_alias = "rm")]
    Remove { id: u64 },
    /// Remove every favorite
    Clear,
}

#[derive(Args, Debug)]
pub struct ThemeCmd {
    /// New theme; omit to print the current one
    #[arg(value_enum)]
    pub mode: Option<ThemeArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print `data` as a JSON envelope, or as the text `human` renders
    pub fn print<T: Serialize>(&self, data: T, human: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", human(&data));
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
