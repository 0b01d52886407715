//! quickjump - jump to a file from the terminal.

use std::io::{self, Write};
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use quickjump::core::{CandidatePath, PickerConfig, PickerMode, WorkspaceRoot};
use quickjump::ui::{handle_input, launch_editor, render, App};

/// A fast, keyboard-driven fuzzy file jumper.
#[derive(Parser, Debug)]
#[command(name = "quickjump", version, about)]
struct Cli {
    /// Workspace directory to jump within (defaults to the current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Initial query
    #[arg(short = 'q', long = "query")]
    query: Option<String>,

    /// Only list recently opened files
    #[arg(short = 'r', long = "recent")]
    recent: bool,

    /// Override the maximum number of results
    #[arg(long = "max-results", value_name = "N")]
    max_results: Option<usize>,
}

/// RAII guard for terminal state. Restores terminal on drop (including panic).
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        let _ = io::stdout().flush();
    }
}

fn main() -> ExitCode {
    quickjump::metrics::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let root = WorkspaceRoot::open(&dir)?;

    let mut config = PickerConfig::load();
    if let Some(n) = cli.max_results {
        config.max_results = n;
    }

    let mode = if cli.recent {
        PickerMode::RecentFiles
    } else {
        PickerMode::Standard
    };

    // Set panic hook to ensure terminal cleanup
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        let _ = io::stdout().flush();
        default_hook(info);
    }));

    let mut app = App::new(root, config, mode, cli.query)?;
    let accepted = run_tui(&mut app)?;

    // The terminal is restored here; a committed open execs the editor.
    if let Some((candidate, line, _col)) = accepted {
        if let Err(msg) = launch_editor(&candidate.abs, line) {
            eprintln!("Error: {}", msg);
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_tui(app: &mut App) -> Result<Option<(CandidatePath, u32, u32)>> {
    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.poll_worker();

        // Only redraw if dirty or on resize
        if app.ui.dirty {
            terminal.draw(|frame| render(frame, app))?;
            app.ui.dirty = false;
        }

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;

            if matches!(event, crossterm::event::Event::Resize(_, _)) {
                app.ui.dirty = true;
            }

            handle_input(app, event);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(app.host.take_pending_open())
}
