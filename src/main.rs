mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod report;
mod store;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use persistence::{init_local_data_dir, log_dir_for, resolve_data_file};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use store::TaskStore;

/// Poll timeout; also how often the running timer label refreshes
const TICK_RATE: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "tasktimer")]
#[command(about = "A terminal task list with per-task time tracking", long_about = None)]
struct Cli {
    /// Data file to use instead of <data dir>/tasks.json
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tasktimer directory in the current directory
    Init,
    /// Print the task table
    List,
    /// Write a markdown report of tasks and time per category
    Report {
        /// Output file path. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized data directory: {}", data_dir.display());
        println!();
        println!("tasktimer will now keep its tasks in this directory.");
        println!("Run 'tasktimer' to start tracking tasks.");
        return Ok(());
    }

    let data_file = resolve_data_file(cli.file)?;
    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        persistence::ensure_dir(parent)?;
    }
    let _logger = logging::init_logging(&cli.log_level, &log_dir_for(&data_file))?;

    let store = TaskStore::open(&data_file);
    if let Some(path) = store.path() {
        info!("using data file {}", path.display());
    }

    match cli.command {
        Some(Commands::List) => {
            print!("{}", report::render_task_table(store.tasks()));
            Ok(())
        }
        Some(Commands::Report { output }) => {
            if let Some(path) = report::write_report(&store, output.as_deref())? {
                println!("Report written: {}", path.display());
            }
            Ok(())
        }
        Some(Commands::Init) | None => run_tui(store),
    }
}

fn run_tui(store: TaskStore) -> Result<()> {
    let mut app = AppState::new(store);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    let restored = finish_tui(&mut app, || restore_terminal(&mut terminal));

    if let Some(status) = &app.status {
        if status.kind == domain::MessageKind::Error {
            eprintln!("{}", status.text);
        }
    }
    info!("exiting");

    if let Err(err) = &result {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
    }

    result.and(restored)
}

/// Stop and save a running session first, then hand the terminal back
fn finish_tui(app: &mut AppState, restore: impl FnOnce() -> Result<()>) -> Result<()> {
    app.shutdown();
    restore()
}

/// Leave raw mode and the alternate screen; every step is attempted even if one fails
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("Failed to show cursor");

    for err in [&raw, &screen, &cursor].into_iter().filter_map(|r| r.as_ref().err()) {
        error!("{:#}", err);
    }
    raw.and(screen).and(cursor)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // The timeout doubles as the tick that refreshes the running timer label
        if !event::poll(TICK_RATE)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only process key press events (ignore key release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // The memo editor needs the real terminal
        if input::opens_editor(app, &key) {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

            let outcome = input::handle_key(app, key);

            enable_raw_mode()?;
            execute!(io::stdout(), EnterAlternateScreen)?;
            terminal.clear().context("Failed to redraw after editor")?;

            if outcome? {
                return Ok(());
            }
        } else if input::handle_key(app, key)? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::TaskDraft;

    #[test]
    fn test_session_saved_when_terminal_restore_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path);
        store.create_task(TaskDraft::new("A")).unwrap();

        let mut app = AppState::new(store);
        app.start_timer();
        app.timer.start_at(chrono::Local::now() - chrono::Duration::seconds(30));

        let result = finish_tui(&mut app, || anyhow::bail!("terminal gone"));

        assert!(result.is_err());
        assert!(!app.is_timer_running());
        assert!(TaskStore::open(&path).tasks()[0].actual_sec >= 30);
    }
}
