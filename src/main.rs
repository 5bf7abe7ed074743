// ABOUTME: Main entry point for the QuickCopy TUI application

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{error, info};

use quickcopy::app::{App, EventHandler};
use quickcopy::clipboard::SystemClipboard;
use quickcopy::components::LayoutComponent;
use quickcopy::config::AppConfig;
use quickcopy::store::{FileStore, MemoryStore, SessionStore};

#[derive(Debug, Parser)]
#[command(name = "quickcopy", version, about = "Copy pasted text to the clipboard one line at a time")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding saved panels and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep panels in memory only and write no log file
    #[arg(long)]
    ephemeral: bool,

    /// Idle time in milliseconds before edits are saved
    #[arg(long)]
    debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print saved panels and their progress
    List,
    /// Remove every saved panel
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Some(log_dir) = config.log_dir() {
        setup_logging(&log_dir);
    }

    let store: Arc<dyn SessionStore> = if config.storage.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(config.data_dir()))
    };

    match cli.command {
        Some(Command::List) => list_panels(store.as_ref()).await,
        Some(Command::Clear) => clear_panels(store.as_ref()).await,
        None => {
            setup_panic_handler();
            let mut app = App::new(store, Arc::new(SystemClipboard::new()), &config);
            app.init().await;
            let mut layout = LayoutComponent::new();

            let result = run_tui(&mut app, &mut layout, config.tick_rate()).await;
            app.shutdown().await;
            result
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.storage.debounce_ms = debounce_ms;
    }
    if cli.ephemeral {
        config.storage.ephemeral = true;
    }
    Ok(config)
}

async fn list_panels(store: &dyn SessionStore) -> Result<()> {
    let sessions = store.get_all().await.context("Failed to read saved panels")?;
    if sessions.is_empty() {
        println!("No saved panels.");
        return Ok(());
    }

    for (position, session) in sessions.iter().enumerate() {
        let total = session.total_lines();
        let preview = session.lines().first().copied().unwrap_or("").to_string();
        println!(
            "{:>2}. {} {}/{}  {}",
            position + 1,
            session.status().indicator(),
            session.current_index.min(total),
            total,
            preview
        );
    }
    Ok(())
}

async fn clear_panels(store: &dyn SessionStore) -> Result<()> {
    store.clear().await.context("Failed to clear saved panels")?;
    info!("Cleared all saved panels from the command line");
    println!("All saved panels removed.");
    Ok(())
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent, tick_rate: Duration) -> Result<()> {
    // Check if we're in a proper terminal
    if let Err(e) = crossterm::terminal::is_raw_mode_enabled() {
        eprintln!("Cannot check terminal raw mode: {}", e);
        return Err(anyhow::anyhow!("Terminal not compatible: {}", e));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &mut app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
                Event::Paste(text) => {
                    if let Some(app_event) = EventHandler::handle_paste(text, &app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
                _ => {}
            }
        }

        // Copies and deletes should not wait for the next tick
        if app.state.pending_async_action.is_some() || last_tick.elapsed() >= tick_rate {
            app.tick().await;
            last_tick = Instant::now();

            // Check if UI needs immediate refresh after async operations
            if app.needs_ui_refresh() {
                terminal.draw(|frame| {
                    layout.render(frame, &app.state);
                })?;
            }
        }

        if app.state.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn setup_logging(log_dir: &Path) {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let _ = std::fs::create_dir_all(log_dir);

    // Create log file with timestamp
    let log_file = log_dir.join(format!(
        "quickcopy-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // The TUI owns stdout, so without a log file logging is simply off
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false), // No ANSI colors in log file
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickcopy=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stderr(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
