mod app;
mod config;
mod effects;
mod screens;

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use tracing::info;

use app::{App, TICK};
use config::{AppConfig, Cli};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = AppConfig::from_cli(Cli::parse());
    setup_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting packdex");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to `<data dir>/packdex.log`; the terminal belongs to the TUI
fn setup_logging(config: &AppConfig) -> color_eyre::Result<()> {
    let filter = match config.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    fs::create_dir_all(&config.data_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: AppConfig,
) -> color_eyre::Result<()> {
    let mut app = App::new(config);

    loop {
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Poll with ~30fps tick for animations and pending shares
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    break; // Quit signal
                }
            }
        }

        app.tick();
    }

    info!("packdex exiting");
    Ok(())
}
