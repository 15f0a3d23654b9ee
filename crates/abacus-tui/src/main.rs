#![deny(unsafe_code)]

//! Abacus TUI — interactive terminal calculator.

mod app;
mod keymap;
mod panels;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use abacus_config::AppConfig;
use abacus_core::{Calculator, LogCollector};
use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::App;

/// Environment variable overriding the config file location.
const CONFIG_ENV: &str = "ABACUS_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("abacus.toml"));

    // Config is best-effort: a broken file should not keep the calculator
    // from starting.
    let (config, config_error) = match AppConfig::load_or_default(&config_path).await {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let collector = LogCollector::new(config.tui.log_capacity);
    let log_reader = collector.reader();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(collector)
        .init();

    let config_source =
        (config_error.is_none() && config_path.exists()).then_some(config_path.as_path());
    match &config_error {
        Some(e) => warn!(path = %config_path.display(), error = %e, "Invalid config, using defaults"),
        None => info!(source = ?config_source, "Configuration loaded"),
    }
    info!("Starting Abacus TUI");

    // The engine is created here and handed to the presentation layer.
    let calculator = Calculator::from_config(&config);
    let mut app = App::new(calculator, &config, config_source, log_reader);

    // Set up terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    if config.tui.mouse {
        io::stdout().execute(EnableMouseCapture)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(
        &mut terminal,
        &mut app,
        Duration::from_millis(config.tui.tick_rate_ms),
    );

    // Restore terminal even when the loop failed
    if config.tui.mouse {
        io::stdout().execute(DisableMouseCapture)?;
    }
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|frame| app.render(frame))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    info!("Exiting Abacus TUI");
    Ok(())
}
