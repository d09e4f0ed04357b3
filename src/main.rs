//! dualcast - averaged daily weather forecast for a city and date
//!
//! Opens a terminal form by default. With `--city`, `--country` and `--date`
//! it prints a single forecast instead.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use dualcast::app::App;
use dualcast::cli::{Cli, RunMode, StartupConfig};
use dualcast::forecast::ForecastPipeline;
use dualcast::logging::{self, default_log_path, LogTarget};
use dualcast::presenter::{present, present_error};
use dualcast::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Computes one forecast and prints it
async fn run_once(pipeline: &ForecastPipeline, city: &str, country: &str, date: &str) -> ExitCode {
    match pipeline.compute_forecast(city, country, date).await {
        Ok(report) => {
            for line in present(&report) {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", err.title(), present_error(&err).join("\n  "));
            ExitCode::FAILURE
        }
    }
}

/// Runs the form until the user quits
async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        // Render UI
        terminal.draw(|f| ui::render(f, app))?;

        if app.begin_submit() {
            // Show the fetching state before blocking on the providers
            terminal.draw(|f| ui::render(f, app))?;
            app.submit().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

async fn run_interactive(mut app: App) -> io::Result<()> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return Ok(ExitCode::from(2));
        }
    };

    let log_target = if config.is_one_shot() {
        LogTarget::Stderr
    } else {
        config
            .log_file
            .clone()
            .or_else(default_log_path)
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Off)
    };
    if let Err(err) = logging::init(&log_target) {
        eprintln!("warning: logging disabled: {}", err);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "dualcast starting");
    if config.openweathermap_api_key.is_none() {
        warn!("OPENWEATHERMAP_API_KEY not set; OpenWeatherMap will be skipped");
    }

    let pipeline = ForecastPipeline::with_public_apis(config.openweathermap_api_key.clone());

    match config.mode {
        RunMode::OneShot {
            city,
            country,
            date,
        } => Ok(run_once(&pipeline, &city, &country, &date).await),
        RunMode::Interactive(prefill) => {
            run_interactive(App::new(pipeline).with_prefill(prefill)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
