//! custman - Terminal Customer Manager
//!
//! Registers, lists and deletes customers held by a remote REST API.
//! The customer list is loaded once at start-up and then kept in step with
//! the create and delete requests issued from the UI.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use custman::application::{App, AppMode};
use custman::domain::{CustomerApi, CustomerService};
use custman::infrastructure::{init_logging, AppConfig, ConfigOverrides, HttpCustomerApi, LoadOptions};
use custman::presentation::{render_ui, InputHandler};

#[derive(Debug, Parser)]
#[command(name = "custman", version, about = "Terminal customer manager")]
struct Cli {
    /// Path to a TOML config file (defaults to ./custman.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Base URL of the customer API
    #[arg(long)]
    api_url: Option<String>,
    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the custman terminal application.
///
/// Loads configuration, sets up logging and the terminal interface, performs
/// the initial customer load, and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the log file cannot be
/// opened, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load(LoadOptions {
        config_path: cli.config,
        overrides: ConfigOverrides { api_url: cli.api_url, log_level: cli.log_level },
    })?;

    init_logging(&config.logging.level, &config.logging.file)?;
    info!(api = %config.api.base_url, policy = ?config.ui.delete_policy, "starting custman");

    let api = HttpCustomerApi::new(&config.api.base_url, config.api.timeout())?;
    let mut app = App::new(CustomerService::new(config.ui.delete_policy), config.ui.clear_form_on_submit);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &api);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal error");
        println!("{err:?}");
    }

    info!("custman stopped");
    Ok(())
}

/// Main application event loop.
///
/// Draws once, performs the initial load, then handles keyboard input.
/// Continues running until the user presses 'q' in normal mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, api: &dyn CustomerApi) -> io::Result<()> {
    terminal.draw(|f| render_ui(f, app))?;
    app.mount(api);

    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(app, api, key.code, key.modifiers),
                }
            }
        }
    }
}
