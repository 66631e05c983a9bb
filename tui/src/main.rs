//! Ollama Chat Entry Point
//!
//! Launches the terminal chat UI. Requests go to the forwarder daemon,
//! which relays them to Ollama.
//!
//! Usage:
//!   ollama-chat [OPTIONS]
//!
//! Options:
//!   --forwarder-url <URL>  Forwarder base URL (default: http://localhost:3001)
//!   --model <NAME>         Model selected at startup (default: llama2)
//!
//! Logging is off by default because stdout belongs to the UI. Set
//! `OLLAMA_CHAT_LOG` to a filter (e.g. `debug`) to write logs to
//! `ollama-chat.log` in the system temp directory.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use ollama_chat_tui::config::DEFAULT_FORWARDER_URL;
use ollama_chat_tui::session::DEFAULT_MODEL;
use ollama_chat_tui::{App, ClientConfig, ForwarderClient};

/// Environment variable holding the log filter
const LOG_ENV: &str = "OLLAMA_CHAT_LOG";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "ollama-chat", version, about)]
struct Cli {
    /// Forwarder base URL
    #[arg(long, env = "OLLAMA_CHAT_FORWARDER_URL", default_value = DEFAULT_FORWARDER_URL)]
    forwarder_url: String,

    /// Model selected at startup
    #[arg(long, env = "OLLAMA_CHAT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: ollama-chat requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or SSH ran without -t.");
        std::process::exit(1);
    }

    let config = ClientConfig::new(cli.forwarder_url, cli.model);
    let backend = ForwarderClient::new(&config)?;
    tracing::info!(forwarder = %backend.forwarder_url(), model = %config.default_model, "Starting ollama-chat");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut app = App::new(backend, &config);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Log to a file in the temp directory when `OLLAMA_CHAT_LOG` is set
fn init_logging() -> anyhow::Result<()> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(());
    };

    let path = std::env::temp_dir().join("ollama-chat.log");
    let file = File::create(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::debug!(path = %path.display(), "File logging enabled");
    Ok(())
}
