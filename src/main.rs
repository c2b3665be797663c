//! Réclamation form - terminal front end for filing parcel delivery complaints
//!
//! Validates the parcel barcode and phone number, confirms the pair with the
//! tracking service, then posts the complaint.
//!
//! Module structure:
//! - `domain/` - Draft, tracking events, validation, outcomes
//! - `io/` - Remote gateway (reqwest) and a local mock of it (hyper)
//! - `services/` - Form state reducer, submission workflow, notifications
//! - `infra/` - Config, logging, metrics
//! - `ui/` - ratatui rendering and key handling

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reclamation_form::infra::{init_logging, Config, LogTarget, Metrics};
use reclamation_form::io::HttpGateway;
use reclamation_form::services::SubmissionWorkflow;
use reclamation_form::ui::{draw_ui, map_key, App};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Parcel complaint form
#[derive(Parser, Debug)]
#[command(name = "reclamation-form", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL overriding both endpoints (e.g. a local mock-gateway)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(&[]),
    };
    if let Some(base) = &args.base_url {
        config = config.with_base_url(base);
    }

    init_logging(&LogTarget::from_option(config.log_file()), config.log_json())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "reclamation-form starting"
    );
    info!(
        config_file = %config.config_file(),
        tracking_url = %config.tracking_url(),
        complaint_url = %config.complaint_url(),
        timeout_ms = %config.gateway_timeout_ms(),
        "config_loaded"
    );

    let metrics = Arc::new(Metrics::new());
    let gateway = Arc::new(HttpGateway::new(config.gateway())?);
    let workflow = SubmissionWorkflow::new(gateway, metrics.clone());
    let mut app = App::new(workflow, config.notification_duration());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, &mut app, config.tick_rate());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    metrics.summary().log();
    info!("reclamation-form exited");
    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|f| draw_ui(f, app.state(), app.focus()))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = map_key(key, app.focus(), app.state());
                    if !app.handle_action(action) {
                        return Ok(());
                    }
                }
            }
        }
    }
}
